/// Configuration file support for ROOMWATCH
///
/// Store paths, schema layout and timer settings come from a TOML or YAML
/// file. Every field has a default, so an absent file means the hosted
/// deployment's layout.
use crate::error::{RoomwatchError, RoomwatchResult};
use crate::ports::audio::Tone;
use crate::ports::schema::SchemaLayout;
use crate::ports::store::normalize_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names searched in the working directory
const LOCAL_CONFIG_FILES: [&str; 3] = ["roomwatch.toml", "roomwatch.yaml", "roomwatch.yml"];

/// Resolved store paths the reactor subscribes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePaths {
    pub temperature: String,
    pub humidity: String,
    pub light: String,
    /// Object holding the alert flags
    pub alerts: String,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self {
            temperature: "/sensors/temperature".to_string(),
            humidity: "/sensors/humidity".to_string(),
            light: "/sensors/light".to_string(),
            alerts: "/Alerts".to_string(),
        }
    }
}

impl StorePaths {
    /// Sibling sensor paths under one parent, alerts kept at the default
    pub fn under(parent: &str) -> Self {
        let parent = parent.trim_end_matches('/');
        Self {
            temperature: format!("{}/temperature", parent),
            humidity: format!("{}/humidity", parent),
            light: format!("{}/light", parent),
            ..Self::default()
        }
    }

    fn normalize(&mut self) -> RoomwatchResult<()> {
        for path in [
            &mut self.temperature,
            &mut self.humidity,
            &mut self.light,
            &mut self.alerts,
        ] {
            if path.trim().is_empty() {
                return Err(RoomwatchError::config("Store paths must not be empty"));
            }
            *path = normalize_path(path)?;
        }
        Ok(())
    }
}

/// Field names inside the alert object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertFields {
    pub temperature: String,
    pub light: String,
}

impl Default for AlertFields {
    fn default() -> Self {
        Self {
            temperature: "temperatureAlert".to_string(),
            light: "lightAlert".to_string(),
        }
    }
}

/// Light-on timer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightTimerConfig {
    /// Period of the elapsed-time display update
    pub tick_period_ms: u64,
    /// Delay of the one-shot "light on for a while" reminder
    pub reminder_delay_ms: u64,
    /// Cancel a pending reminder when the light turns off
    pub cancel_reminder_on_off: bool,
}

impl Default for LightTimerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            reminder_delay_ms: 5000,
            cancel_reminder_on_off: false,
        }
    }
}

impl LightTimerConfig {
    /// Tick period, never zero
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }

    pub fn reminder_delay(&self) -> Duration {
        Duration::from_millis(self.reminder_delay_ms)
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub schema: SchemaLayout,
    /// Field holding the reading inside a pushed record
    pub record_value_field: String,
    pub banner_duration_ms: u64,
    pub history_capacity: usize,
    pub notification_title: String,
    pub paths: StorePaths,
    pub alert_fields: AlertFields,
    pub light_timer: LightTimerConfig,
    pub alarm_tone: Tone,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            paths: StorePaths::default(),
            alert_fields: AlertFields::default(),
            schema: SchemaLayout::Scalar,
            record_value_field: "value".to_string(),
            light_timer: LightTimerConfig::default(),
            banner_duration_ms: 4000,
            history_capacity: 30,
            alarm_tone: Tone::default(),
            notification_title: "Hostel Monitor".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load config from a file (format chosen by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> RoomwatchResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RoomwatchError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&contents)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            _ => Self::from_toml(&contents).or_else(|_| Self::from_yaml(&contents))?,
        };
        config.validated()
    }

    pub fn from_toml(contents: &str) -> RoomwatchResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_yaml(contents: &str) -> RoomwatchResult<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> RoomwatchResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from `explicit` if given, otherwise the first file found on the
    /// search path, otherwise defaults
    ///
    /// Search order:
    /// 1. ./roomwatch.toml, ./roomwatch.yaml, ./roomwatch.yml
    /// 2. ~/.roomwatch/config.toml
    pub fn load(explicit: Option<&Path>) -> RoomwatchResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            None => Self::default().validated(),
        }
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = LOCAL_CONFIG_FILES.iter().map(PathBuf::from).collect();
        if let Some(dir) = config_dir() {
            paths.push(dir.join("config.toml"));
        }
        paths
    }

    /// Check invariants and normalise paths
    pub fn validated(mut self) -> RoomwatchResult<Self> {
        if self.light_timer.tick_period_ms == 0 {
            return Err(RoomwatchError::config("light_timer.tick_period_ms must be > 0"));
        }
        if self.history_capacity == 0 {
            return Err(RoomwatchError::config("history_capacity must be > 0"));
        }
        if self.alert_fields.temperature.is_empty() || self.alert_fields.light.is_empty() {
            return Err(RoomwatchError::config("alert field names must not be empty"));
        }
        self.paths.normalize()?;
        Ok(self)
    }

    pub fn banner_duration(&self) -> Duration {
        Duration::from_millis(self.banner_duration_ms)
    }
}

/// Per-user state directory, `~/.roomwatch`
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".roomwatch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hosted_layout() {
        let config = MonitorConfig::default().validated().unwrap();
        assert_eq!(config.paths.temperature, "/sensors/temperature");
        assert_eq!(config.paths.alerts, "/Alerts");
        assert_eq!(config.light_timer.reminder_delay(), Duration::from_secs(5));
        assert_eq!(config.banner_duration(), Duration::from_secs(4));
        assert_eq!(config.history_capacity, 30);
        assert!(!config.light_timer.cancel_reminder_on_off);
    }

    #[test]
    fn test_partial_toml() {
        let config = MonitorConfig::from_toml(
            r#"
            schema = "records"

            [paths]
            temperature = "SensorData/temperature/"

            [light_timer]
            reminder_delay_ms = 60000
            "#,
        )
        .unwrap()
        .validated()
        .unwrap();

        assert_eq!(config.schema, SchemaLayout::Records);
        assert_eq!(config.paths.temperature, "/SensorData/temperature");
        assert_eq!(config.paths.humidity, "/sensors/humidity");
        assert_eq!(config.light_timer.reminder_delay_ms, 60000);
        assert_eq!(config.light_timer.tick_period_ms, 1000);
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomwatch.yaml");
        std::fs::write(
            &path,
            "banner_duration_ms: 2000\nalarm_tone:\n  frequency_hz: 440.0\n",
        )
        .unwrap();

        let config = MonitorConfig::from_file(&path).unwrap();
        assert_eq!(config.banner_duration_ms, 2000);
        assert_eq!(config.alarm_tone.frequency_hz, 440.0);
        assert_eq!(config.alarm_tone.decay_ms, 600);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = MonitorConfig::default();
        config.history_capacity = 0;
        assert!(matches!(config.validated(), Err(RoomwatchError::Config(_))));

        let mut config = MonitorConfig::default();
        config.light_timer.tick_period_ms = 0;
        assert!(config.validated().is_err());

        let mut config = MonitorConfig::default();
        config.paths.light = "  ".to_string();
        assert!(config.validated().is_err());

        let mut config = MonitorConfig::default();
        config.paths.alerts = "/Alerts/a.b".to_string();
        assert!(matches!(config.validated(), Err(RoomwatchError::Store(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MonitorConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(MonitorConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_paths_under_parent() {
        let paths = StorePaths::under("/SensorData/");
        assert_eq!(paths.temperature, "/SensorData/temperature");
        assert_eq!(paths.light, "/SensorData/light");
        assert_eq!(paths.alerts, "/Alerts");
    }
}
