//! Alert flags and the alarm classifier
//!
//! The alert object lives in the external store and is written by the
//! sensor pipeline. This side only reads it and may request `ACK`.
//!
//! Acknowledging silences the alarm (severity drops to `None`) while the
//! label keeps reporting `ACK` until the pipeline resets the flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Wire value written to acknowledge an alert
pub const ACK: &str = "ACK";

/// Temperature alert flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemperatureAlert {
    Normal,
    High,
    Ack,
    /// Any value the pipeline writes that this side does not know
    Other(String),
}

impl TemperatureAlert {
    pub fn as_str(&self) -> &str {
        match self {
            TemperatureAlert::Normal => "NORMAL",
            TemperatureAlert::High => "HIGH",
            TemperatureAlert::Ack => ACK,
            TemperatureAlert::Other(s) => s,
        }
    }
}

impl From<String> for TemperatureAlert {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NORMAL" => TemperatureAlert::Normal,
            "HIGH" => TemperatureAlert::High,
            ACK => TemperatureAlert::Ack,
            _ => TemperatureAlert::Other(value),
        }
    }
}

impl From<TemperatureAlert> for String {
    fn from(value: TemperatureAlert) -> Self {
        value.as_str().to_string()
    }
}

/// Light alert flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightAlert {
    LightOff,
    LightOn,
    Ack,
    Other(String),
}

impl LightAlert {
    pub fn as_str(&self) -> &str {
        match self {
            LightAlert::LightOff => "LIGHT_OFF",
            LightAlert::LightOn => "LIGHT_ON",
            LightAlert::Ack => ACK,
            LightAlert::Other(s) => s,
        }
    }
}

impl From<String> for LightAlert {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LIGHT_OFF" => LightAlert::LightOff,
            "LIGHT_ON" => LightAlert::LightOn,
            ACK => LightAlert::Ack,
            _ => LightAlert::Other(value),
        }
    }
}

impl From<LightAlert> for String {
    fn from(value: LightAlert) -> Self {
        value.as_str().to_string()
    }
}

/// Which alert an acknowledgement targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Temperature,
    Light,
}

impl AlertKind {
    /// Banner text shown after acknowledging
    pub fn acknowledged_message(&self) -> &'static str {
        match self {
            AlertKind::Temperature => "Temperature alarm acknowledged",
            AlertKind::Light => "Light alarm acknowledged",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Temperature => f.write_str("temperature"),
            AlertKind::Light => f.write_str("light"),
        }
    }
}

impl std::str::FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" | "temp" | "t" => Ok(AlertKind::Temperature),
            "light" | "l" => Ok(AlertKind::Light),
            other => Err(format!("unknown alert kind '{}'", other)),
        }
    }
}

/// Snapshot of the store's alert object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    #[serde(rename = "temperatureAlert", default, skip_serializing_if = "Option::is_none")]
    pub temperature_alert: Option<TemperatureAlert>,
    #[serde(rename = "lightAlert", default, skip_serializing_if = "Option::is_none")]
    pub light_alert: Option<LightAlert>,
}

impl AlertState {
    pub fn new(temperature: TemperatureAlert, light: LightAlert) -> Self {
        Self {
            temperature_alert: Some(temperature),
            light_alert: Some(light),
        }
    }

    /// Read the alert object delivered by the store
    ///
    /// `null` or a non-object is an empty state. Non-string fields are
    /// treated as absent rather than failing the whole delivery.
    pub fn from_json(value: &Value, temperature_field: &str, light_field: &str) -> Self {
        let Some(map) = value.as_object() else {
            return AlertState::default();
        };
        let text = |field: &str| {
            map.get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            temperature_alert: text(temperature_field).map(TemperatureAlert::from),
            light_alert: text(light_field).map(LightAlert::from),
        }
    }
}

/// How loudly an alarm should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    None,
    Warning,
}

/// Classifier output: label text plus severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmStatus {
    pub label: String,
    pub severity: Severity,
}

impl AlarmStatus {
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Derive the alarm label and severity from the alert flags
///
/// First match wins for the label: a non-normal temperature flag, then a
/// light flag other than `LIGHT_OFF`, then `NONE`. Severity is `Warning`
/// only for `HIGH` or `LIGHT_ON`, so an `ACK` label is always silent.
pub fn classify(state: &AlertState) -> AlarmStatus {
    let label = match (&state.temperature_alert, &state.light_alert) {
        (Some(t), _) if *t != TemperatureAlert::Normal => t.as_str().to_string(),
        (_, Some(l)) if *l != LightAlert::LightOff => l.as_str().to_string(),
        _ => "NONE".to_string(),
    };

    let warning = state.temperature_alert == Some(TemperatureAlert::High)
        || state.light_alert == Some(LightAlert::LightOn);

    AlarmStatus {
        label,
        severity: if warning {
            Severity::Warning
        } else {
            Severity::None
        },
    }
}
