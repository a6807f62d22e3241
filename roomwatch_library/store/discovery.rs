//! Locating the sensor data in an unfamiliar database

use roomwatch_core::config::StorePaths;
use roomwatch_core::error::StoreResult;
use roomwatch_core::ports::RealtimeStore;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Paths tried, in order, when looking for the temperature reading
pub const TEMPERATURE_CANDIDATES: [&str; 8] = [
    "/SensorData/temperature",
    "/sensorData/temperature",
    "/Sensors/temperature",
    "/sensors/temperature",
    "/Data/temperature",
    "/data/temperature",
    "/temperature",
    "/sensor_data/temperature",
];

/// What a probe found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    /// Top-level keys of the database
    pub root_keys: Vec<String>,
    /// Each candidate and whether it held data
    pub candidates: Vec<(String, bool)>,
    /// First candidate that held data
    pub found: Option<String>,
    /// Sensor paths derived from `found`
    pub paths: Option<StorePaths>,
}

impl ProbeReport {
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }
}

/// Read the root and every candidate once
pub fn probe<S: RealtimeStore + ?Sized>(store: &S) -> StoreResult<ProbeReport> {
    let root = store.read_once("/")?;
    let root_keys: Vec<String> = root
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    info!("Database root keys: {:?}", root_keys);

    let mut candidates = Vec::with_capacity(TEMPERATURE_CANDIDATES.len());
    let mut found = None;
    for candidate in TEMPERATURE_CANDIDATES {
        let present = has_data(&store.read_once(candidate)?);
        debug!("Probe {} -> {}", candidate, if present { "data" } else { "empty" });
        if present && found.is_none() {
            found = Some(candidate.to_string());
        }
        candidates.push((candidate.to_string(), present));
    }

    let paths = found.as_deref().map(|path| {
        let parent = path.rsplit_once('/').map_or("", |(parent, _)| parent);
        StorePaths::under(parent)
    });
    Ok(ProbeReport {
        root_keys,
        candidates,
        found,
        paths,
    })
}

/// Whether `value` looks like it holds a reading at all
pub fn has_data(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_probe_finds_first_candidate() {
        let store = MemoryStore::with_root(json!({
            "sensors": { "temperature": 22 },
            "data": { "temperature": 19 },
            "Alerts": { "temperatureAlert": "NORMAL" },
        }));
        let report = probe(&store).unwrap();

        assert_eq!(report.found.as_deref(), Some("/sensors/temperature"));
        let paths = report.paths.unwrap();
        assert_eq!(paths.humidity, "/sensors/humidity");
        assert_eq!(report.candidates.len(), 8);
        assert_eq!(report.root_keys.len(), 3);
    }

    #[test]
    fn test_probe_root_level_temperature() {
        let store = MemoryStore::with_root(json!({ "temperature": 30 }));
        let report = probe(&store).unwrap();
        assert_eq!(report.found.as_deref(), Some("/temperature"));
        assert_eq!(report.paths.unwrap().light, "/light");
    }

    #[test]
    fn test_probe_empty_database() {
        let report = probe(&MemoryStore::new()).unwrap();
        assert!(!report.is_found());
        assert!(report.root_keys.is_empty());
        assert!(report.candidates.iter().all(|(_, present)| !present));
    }
}
