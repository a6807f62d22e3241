//! Sensor simulator
//!
//! Stands in for the device pipeline when no hardware is attached: writes a
//! temperature random walk, humidity and the light state, and keeps the
//! alert flags in step with them.

use crate::store::push_key;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roomwatch_core::config::MonitorConfig;
use roomwatch_core::domain::{LightAlert, TemperatureAlert, ACK};
use roomwatch_core::error::StoreResult;
use roomwatch_core::ports::{child_path, RealtimeStore, SchemaLayout};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Simulator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub period_ms: u64,
    pub temperature_start: f64,
    pub temperature_step: f64,
    pub temperature_range: (f64, f64),
    /// Readings above this raise `HIGH`
    pub high_threshold: f64,
    pub humidity_start: f64,
    pub humidity_step: f64,
    /// Chance per step that the light switches
    pub light_toggle_probability: f64,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            period_ms: 2000,
            temperature_start: 24.0,
            temperature_step: 0.8,
            temperature_range: (15.0, 40.0),
            high_threshold: 30.0,
            humidity_start: 55.0,
            humidity_step: 2.0,
            light_toggle_probability: 0.15,
            seed: None,
        }
    }
}

/// One simulated sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSample {
    pub temperature: f64,
    pub humidity: f64,
    pub light_on: bool,
}

pub struct SensorSimulator<S> {
    store: S,
    monitor: MonitorConfig,
    config: SimConfig,
    rng: StdRng,
    sample: SimSample,
    seq: u64,
    /// Push keys written per records node, oldest first
    pushed: HashMap<String, VecDeque<String>>,
}

impl<S: RealtimeStore> SensorSimulator<S> {
    pub fn new(store: S, monitor: MonitorConfig, config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sample = SimSample {
            temperature: config.temperature_start,
            humidity: config.humidity_start,
            light_on: false,
        };
        Self {
            store,
            monitor,
            config,
            rng,
            sample,
            seq: 0,
            pushed: HashMap::new(),
        }
    }

    pub fn sample(&self) -> SimSample {
        self.sample
    }

    /// Advance the random walk and publish it
    pub fn step(&mut self) -> StoreResult<SimSample> {
        let (low, high) = self.config.temperature_range;
        let dt = self.rng.gen_range(-1.0..=1.0) * self.config.temperature_step;
        let dh = self.rng.gen_range(-1.0..=1.0) * self.config.humidity_step;

        self.sample.temperature = round1((self.sample.temperature + dt).clamp(low, high));
        self.sample.humidity = round1((self.sample.humidity + dh).clamp(0.0, 100.0));
        if self.rng.gen_bool(self.config.light_toggle_probability.clamp(0.0, 1.0)) {
            self.sample.light_on = !self.sample.light_on;
        }
        self.publish(self.sample)?;
        Ok(self.sample)
    }

    /// Write `sample` in the configured layout and update the alert flags
    pub fn publish(&mut self, sample: SimSample) -> StoreResult<()> {
        self.sample = sample;
        let paths = self.monitor.paths.clone();
        let light = if sample.light_on { "ON" } else { "OFF" };

        self.put(&paths.temperature, json!(sample.temperature))?;
        self.put(&paths.humidity, json!(sample.humidity))?;
        self.put(&paths.light, json!(light))?;

        let temperature_alert = if sample.temperature > self.config.high_threshold {
            TemperatureAlert::High
        } else {
            TemperatureAlert::Normal
        };
        let light_alert = if sample.light_on {
            LightAlert::LightOn
        } else {
            LightAlert::LightOff
        };
        let fields = self.monitor.alert_fields.clone();
        self.update_flag(&fields.temperature, temperature_alert.as_str())?;
        self.update_flag(&fields.light, light_alert.as_str())?;

        debug!(
            "Simulated T={} H={} light={}",
            sample.temperature, sample.humidity, light
        );
        Ok(())
    }

    /// Step every `period_ms` until a write fails
    pub async fn run(mut self) -> StoreResult<()> {
        let period = Duration::from_millis(self.config.period_ms.max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if let Err(e) = self.step() {
                warn!("Simulator stopped: {}", e);
                return Err(e);
            }
        }
    }

    fn put(&mut self, path: &str, value: Value) -> StoreResult<()> {
        match self.monitor.schema {
            SchemaLayout::Scalar => self.store.write(path, value),
            SchemaLayout::Records => {
                let mut record = Map::new();
                record.insert(self.monitor.record_value_field.clone(), value);
                record.insert(
                    "timestamp".to_string(),
                    json!(chrono::Utc::now().timestamp_millis()),
                );
                self.seq += 1;
                let key = push_key(self.seq);
                self.store
                    .write(&child_path(path, &key), Value::Object(record))?;
                self.trim(path, key)
            }
        }
    }

    // Records nodes keep at most `history_capacity` entries
    fn trim(&mut self, path: &str, key: String) -> StoreResult<()> {
        let capacity = self.monitor.history_capacity.max(1);
        let keys = self.pushed.entry(path.to_string()).or_default();
        keys.push_back(key);
        while keys.len() > capacity {
            if let Some(oldest) = keys.pop_front() {
                self.store.write(&child_path(path, &oldest), Value::Null)?;
            }
        }
        Ok(())
    }

    // An ACK survives while its condition persists; the normal flag resets it
    fn update_flag(&self, field: &str, raised: &str) -> StoreResult<()> {
        let path = child_path(&self.monitor.paths.alerts, field);
        let current = self.store.read_once(&path)?;
        let current = current.as_str().unwrap_or_default();

        let is_alarm =
            raised == TemperatureAlert::High.as_str() || raised == LightAlert::LightOn.as_str();
        let next = if is_alarm && current == ACK { ACK } else { raised };
        if current != next {
            self.store.write(&path, json!(next))?;
        }
        Ok(())
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sim(schema: SchemaLayout) -> (MemoryStore, SensorSimulator<MemoryStore>) {
        let store = MemoryStore::new();
        let monitor = MonitorConfig {
            schema,
            ..MonitorConfig::default()
        };
        let config = SimConfig {
            seed: Some(7),
            ..SimConfig::default()
        };
        (store.clone(), SensorSimulator::new(store, monitor, config))
    }

    fn sample(temperature: f64, light_on: bool) -> SimSample {
        SimSample {
            temperature,
            humidity: 50.0,
            light_on,
        }
    }

    #[test]
    fn test_scalar_layout_and_flags() {
        let (store, mut sim) = sim(SchemaLayout::Scalar);
        sim.publish(sample(31.0, true)).unwrap();

        assert_eq!(store.read_once("/sensors/temperature").unwrap(), json!(31.0));
        assert_eq!(store.read_once("/sensors/light").unwrap(), json!("ON"));
        assert_eq!(
            store.read_once("/Alerts").unwrap(),
            json!({ "temperatureAlert": "HIGH", "lightAlert": "LIGHT_ON" })
        );
    }

    #[test]
    fn test_ack_kept_while_condition_persists() {
        let (store, mut sim) = sim(SchemaLayout::Scalar);
        sim.publish(sample(31.0, false)).unwrap();
        store.write("/Alerts/temperatureAlert", json!("ACK")).unwrap();

        sim.publish(sample(32.0, false)).unwrap();
        assert_eq!(store.read_once("/Alerts/temperatureAlert").unwrap(), json!("ACK"));

        sim.publish(sample(25.0, false)).unwrap();
        assert_eq!(store.read_once("/Alerts/temperatureAlert").unwrap(), json!("NORMAL"));

        sim.publish(sample(33.0, false)).unwrap();
        assert_eq!(store.read_once("/Alerts/temperatureAlert").unwrap(), json!("HIGH"));
    }

    #[test]
    fn test_records_layout_pushes() {
        let (store, mut sim) = sim(SchemaLayout::Records);
        sim.publish(sample(20.0, false)).unwrap();
        sim.publish(sample(21.0, false)).unwrap();

        let records = store.read_once("/sensors/temperature").unwrap();
        let values: Vec<f64> = records
            .as_object()
            .unwrap()
            .values()
            .map(|r| r["value"].as_f64().unwrap())
            .collect();
        assert_eq!(values, vec![20.0, 21.0]);
    }

    #[test]
    fn test_records_nodes_stay_bounded() {
        let (store, mut sim) = sim(SchemaLayout::Records);
        let capacity = MonitorConfig::default().history_capacity;
        for i in 0..capacity + 12 {
            sim.publish(sample(20.0 + i as f64, false)).unwrap();
        }

        for path in ["/sensors/temperature", "/sensors/humidity", "/sensors/light"] {
            let node = store.read_once(path).unwrap();
            assert_eq!(node.as_object().unwrap().len(), capacity, "{}", path);
        }
        // The newest readings survive
        let records = store.read_once("/sensors/temperature").unwrap();
        let mut values: Vec<f64> = records
            .as_object()
            .unwrap()
            .values()
            .map(|r| r["value"].as_f64().unwrap())
            .collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values.first(), Some(&(32.0)));
        assert_eq!(values.last(), Some(&(20.0 + (capacity + 11) as f64)));
    }

    #[test]
    fn test_random_walk_stays_in_range() {
        let (_store, mut sim) = sim(SchemaLayout::Scalar);
        for _ in 0..200 {
            let s = sim.step().unwrap();
            assert!((15.0..=40.0).contains(&s.temperature));
            assert!((0.0..=100.0).contains(&s.humidity));
        }
    }
}
