//! Sensor reading entity
//!
//! A `SensorReading` is what one store delivery turns into: which sensor it
//! came from, the raw scalar, and when it was observed locally.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which sensor a reading belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Light,
}

impl SensorKind {
    /// Display unit for this sensor
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::Light => "",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Light => "light",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw scalar delivered by the store
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SensorValue {
    Number(f64),
    Text(String),
    #[default]
    Absent,
}

impl SensorValue {
    /// Interpret a store value as a sensor scalar
    ///
    /// `null` is `Absent`. Booleans and nested values are kept as text so
    /// they still render instead of disappearing.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => SensorValue::Absent,
            Value::Number(n) => n
                .as_f64()
                .map(SensorValue::Number)
                .unwrap_or_else(|| SensorValue::Text(n.to_string())),
            Value::String(s) => SensorValue::Text(s.clone()),
            other => SensorValue::Text(other.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SensorValue::Absent)
    }

    /// Numeric view, parsing numeric text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SensorValue::Number(n) => Some(*n),
            SensorValue::Text(s) => s.trim().parse().ok(),
            SensorValue::Absent => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SensorValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::Number(n) => write!(f, "{}", n),
            SensorValue::Text(s) => f.write_str(s),
            SensorValue::Absent => Ok(()),
        }
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        SensorValue::Number(value)
    }
}

impl From<&str> for SensorValue {
    fn from(value: &str) -> Self {
        SensorValue::Text(value.to_string())
    }
}

/// One delivered reading, immutable once received
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub kind: SensorKind,
    pub value: SensorValue,
    pub observed_at: DateTime<Local>,
}

impl SensorReading {
    pub fn new(kind: SensorKind, value: SensorValue) -> Self {
        Self::at(kind, value, Local::now())
    }

    pub fn at(kind: SensorKind, value: SensorValue, observed_at: DateTime<Local>) -> Self {
        Self {
            kind,
            value,
            observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(SensorValue::from_json(&Value::Null), SensorValue::Absent);
        assert_eq!(SensorValue::from_json(&json!(23.5)), SensorValue::Number(23.5));
        assert_eq!(SensorValue::from_json(&json!("ON")), SensorValue::from("ON"));
        assert_eq!(SensorValue::from_json(&json!(true)), SensorValue::from("true"));
    }

    #[test]
    fn test_display_matches_store_text() {
        assert_eq!(SensorValue::Number(23.0).to_string(), "23");
        assert_eq!(SensorValue::Number(23.5).to_string(), "23.5");
        assert_eq!(SensorValue::from("OFF").to_string(), "OFF");
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(SensorValue::from(" 21.5 ").as_f64(), Some(21.5));
        assert_eq!(SensorValue::from("ON").as_f64(), None);
        assert_eq!(SensorValue::Absent.as_f64(), None);
    }
}
