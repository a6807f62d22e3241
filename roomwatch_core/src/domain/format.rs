//! Value formatting for display regions

use super::reading::SensorValue;

/// Placeholder shown when a sensor has no value
pub const NO_VALUE: &str = "--";

/// Render a scalar with its unit, falling back to `--` for absent data
pub fn format_value(value: &SensorValue, unit: &str) -> String {
    match value {
        SensorValue::Absent => format!("{} {}", NO_VALUE, unit),
        v => format!("{} {}", v, unit),
    }
}

/// Render a unitless scalar (the light state)
///
/// Falsy values (empty text, zero, `false`) count as absent.
pub fn format_bare(value: &SensorValue) -> String {
    match value {
        SensorValue::Absent => NO_VALUE.to_string(),
        SensorValue::Number(n) if *n == 0.0 || n.is_nan() => NO_VALUE.to_string(),
        SensorValue::Text(s) if s.is_empty() || s == "false" => NO_VALUE.to_string(),
        v => v.to_string(),
    }
}
