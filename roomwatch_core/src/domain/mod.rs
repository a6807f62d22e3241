//! Domain layer - pure dashboard logic with no I/O

pub mod alert;
pub mod format;
pub mod history;
pub mod light_timer;
pub mod reading;

pub use alert::{
    classify, AlarmStatus, AlertKind, AlertState, LightAlert, Severity, TemperatureAlert, ACK,
};
pub use format::{format_bare, format_value, NO_VALUE};
pub use history::{HistoryEntry, TemperatureHistory, DEFAULT_HISTORY_CAPACITY, EMPTY_LOG};
pub use light_timer::{LightPhase, LightTimerState, LightTransition, LIGHT_ON};
pub use reading::{SensorKind, SensorReading, SensorValue};
