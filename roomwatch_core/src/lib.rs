//! # Roomwatch Core
//!
//! Sensor display and alarm reactor for a room monitoring dashboard.
//!
//! A realtime store publishes temperature, humidity, light and alert flags.
//! This crate turns those values into what the user sees and hears:
//!
//! - **Domain**: value formatting, alarm classification, the light-on timer
//!   state machine and the bounded temperature log
//! - **Ports**: traits for the store, schema layout, identity, display,
//!   notifications and the alarm sound
//! - **Reactor**: the event loop wiring store deliveries to the ports
//! - **Config**: store paths and timer settings from TOML or YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomwatch_core::{Dashboard, MonitorConfig, Reactor, ScalarLeafAdapter};
//!
//! let config = MonitorConfig::load(None)?;
//! let schema = ScalarLeafAdapter::new(store);
//! let reactor = Reactor::new(config, schema, display, notifier, sound);
//! let run = Dashboard::new(identity).enter(reactor)?;
//! run.handle.acknowledge(AlertKind::Temperature)?;
//! run.wait().await?;
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod reactor;

pub use config::{config_dir, AlertFields, LightTimerConfig, MonitorConfig, StorePaths};
pub use domain::{
    classify, format_bare, format_value, AlarmStatus, AlertKind, AlertState, HistoryEntry,
    LightAlert, LightPhase, SensorKind, SensorReading, SensorValue, Severity, TemperatureAlert,
    TemperatureHistory, ACK,
};
pub use error::{
    AudioError, AuthError, AuthResult, DisplayError, RoomwatchError, RoomwatchResult, StoreError,
    StoreResult,
};
pub use ports::{
    AlarmSound, DisplaySurface, Emphasis, IdentityProvider, NotificationSurface, Permission,
    PushedRecordAdapter, RealtimeStore, Region, ScalarLeafAdapter, SchemaAdapter, SchemaLayout,
    Session, Subscription, Tone,
};
pub use reactor::{Dashboard, DashboardRun, Reactor, ReactorHandle};
