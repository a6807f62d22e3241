//! # ROOMWATCH - hostel room monitor
//!
//! Live temperature, humidity and light readings from a realtime store,
//! with an alarm line, a light-on timer and a short temperature log.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomwatch::prelude::*;
//!
//! # async fn demo() -> AnyResult<()> {
//! let identity = Arc::new(FileIdentity::open_default()?);
//! let store = MemoryStore::new();
//! let reactor = Reactor::new(
//!     MonitorConfig::load(None)?,
//!     ScalarLeafAdapter::new(store),
//!     ConsoleDisplay::stdout(),
//!     LogNotifier::default(),
//!     TerminalBell::stderr(),
//! );
//! let run = Dashboard::new(identity).enter(reactor)?;
//! run.handle.acknowledge(AlertKind::Temperature)?;
//! run.wait().await?;
//! # Ok(())
//! # }
//! ```

// Re-export core components
pub use roomwatch_core::{self, *};

// Re-export standard library with alias
pub use roomwatch_library as library;

/// The ROOMWATCH prelude - everything you need to get started
pub mod prelude {
    // Reactor and its gate
    pub use roomwatch_core::reactor::{Dashboard, DashboardRun, Reactor, ReactorHandle};

    // Ports
    pub use roomwatch_core::ports::{
        AlarmSound, DisplaySurface, Emphasis, IdentityProvider, NotificationSurface, Permission,
        PushedRecordAdapter, RealtimeStore, Region, ScalarLeafAdapter, SchemaAdapter,
        SchemaLayout, Session,
    };

    // Domain
    pub use roomwatch_core::domain::{AlarmStatus, AlertKind, SensorKind, SensorValue};
    pub use roomwatch_core::config::MonitorConfig;

    // Error types
    pub use roomwatch_core::error::{RoomwatchError, RoomwatchResult};
    pub type Result<T> = RoomwatchResult<T>;

    // Adapters
    pub use roomwatch_library::{FileIdentity, MemoryStore, SensorSimulator, SimConfig};
    #[cfg(feature = "terminal")]
    pub use roomwatch_library::{ConsoleDisplay, LogNotifier, TerminalBell};

    // Common std types
    pub use std::sync::Arc;
    pub use std::time::Duration;

    // Common traits
    pub use serde::{Deserialize, Serialize};

    // Re-export anyhow for error handling
    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get ROOMWATCH version
pub fn version() -> &'static str {
    VERSION
}
