//! # ROOMWATCH Standard Library
//!
//! Concrete adapters for the ports defined in `roomwatch_core`.
//!
//! ## Structure
//!
//! ```text
//! roomwatch_library/
//! ── store/       # In-memory realtime store, path discovery
//! ── identity/    # File-backed identity provider
//! ── sim/         # Sensor simulator standing in for the device pipeline
//! ── surfaces/    # Console display, terminal bell, log notifier
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roomwatch_library::{MemoryStore, SensorSimulator, SimConfig};
//! use roomwatch_core::{MonitorConfig, ScalarLeafAdapter};
//!
//! let store = MemoryStore::new();
//! let sim = SensorSimulator::new(store.clone(), MonitorConfig::default(), SimConfig::default());
//! tokio::spawn(sim.run());
//! let schema = ScalarLeafAdapter::new(store);
//! ```

pub mod identity;
pub mod sim;
pub mod store;

#[cfg(feature = "terminal")]
pub mod surfaces;

pub use identity::FileIdentity;
pub use sim::{SensorSimulator, SimConfig, SimSample};
pub use store::{probe, MemoryStore, ProbeReport};

#[cfg(feature = "terminal")]
pub use surfaces::{ConsoleDisplay, LogNotifier, TerminalBell};
