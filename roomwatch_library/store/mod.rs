//! Realtime store adapters

pub mod discovery;
pub mod memory;

pub use discovery::{probe, ProbeReport, TEMPERATURE_CANDIDATES};
pub use memory::{push_key, MemoryStore};
