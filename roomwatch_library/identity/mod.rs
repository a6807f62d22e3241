//! Identity provider adapters

pub mod file;

pub use file::FileIdentity;
