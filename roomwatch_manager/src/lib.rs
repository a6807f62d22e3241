//! ROOMWATCH Manager Library
//!
//! Command implementations and terminal surfaces behind the `roomwatch`
//! binary.

pub mod commands;
pub mod dashboard_tui;
pub mod logging;
