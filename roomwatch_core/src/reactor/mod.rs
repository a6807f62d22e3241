//! The dashboard reactor
//!
//! One task owns all dashboard state. Store subscriptions, timer tasks and
//! user commands feed it through channels, and it drives the display,
//! notification and sound ports.

pub mod dashboard;
pub mod engine;
pub mod event;
pub mod light_timer;

pub use dashboard::{Dashboard, DashboardRun};
pub use engine::{Reactor, LIGHT_REMINDER_BODY, LIGHT_REMINDER_TEXT};
pub use event::{Command, Delivery, ReactorHandle, TimerEvent};
pub use light_timer::LightTimer;
