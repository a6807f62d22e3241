//! Terminal surfaces: display, alarm sound and notifications

pub mod bell;
pub mod console;
pub mod notifier;

pub use bell::TerminalBell;
pub use console::ConsoleDisplay;
pub use notifier::LogNotifier;
