//! Events and commands consumed by the reactor loop

use crate::domain::AlertKind;
use crate::error::{RoomwatchError, RoomwatchResult};
use serde_json::Value;
use tokio::sync::mpsc;

/// A value delivered by one of the subscribed streams
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Temperature(Value),
    Humidity(Value),
    Light(Value),
    Alerts(Value),
    /// New samples for the temperature log
    TemperatureSamples(Vec<Value>),
}

/// Timer firings posted back to the reactor by its own timer tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Periodic elapsed-time update for the light run `epoch`
    LightTick { epoch: u64 },
    /// One-shot reminder scheduled when run `epoch` started
    Reminder { epoch: u64 },
    /// Auto-hide for banner `generation`
    BannerExpired { generation: u64 },
}

/// Requests from the user side of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Acknowledge(AlertKind),
    Shutdown,
}

/// Cloneable handle for sending commands to a running reactor
#[derive(Debug, Clone)]
pub struct ReactorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ReactorHandle {
    pub(crate) fn new(commands: mpsc::UnboundedSender<Command>) -> Self {
        Self { commands }
    }

    /// Request acknowledgement of an alarm
    pub fn acknowledge(&self, kind: AlertKind) -> RoomwatchResult<()> {
        self.send(Command::Acknowledge(kind))
    }

    /// Stop the reactor loop
    pub fn shutdown(&self) -> RoomwatchResult<()> {
        self.send(Command::Shutdown)
    }

    pub fn send(&self, command: Command) -> RoomwatchResult<()> {
        self.commands
            .send(command)
            .map_err(|_| RoomwatchError::ReactorStopped)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
