//! Light-on timer state machine
//!
//! Tracks how long the light has been on. Only transitions live here; the
//! reactor owns the periodic tick and reminder tasks and asks this state
//! whether an incoming timer event is still current.
//!
//! Every start bumps the epoch. Timer events carry the epoch they were
//! scheduled under, so an event from a stopped run is recognisably stale.

use super::reading::SensorValue;
use std::time::Instant;

/// Light value that starts the timer
pub const LIGHT_ON: &str = "ON";

/// Phase of the light timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    Idle,
    Running,
}

/// Result of feeding a light value into the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightTransition {
    /// Idle -> Running, carrying the new epoch
    Started { epoch: u64 },
    /// Running -> Idle
    Stopped,
    /// No state change (repeated `ON` while running, or off while idle)
    Unchanged,
}

/// Timer state, owned exclusively by one reactor
#[derive(Debug, Clone, Default)]
pub struct LightTimerState {
    started_at: Option<Instant>,
    epoch: u64,
}

impl LightTimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LightPhase {
        if self.started_at.is_some() {
            LightPhase::Running
        } else {
            LightPhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Epoch of the current (or most recent) run
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Apply a light value delivered by the store
    pub fn on_light(&mut self, value: &SensorValue, now: Instant) -> LightTransition {
        let on = value.as_text() == Some(LIGHT_ON);
        match (on, self.started_at) {
            (true, Some(_)) => LightTransition::Unchanged,
            (true, None) => {
                self.epoch += 1;
                self.started_at = Some(now);
                LightTransition::Started { epoch: self.epoch }
            }
            (false, Some(_)) => {
                self.started_at = None;
                LightTransition::Stopped
            }
            (false, None) => LightTransition::Unchanged,
        }
    }

    /// Whole seconds since the light turned on, floored
    pub fn elapsed_secs(&self, now: Instant) -> Option<u64> {
        self.started_at
            .map(|start| now.saturating_duration_since(start).as_secs())
    }

    /// Whether an event scheduled under `epoch` belongs to the live run
    pub fn is_current(&self, epoch: u64) -> bool {
        self.is_running() && self.epoch == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn on() -> SensorValue {
        SensorValue::from("ON")
    }

    #[test]
    fn test_start_and_stop() {
        let mut state = LightTimerState::new();
        let t0 = Instant::now();

        assert_eq!(state.phase(), LightPhase::Idle);
        assert_eq!(state.on_light(&on(), t0), LightTransition::Started { epoch: 1 });
        assert_eq!(state.phase(), LightPhase::Running);
        assert_eq!(state.elapsed_secs(t0 + Duration::from_millis(2999)), Some(2));

        assert_eq!(
            state.on_light(&SensorValue::from("OFF"), t0 + Duration::from_secs(3)),
            LightTransition::Stopped
        );
        assert_eq!(state.elapsed_secs(t0 + Duration::from_secs(4)), None);
    }

    #[test]
    fn test_repeated_on_is_idempotent() {
        let mut state = LightTimerState::new();
        let t0 = Instant::now();
        state.on_light(&on(), t0);

        let later = t0 + Duration::from_secs(5);
        assert_eq!(state.on_light(&on(), later), LightTransition::Unchanged);
        // Start time is not reset
        assert_eq!(state.started_at(), Some(t0));
        assert_eq!(state.epoch(), 1);
    }

    #[test]
    fn test_off_while_idle() {
        let mut state = LightTimerState::new();
        let now = Instant::now();
        assert_eq!(state.on_light(&SensorValue::Absent, now), LightTransition::Unchanged);
        assert_eq!(state.on_light(&SensorValue::from("on"), now), LightTransition::Unchanged);
        assert!(!state.is_running());
    }

    #[test]
    fn test_stale_epoch_rejected() {
        let mut state = LightTimerState::new();
        let t0 = Instant::now();
        state.on_light(&on(), t0);
        assert!(state.is_current(1));

        state.on_light(&SensorValue::from("OFF"), t0);
        assert!(!state.is_current(1));

        assert_eq!(state.on_light(&on(), t0), LightTransition::Started { epoch: 2 });
        assert!(!state.is_current(1));
        assert!(state.is_current(2));
    }
}
