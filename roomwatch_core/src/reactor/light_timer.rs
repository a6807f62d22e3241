//! Timer tasks behind the light-on state machine
//!
//! `LightTimer` owns the periodic tick task and the reminder tasks. At most
//! one tick task exists at a time: it is only spawned on Idle -> Running
//! and aborted on Running -> Idle.

use super::event::TimerEvent;
use crate::config::LightTimerConfig;
use crate::domain::{LightPhase, LightTimerState, LightTransition, SensorValue};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub struct LightTimer {
    state: LightTimerState,
    config: LightTimerConfig,
    events: mpsc::UnboundedSender<TimerEvent>,
    ticker: Option<JoinHandle<()>>,
    reminders: Vec<JoinHandle<()>>,
}

impl LightTimer {
    pub fn new(config: LightTimerConfig, events: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: LightTimerState::new(),
            config,
            events,
            ticker: None,
            reminders: Vec::new(),
        }
    }

    pub fn phase(&self) -> LightPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &LightTimerState {
        &self.state
    }

    /// Whether a periodic tick task is alive
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Feed a light value; spawns or cancels timer tasks on transitions
    pub fn on_light(&mut self, value: &SensorValue) -> LightTransition {
        let transition = self.state.on_light(value, Instant::now().into_std());
        match transition {
            LightTransition::Started { epoch } => {
                self.spawn_ticker(epoch);
                self.spawn_reminder(epoch);
            }
            LightTransition::Stopped => {
                if let Some(ticker) = self.ticker.take() {
                    ticker.abort();
                }
                if self.config.cancel_reminder_on_off {
                    self.abort_reminders();
                }
            }
            LightTransition::Unchanged => {}
        }
        transition
    }

    /// Elapsed seconds to publish for a tick, `None` if the tick is stale
    pub fn elapsed_for(&self, epoch: u64) -> Option<u64> {
        if !self.state.is_current(epoch) {
            return None;
        }
        self.state.elapsed_secs(Instant::now().into_std())
    }

    /// Whether a reminder scheduled under `epoch` should be delivered
    ///
    /// Without `cancel_reminder_on_off` a reminder always fires once
    /// scheduled, even if the light went off in the meantime.
    pub fn should_remind(&self, epoch: u64) -> bool {
        !self.config.cancel_reminder_on_off || self.state.is_current(epoch)
    }

    /// Abort every timer task
    pub fn shutdown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.abort_reminders();
    }

    fn spawn_ticker(&mut self, epoch: u64) {
        if let Some(stale) = self.ticker.take() {
            stale.abort();
        }
        let period = self.config.tick_period();
        let events = self.events.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(TimerEvent::LightTick { epoch }).is_err() {
                    break;
                }
            }
        }));
    }

    fn spawn_reminder(&mut self, epoch: u64) {
        self.reminders.retain(|r| !r.is_finished());
        let delay = self.config.reminder_delay();
        let events = self.events.clone();
        self.reminders.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(TimerEvent::Reminder { epoch });
        }));
    }

    fn abort_reminders(&mut self) {
        for reminder in self.reminders.drain(..) {
            reminder.abort();
        }
    }
}

impl Drop for LightTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
