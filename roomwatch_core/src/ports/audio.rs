//! Alarm sound port

use crate::error::AudioError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
}

/// A short synthesized alarm tone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tone {
    pub frequency_hz: f32,
    /// Time for the gain to decay to silence
    pub decay_ms: u64,
    pub waveform: Waveform,
}

impl Tone {
    pub fn decay(&self) -> Duration {
        Duration::from_millis(self.decay_ms)
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 880.0,
            decay_ms: 600,
            waveform: Waveform::Sine,
        }
    }
}

/// Port for playing the alarm tone
///
/// Playback may be refused by the environment; callers treat any error as
/// non-fatal.
pub trait AlarmSound: Send {
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError>;
}

impl<A: AlarmSound + ?Sized> AlarmSound for Box<A> {
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        (**self).play(tone)
    }
}
