//! Terminal bell as the alarm sound

use roomwatch_core::error::AudioError;
use roomwatch_core::ports::{AlarmSound, Tone};
use std::io::{self, IsTerminal, Stderr, Write};
use std::time::Instant;
use tracing::trace;

const BEL: &[u8] = b"\x07";

/// Rings the terminal bell, at most once per tone decay
pub struct TerminalBell<W: Write + Send = Stderr> {
    out: W,
    muted: bool,
    attached: bool,
    last_ring: Option<Instant>,
}

impl TerminalBell<Stderr> {
    /// Bell on stderr; fails as unavailable when stderr is not a terminal
    pub fn stderr() -> Self {
        let attached = io::stderr().is_terminal();
        Self {
            attached,
            ..Self::new(io::stderr())
        }
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            muted: false,
            attached: true,
            last_ring: None,
        }
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self, tone: &Tone) -> Result<(), AudioError> {
        let now = Instant::now();
        if let Some(last) = self.last_ring {
            if now.duration_since(last) < tone.decay() {
                trace!("Bell still ringing, skipped");
                return Ok(());
            }
        }
        self.out
            .write_all(BEL)
            .and_then(|_| self.out.flush())
            .map_err(|_| AudioError::Unavailable)?;
        self.last_ring = Some(now);
        Ok(())
    }
}

impl<W: Write + Send> AlarmSound for TerminalBell<W> {
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        if self.muted {
            return Err(AudioError::Restricted("bell muted".to_string()));
        }
        if !self.attached {
            return Err(AudioError::Unavailable);
        }
        self.ring(tone)
    }
}
