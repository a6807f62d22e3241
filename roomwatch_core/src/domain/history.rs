//! Bounded temperature log
//!
//! Fixed-capacity ring of recent temperature samples. Pushing past capacity
//! overwrites the oldest sample; rendering never mutates the buffer.

use super::reading::SensorValue;
use chrono::{DateTime, Local};

/// Default number of retained samples
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Text rendered when the log is empty
pub const EMPTY_LOG: &str = "No logs";

/// One logged temperature sample
///
/// Keeps the delivered scalar as is, so numeric text like `23.50` is logged
/// exactly as the store sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub time: DateTime<Local>,
    pub value: SensorValue,
}

impl HistoryEntry {
    pub fn new(time: DateTime<Local>, value: impl Into<SensorValue>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }

    /// Log line, e.g. `14:02:11 - T: 24.5 °C`
    pub fn log_line(&self) -> String {
        format!("{} - T: {} °C", self.time.format("%H:%M:%S"), self.value)
    }
}

/// Ring buffer of temperature samples in arrival order
#[derive(Debug, Clone)]
pub struct TemperatureHistory {
    /// Ring storage
    data: Vec<HistoryEntry>,
    /// Maximum capacity
    capacity: usize,
    /// Index of the oldest entry once the ring has wrapped
    head: usize,
}

impl TemperatureHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.data.len() < self.capacity {
            self.data.push(entry);
        } else {
            self.data[self.head] = entry;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }

    /// Entry at logical index (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        if index >= self.data.len() {
            return None;
        }
        self.data.get((self.head + index) % self.data.len())
    }

    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + '_ {
        let (wrapped, recent) = self.data.split_at(self.head);
        recent.iter().chain(wrapped.iter())
    }

    /// Entries most recent first
    pub fn render(&self) -> Vec<&HistoryEntry> {
        self.iter().rev().collect()
    }

    /// Log lines most recent first, or the empty-log marker
    pub fn render_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![EMPTY_LOG.to_string()];
        }
        self.iter().rev().map(HistoryEntry::log_line).collect()
    }
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
