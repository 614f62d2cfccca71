//! Capacity-capped reading history owned by the dashboard tick.
//!
//! Backed by a fixed-capacity [`heapless::Deque`]: once full, each new
//! reading evicts the oldest one, so the log always holds the most recent
//! [`TELEMETRY_LOG_CAP`] readings in arrival order.

use heapless::Deque;

use super::reading::SensorReading;
use crate::config::TELEMETRY_LOG_CAP;

#[derive(Debug, Default)]
pub struct TelemetryLog {
    entries: Deque<SensorReading, TELEMETRY_LOG_CAP>,
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Append drained readings in order, trimming from the front.
    /// Returns how many old readings were evicted.
    pub fn append_all(&mut self, readings: impl IntoIterator<Item = SensorReading>) -> usize {
        let mut evicted = 0;
        for reading in readings {
            if self.entries.is_full() {
                self.entries.pop_front();
                evicted += 1;
            }
            // Cannot fail: a slot was freed above when the deque was full.
            let _ = self.entries.push_back(reading);
        }
        evicted
    }

    /// Ordered copy of the history, oldest first.
    pub fn snapshot(&self) -> Vec<SensorReading> {
        self.entries.iter().cloned().collect()
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<&SensorReading> {
        self.entries.back()
    }

    /// Operator annotation on the entry at snapshot position `index`.
    /// Returns `false` when the index is out of range.
    pub fn mark_anomaly(&mut self, index: usize, flagged: bool) -> bool {
        match self.entries.iter_mut().nth(index) {
            Some(reading) => {
                reading.set_anomaly_flag(flagged);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        TELEMETRY_LOG_CAP
    }
}
