//! Dashboard hand-off buffer.
//!
//! Bridges the MQTT receive task with the periodic render loop.  Both
//! sides share one `Arc<HandoffBuffer>`; every access goes through a
//! single `embassy-sync` blocking mutex, so a drain observes either all
//! of a concurrent push or none of it.
//!
//! ```text
//! ┌──────────────┐ push / set_control ┌───────────────┐ drain / read_control ┌─────────────┐
//! │ receive task │───────────────────▶│ HandoffBuffer │◀─────────────────────│ render tick │
//! └──────────────┘                    └───────────────┘                      └─────────────┘
//! ```

use core::cell::RefCell;
use core::mem;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::app::commands::Command;
use crate::telemetry::SensorReading;

#[derive(Debug)]
struct Inner {
    pending: Vec<SensorReading>,
    control: Command,
}

pub struct HandoffBuffer {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl HandoffBuffer {
    pub fn new(initial: Command) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                pending: Vec::new(),
                control: initial,
            })),
        }
    }

    /// Queue a decoded reading for the next drain.
    pub fn push(&self, reading: SensorReading) {
        self.inner.lock(|cell| cell.borrow_mut().pending.push(reading));
    }

    /// Record the command last seen on (or sent to) the control topic.
    pub fn set_control(&self, command: Command) {
        self.inner.lock(|cell| cell.borrow_mut().control = command);
    }

    /// Take every pending reading, in arrival order, leaving the buffer empty.
    pub fn drain(&self) -> Vec<SensorReading> {
        self.inner
            .lock(|cell| mem::take(&mut cell.borrow_mut().pending))
    }

    pub fn read_control(&self) -> Command {
        self.inner.lock(|cell| cell.borrow().control)
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().pending.len())
    }
}

impl Default for HandoffBuffer {
    fn default() -> Self {
        Self::new(Command::Standby)
    }
}
