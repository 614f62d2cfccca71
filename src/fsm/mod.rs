//! Actuation state machine.
//!
//! ```text
//!                 desired == last_sent
//!            ┌──────────── Stable ◀───────────┐
//!            │                                 │
//!  reading ──┤   desired != last_sent          │
//!            └──▶ elapsed <= dwell ──▶ Debounced (no publish, no update)
//!                 otherwise       ──▶ Transition ──publish ok──▶ commit
//! ```
//!
//! The machine is pure: [`ActuationMachine::decide`] never mutates, and
//! [`ActuationMachine::commit`] is only called by the service after the
//! publisher accepted the command.  State is therefore always the last
//! command *published*, never the last one desired or echoed back.

use core::time::Duration;
use std::time::Instant;

use log::debug;

use crate::app::commands::Command;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Owned by the machine for the lifetime of the controller process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuationState {
    pub last_command_sent: Option<Command>,
    pub last_transition_time: Option<Instant>,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Result of evaluating one desired command against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Desired command equals the last one sent; nothing to do.
    Stable,
    /// A change is wanted but the previous transition is too recent.
    Debounced { elapsed: Duration },
    /// Publish the desired command.
    Transition { from: Option<Command> },
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct ActuationMachine {
    state: ActuationState,
    dwell: Duration,
}

impl ActuationMachine {
    pub fn new(dwell: Duration) -> Self {
        Self {
            state: ActuationState::default(),
            dwell,
        }
    }

    /// Evaluate `desired` at time `now` without changing state.
    ///
    /// A transition is suppressed when the previous one happened `dwell`
    /// or less ago.  Before the first transition there is no reference
    /// time, so the first change is never debounced.
    pub fn decide(&self, desired: Command, now: Instant) -> Decision {
        if self.state.last_command_sent == Some(desired) {
            return Decision::Stable;
        }
        if let Some(last) = self.state.last_transition_time {
            let elapsed = now.saturating_duration_since(last);
            if elapsed <= self.dwell {
                return Decision::Debounced { elapsed };
            }
        }
        Decision::Transition {
            from: self.state.last_command_sent,
        }
    }

    /// Record a successful publish of `command` at `now`.
    pub fn commit(&mut self, command: Command, now: Instant) {
        debug!(
            "actuation commit: {:?} -> {}",
            self.state.last_command_sent, command
        );
        self.state.last_command_sent = Some(command);
        self.state.last_transition_time = Some(now);
    }

    /// Commanded state, `Standby` before anything has been published.
    pub fn current(&self) -> Command {
        self.state.last_command_sent.unwrap_or(Command::Standby)
    }

    pub fn state(&self) -> ActuationState {
        self.state
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }
}
