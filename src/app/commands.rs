//! Actuator commands and operator actions.
//!
//! [`Command`] is the closed set of values carried on the retained control
//! topic.  [`OperatorAction`] is what the dashboard's human operator can
//! ask the [`DashboardService`](super::dashboard::DashboardService) to do.

use core::fmt;
use core::str::FromStr;

/// Commanded actuator state.  No precedence is defined between variants;
/// transitions are gated by time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Standby,
    /// Irrigation pump on.
    Watering,
    Alarm,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Standby, Command::Watering, Command::Alarm];

    /// Plain-text payload on the control topic.
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Standby => "STANDBY",
            Self::Watering => "POMPA_ON",
            Self::Alarm => "ALARM_ON",
        }
    }

    /// Map a classifier label (`0`, `1`, `2`) to its command.
    pub const fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::Standby),
            1 => Some(Self::Watering),
            2 => Some(Self::Alarm),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A control-topic payload that is not one of the three known commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown control payload '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_wire() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Requests coming from the dashboard operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorAction {
    /// Manual override: publish this command immediately.
    SetCommand(Command),
    /// Annotate the history entry at snapshot position `index`.
    MarkAnomaly { index: usize, flagged: bool },
    /// Close the dashboard.
    Quit,
}
