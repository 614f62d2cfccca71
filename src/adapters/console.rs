//! Terminal display surface and operator input parsing.
//!
//! [`ConsoleDisplay`] renders each [`DashboardView`] as a plain-text
//! frame: status banner, latest metrics, then the history newest first.
//! The `#` column is the snapshot index that `flag`/`unflag` refer to.
//!
//! Operator input is read on a plain OS thread ([`spawn_operator_input`]).
//! A blocking terminal read cannot be cancelled, so it must never sit on the
//! async runtime's blocking pool where it would hold up shutdown.

use std::io::{self, BufRead, Write};
use std::thread;

use log::warn;
use tokio::sync::mpsc;

use crate::app::commands::{Command, OperatorAction};
use crate::app::ports::{DashboardView, DisplaySurface};
use crate::telemetry::SensorReading;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const HELP: &str = "commands: water | stop | alarm | flag <#> | unflag <#> | quit";

pub fn status_banner(command: Command) -> &'static str {
    match command {
        Command::Watering => "WATERING (ON)",
        Command::Alarm => "DANGER (ALARM)",
        Command::Standby => "STANDBY",
    }
}

fn light_label(bright: bool) -> &'static str {
    if bright { "Bright" } else { "Dark" }
}

pub struct ConsoleDisplay<W: Write> {
    out: W,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, view: &DashboardView<'_>) -> std::io::Result<()> {
        let out = &mut self.out;
        writeln!(out, "==================== SMART GARDEN ====================")?;
        writeln!(out, "Status: {}", status_banner(view.status))?;

        let Some(latest) = view.readings.last() else {
            writeln!(out, "Waiting for sensor data...")?;
            writeln!(out, "{HELP}")?;
            return out.flush();
        };

        writeln!(
            out,
            "Temperature {:.1} °C | Air {:.1} % | Soil {:.1} % | Light {}",
            latest.temperature(),
            latest.air_humidity(),
            latest.soil_humidity(),
            light_label(latest.light_level()),
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "{:>3}  {:<19}  {:>6}  {:>6}  {:>6}  {:<6}  {}",
            "#", "time", "temp", "air", "soil", "light", "anomaly"
        )?;
        for (index, reading) in view.readings.iter().enumerate().rev() {
            write_row(out, index, reading)?;
        }
        writeln!(out, "{HELP}")?;
        out.flush()
    }
}

fn write_row(out: &mut impl Write, index: usize, r: &SensorReading) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>3}  {:<19}  {:>6.1}  {:>6.1}  {:>6.1}  {:<6}  {}",
        index,
        r.timestamp().format(TIME_FORMAT),
        r.temperature(),
        r.air_humidity(),
        r.soil_humidity(),
        light_label(r.light_level()),
        if r.anomaly_flag() { "yes" } else { "" },
    )
}

impl<W: Write> DisplaySurface for ConsoleDisplay<W> {
    fn render(&mut self, view: &DashboardView<'_>) {
        if let Err(e) = self.write_frame(view) {
            warn!("display write failed: {e}");
        }
    }
}

/// Parse one line of operator input.
pub fn parse_operator_line(line: &str) -> Result<OperatorAction, &'static str> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or("empty command")?;
    let action = match verb.to_ascii_lowercase().as_str() {
        "water" => OperatorAction::SetCommand(Command::Watering),
        "stop" => OperatorAction::SetCommand(Command::Standby),
        "alarm" => OperatorAction::SetCommand(Command::Alarm),
        "quit" | "exit" => OperatorAction::Quit,
        verb @ ("flag" | "unflag") => {
            let index = words
                .next()
                .ok_or("missing entry number")?
                .parse::<usize>()
                .map_err(|_| "entry number must be a non-negative integer")?;
            OperatorAction::MarkAnomaly {
                index,
                flagged: verb == "flag",
            }
        }
        _ => return Err("unknown command"),
    };
    if words.next().is_some() {
        return Err("unexpected trailing input");
    }
    Ok(action)
}

/// Read operator lines from `input` on a detached thread and forward parsed
/// actions into `actions`.
///
/// The thread stops after forwarding `quit`, at end of input, or once the
/// receiver is gone.  Nothing joins it: the process may exit while it is
/// still blocked on a read.
pub fn spawn_operator_input<R>(
    input: R,
    actions: mpsc::Sender<OperatorAction>,
) -> io::Result<thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("operator-input".into())
        .spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_operator_line(&line) {
                    Ok(action) => {
                        let quit = action == OperatorAction::Quit;
                        if actions.blocking_send(action).is_err() || quit {
                            break;
                        }
                    }
                    Err(e) => warn!("{e}: {line:?} ({HELP})"),
                }
            }
        })
}
