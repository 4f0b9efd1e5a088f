//! # Operator Commands
//!
//! Text command surface a host wires into its console or chat:
//!
//! | Command  | Output                                   |
//! |----------|------------------------------------------|
//! | `status` | Tier summary line                        |
//! | `stats`  | Bridge state, slot usage, tier summary   |
//! | `cache`  | Gating decisions, skip rate, failures    |
//! | `reset`  | Zeroes the metrics window                |
//! | `help`   | Usage                                    |
//!
//! A leading `/` and letter case are ignored.

use crate::bridge::Bridge;
use crate::diagnostics::DiagnosticsReport;
use crate::error::CommandError;
use crate::timestep::TickAccumulator;

/// Usage text returned by `help`.
pub const USAGE: &str = "usage: status | stats | cache | reset | help";

/// Runs one command line against `bridge`.
///
/// # Errors
///
/// `Empty` for a blank line, `UnknownCommand` for anything unrecognised.
pub fn run_command(bridge: &Bridge, line: &str) -> Result<String, CommandError> {
    dispatch(bridge, None, line)
}

/// As [`run_command`], with the host's accumulator included in reports.
///
/// # Errors
///
/// As [`run_command`].
pub fn run_command_with_timestep(
    bridge: &Bridge,
    timestep: &TickAccumulator,
    line: &str,
) -> Result<String, CommandError> {
    dispatch(bridge, Some(timestep), line)
}

fn dispatch(
    bridge: &Bridge,
    timestep: Option<&TickAccumulator>,
    line: &str,
) -> Result<String, CommandError> {
    let name = line
        .trim()
        .trim_start_matches('/')
        .split_whitespace()
        .next()
        .ok_or(CommandError::Empty)?
        .to_ascii_lowercase();

    let report = || {
        let report = DiagnosticsReport::capture(bridge);
        match timestep {
            Some(acc) => report.with_timestep(acc),
            None => report,
        }
    };

    match name.as_str() {
        "status" => Ok(report().status_line()),
        "stats" => Ok(report().stats_text()),
        "cache" => Ok(report().cache_text()),
        "reset" => {
            bridge.reset_metrics();
            Ok("metrics reset".to_string())
        }
        "help" => Ok(USAGE.to_string()),
        _ => Err(CommandError::UnknownCommand(name)),
    }
}
