//! Renderers for the single result line printed by the command.

use std::io::{self, Write};

use copydir_fsops::{Action, Outcome};
use serde::Serialize;

use crate::cli::UsageError;
use crate::config::OutputFormat;

#[derive(Serialize)]
struct OutcomeReport {
    action: Action,
    outcome: Outcome,
    success: bool,
    message: &'static str,
}

pub(crate) fn render_outcome(
    out: &mut impl Write,
    format: OutputFormat,
    action: Action,
    outcome: Outcome,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", outcome.message()),
        OutputFormat::Json => {
            let report = OutcomeReport {
                action,
                outcome,
                success: outcome.is_success(),
                message: outcome.message(),
            };
            let text = serde_json::to_string(&report).map_err(io::Error::other)?;
            writeln!(out, "{text}")
        }
    }
}

pub(crate) fn render_usage(out: &mut impl Write, usage: &UsageError) -> io::Result<()> {
    writeln!(out, "{}", usage.message().trim_end())
}
