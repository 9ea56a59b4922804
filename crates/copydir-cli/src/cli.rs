//! Argument grammar and dispatch for the `copydir` command.
//!
//! Grammar: `copydir <copy|move> <sourcePath> <destinationPath> [-f] [-m] [-o]`,
//! with the flags accepted in any order.

use std::ffi::OsString;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use copydir_fsops::{Action, OperationRequest, service};
use tracing::{debug, warn};

use crate::config::CliConfig;
use crate::output;

/// Path placeholder the interactive prompt sends for "no value".
const NULL_PATH_TOKEN: &str = "*";

#[derive(Parser, Debug)]
#[command(
    name = "copydir",
    about = "Copy or move a file or directory tree",
    disable_version_flag = true
)]
struct Cli {
    #[arg(value_enum, help = "Operation to perform")]
    action: ActionArg,
    #[arg(help = "Source file or directory")]
    source: OsString,
    #[arg(help = "Destination directory, or the full target file path with -f")]
    destination: OsString,
    #[arg(short = 'f', help = "Operate on a single file instead of a directory tree")]
    single_file: bool,
    #[arg(short = 'm', help = "Merge into an existing destination directory")]
    merge: bool,
    #[arg(short = 'o', help = "Overwrite files that already exist")]
    overwrite: bool,
}

impl Cli {
    fn into_request(self) -> OperationRequest {
        OperationRequest::new(
            self.action.into(),
            path_arg(self.source),
            path_arg(self.destination),
        )
        .single_file(self.single_file)
        .overwrite(self.overwrite)
        .merge_directories(self.merge)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ActionArg {
    Copy,
    Move,
}

impl From<ActionArg> for Action {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Copy => Self::Copy,
            ActionArg::Move => Self::Move,
        }
    }
}

/// Reasons the command ran no operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UsageError {
    NoArguments,
    InvalidArguments,
    Help(String),
}

impl UsageError {
    pub(crate) fn message(&self) -> &str {
        match self {
            Self::NoArguments => {
                "Please supply arguments: <copy|move> <sourcePath> <destinationPath> [-f] [-m] [-o]"
            }
            Self::InvalidArguments => {
                "Please check the arguments and try again. \
                 Usage: <copy|move> <sourcePath> <destinationPath> [-f] [-m] [-o]"
            }
            Self::Help(text) => text,
        }
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Help(_) => 0,
            Self::NoArguments | Self::InvalidArguments => 2,
        }
    }
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for UsageError {}

/// Parses the process arguments, runs the requested operation, prints the
/// result line, and optionally waits for a line on stdin. Returns the process
/// exit code.
pub fn run() -> i32 {
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return 2;
        }
    };
    if let Err(err) = copydir_telemetry::init_logging(&config.logging()) {
        eprintln!("warning: {err}");
    }

    let exit_code = dispatch(std::env::args_os().skip(1), &config, &mut io::stdout().lock());

    if config.pause && io::stdin().is_terminal() {
        wait_for_line(&mut io::stdin().lock());
    }
    exit_code
}

pub(crate) fn dispatch(
    args: impl IntoIterator<Item = OsString>,
    config: &CliConfig,
    out: &mut impl Write,
) -> i32 {
    let (rendered, exit_code) = match parse_args(args) {
        Ok(request) => {
            debug!(
                action = %request.action(),
                source = %request.source_path().display(),
                destination = %request.destination_path().display(),
                single_file = request.is_single_file(),
                overwrite = request.allows_overwrite(),
                merge = request.allows_merge(),
                "executing request"
            );
            let outcome = service::execute(&request);
            (
                output::render_outcome(out, config.output, request.action(), outcome),
                outcome.exit_code(),
            )
        }
        Err(usage) => (output::render_usage(out, &usage), usage.exit_code()),
    };
    if let Err(err) = rendered {
        warn!(error = %err, "failed to write result line");
    }
    exit_code
}

pub(crate) fn parse_args(
    args: impl IntoIterator<Item = OsString>,
) -> Result<OperationRequest, UsageError> {
    let args: Vec<OsString> = args.into_iter().collect();
    if args.is_empty() {
        return Err(UsageError::NoArguments);
    }

    let argv = std::iter::once(OsString::from("copydir")).chain(args);
    match Cli::try_parse_from(argv) {
        Ok(cli) => Ok(cli.into_request()),
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            Err(UsageError::Help(err.render().to_string()))
        }
        Err(err) => {
            debug!(kind = %err.kind(), "argument parsing failed");
            Err(UsageError::InvalidArguments)
        }
    }
}

fn path_arg(value: OsString) -> PathBuf {
    if value == NULL_PATH_TOKEN {
        PathBuf::new()
    } else {
        PathBuf::from(value)
    }
}

fn wait_for_line(input: &mut impl BufRead) {
    let mut line = String::new();
    if let Err(err) = input.read_line(&mut line) {
        debug!(error = %err, "failed to read from stdin");
    }
}
