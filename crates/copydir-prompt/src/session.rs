//! Question/answer loop that turns terminal answers into a `copydir` invocation.
//!
//! # Design
//! - Reader, writer, and launcher are injected so the loop runs against buffers in tests.
//! - End of input ends the session cleanly instead of re-asking forever.
//! - The child reports a JSON line; its outcome code is mapped back to the fixed
//!   message, and unknown codes fall back to the generic error message.
//! - Lines that are not a JSON report (usage and help text) are relayed verbatim.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use copydir_fsops::{Action, Outcome, describe};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::PromptConfig;
use crate::launcher::{CommandLauncher, ProcessLauncher};

const NULL_PATH_TOKEN: &str = "*";

const ASK_EXECUTABLE: &str = "Please enter the path to the copydir executable";
const ASK_ACTION: &str = "Which operation would you like to carry out? (copy, move)";
const ASK_SOURCE: &str = "Please enter the source path of the file/directory to be worked with.";
const ASK_DESTINATION: &str = "Please enter the path of the destination to place the \
    file/directory. This includes name and extension for single files";
const ASK_SINGLE_FILE: &str = "Are you affecting a single file? [Y]es, [N]o";
const ASK_OVERWRITE: &str = "Would you like to overwrite any files with the same name? [Y]es, [N]o";
const ASK_MERGE: &str = "If the destination directory already exists, would you like to merge \
    it with the source directory? [Y]es, [N]o";
const ASK_CONTINUE: &str = "Would you like to continue? [Y]es, [N]o";
const REASK_ACTION: &str = "Please enter one of: copy, move";
const REASK_YES_NO: &str = "Please enter yes, no, or either of the initials (y/n).";
const LAUNCH_FAILED: &str = "Please check parameters and try again";

/// Fields read back from the child's JSON result line.
#[derive(Debug, Deserialize)]
struct ReportedOutcome {
    outcome: String,
}

/// Reasons a prompt session stops.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    /// The input stream reached end of file.
    #[error("input closed")]
    InputClosed,
    /// Reading an answer failed.
    #[error("failed to read answer")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing a question or result failed.
    #[error("failed to write to terminal")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

type SessionResult<T> = Result<T, SessionError>;

/// Runs the interactive loop on the process terminal. Returns the process exit code.
pub fn run() -> i32 {
    let config = match PromptConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return 2;
        }
    };
    if let Err(err) = copydir_telemetry::init_logging(&config.logging()) {
        eprintln!("warning: {err}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), CommandLauncher);
    match session.run(config.executable) {
        Ok(()) | Err(SessionError::InputClosed) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

pub(crate) struct Session<R, W, L> {
    input: R,
    output: W,
    launcher: L,
}

impl<R: BufRead, W: Write, L: ProcessLauncher> Session<R, W, L> {
    pub(crate) const fn new(input: R, output: W, launcher: L) -> Self {
        Self {
            input,
            output,
            launcher,
        }
    }

    /// Repeats operations until the user declines to continue.
    pub(crate) fn run(&mut self, preset: Option<PathBuf>) -> SessionResult<()> {
        let executable = match preset {
            Some(path) => path,
            None => self.ask_executable()?,
        };
        loop {
            let args = self.ask_arguments()?;
            if !self.launch(&executable, &args)? {
                continue;
            }
            if !self.ask_yes_no(ASK_CONTINUE)? {
                return Ok(());
            }
        }
    }

    fn launch(&mut self, executable: &Path, args: &[String]) -> SessionResult<bool> {
        match self.launcher.launch(executable, args) {
            Ok(result) => {
                info!(status = ?result.status, "copydir finished");
                self.say(result_message(result.result_line()))?;
                Ok(true)
            }
            Err(err) => {
                warn!(
                    executable = %executable.display(),
                    error = %err,
                    "failed to launch copydir"
                );
                self.say(LAUNCH_FAILED)?;
                Ok(false)
            }
        }
    }

    fn ask_executable(&mut self) -> SessionResult<PathBuf> {
        self.say(ASK_EXECUTABLE)?;
        loop {
            let answer = self.read_answer()?;
            if !answer.is_empty() {
                return Ok(PathBuf::from(answer));
            }
        }
    }

    fn ask_arguments(&mut self) -> SessionResult<Vec<String>> {
        let action = self.ask_action()?;
        let source = self.ask_path(ASK_SOURCE)?;
        let destination = self.ask_path(ASK_DESTINATION)?;
        let single_file = self.ask_yes_no(ASK_SINGLE_FILE)?;
        let overwrite = self.ask_yes_no(ASK_OVERWRITE)?;
        let merge = self.ask_yes_no(ASK_MERGE)?;
        Ok(build_arguments(
            action,
            source,
            destination,
            single_file,
            merge,
            overwrite,
        ))
    }

    fn ask_action(&mut self) -> SessionResult<Action> {
        self.say(ASK_ACTION)?;
        loop {
            match self.read_answer()?.to_ascii_lowercase().as_str() {
                "copy" => return Ok(Action::Copy),
                "move" => return Ok(Action::Move),
                _ => self.say(REASK_ACTION)?,
            }
        }
    }

    fn ask_path(&mut self, question: &str) -> SessionResult<String> {
        self.say(question)?;
        let answer = self.read_answer()?;
        Ok(if answer.is_empty() {
            NULL_PATH_TOKEN.to_string()
        } else {
            answer
        })
    }

    fn ask_yes_no(&mut self, question: &str) -> SessionResult<bool> {
        self.say(question)?;
        loop {
            match parse_yes_no(&self.read_answer()?) {
                Some(answer) => return Ok(answer),
                None => self.say(REASK_YES_NO)?,
            }
        }
    }

    fn say(&mut self, text: &str) -> SessionResult<()> {
        writeln!(self.output, "{text}")
            .and_then(|()| self.output.flush())
            .map_err(|source| SessionError::Write { source })
    }

    fn read_answer(&mut self) -> SessionResult<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| SessionError::Read { source })?;
        if read == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}

/// Message shown for the child's result line.
fn result_message(line: Option<&str>) -> &str {
    let Some(line) = line else {
        return describe(None);
    };
    let Ok(report) = serde_json::from_str::<ReportedOutcome>(line) else {
        return line;
    };
    match report.outcome.parse::<Outcome>() {
        Ok(outcome) => outcome.message(),
        Err(err) => {
            warn!(code = %err.code, "copydir reported an unknown outcome");
            describe(None)
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn build_arguments(
    action: Action,
    source: String,
    destination: String,
    single_file: bool,
    merge: bool,
    overwrite: bool,
) -> Vec<String> {
    let mut args = vec![action.as_str().to_string(), source, destination];
    for (enabled, flag) in [(single_file, "-f"), (merge, "-m"), (overwrite, "-o")] {
        if enabled {
            args.push(flag.to_string());
        }
    }
    args
}
