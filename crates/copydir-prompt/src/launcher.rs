//! Process launching seam used by the prompt loop.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Variable that stops the child command from waiting for a key press.
pub const NO_PAUSE_ENV: &str = "COPYDIR_NO_PAUSE";
/// Variable that selects the child's result line format.
pub const OUTPUT_ENV: &str = "COPYDIR_OUTPUT";

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    /// Exit status, when the process exited normally.
    pub status: Option<i32>,
    /// Everything the process wrote to stdout.
    pub stdout: String,
}

impl LaunchOutput {
    /// First non-blank line of the captured output.
    #[must_use]
    pub fn result_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Runs a program with an argument list and waits for it to finish.
pub trait ProcessLauncher {
    /// Launch `program` with `args` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be started or waited on.
    fn launch(&self, program: &Path, args: &[String]) -> io::Result<LaunchOutput>;
}

/// Launcher backed by [`std::process::Command`].
///
/// The child inherits stderr so its log lines stay visible and reads from a null
/// stdin. It runs with pausing disabled and reports its result as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher;

impl ProcessLauncher for CommandLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> io::Result<LaunchOutput> {
        debug!(program = %program.display(), ?args, "launching copydir");
        let output = Command::new(program)
            .args(args)
            .env(NO_PAUSE_ENV, "1")
            .env(OUTPUT_ENV, "json")
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(LaunchOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_line_skips_leading_blank_lines() {
        let output = LaunchOutput {
            status: Some(0),
            stdout: "\n  \nCopied successfully.\nextra\n".to_string(),
        };
        assert_eq!(output.result_line(), Some("Copied successfully."));
        assert_eq!(LaunchOutput::default().result_line(), None);
    }

    #[test]
    fn missing_program_fails_to_launch() {
        let launched = CommandLauncher.launch(
            Path::new("/definitely/not/a/copydir/binary"),
            &["copy".to_string()],
        );
        assert!(launched.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn child_runs_unpaused_with_json_output() -> io::Result<()> {
        let script = format!("printf '%s\\n' \"${NO_PAUSE_ENV}\" \"${OUTPUT_ENV}\" \"$0\"");
        let output = CommandLauncher.launch(
            Path::new("/bin/sh"),
            &["-c".to_string(), script, "first-arg".to_string()],
        )?;
        assert_eq!(output.status, Some(0));
        assert_eq!(output.stdout, "1\njson\nfirst-arg\n");
        Ok(())
    }
}
