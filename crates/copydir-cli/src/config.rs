//! Environment-driven settings for the command-line surface.

use std::env;

use anyhow::{Context, Result, bail};
use copydir_telemetry::{LogFormat, LoggingConfig};

pub(crate) const ENV_LOG_LEVEL: &str = "COPYDIR_LOG_LEVEL";
pub(crate) const ENV_LOG_FORMAT: &str = "COPYDIR_LOG_FORMAT";
pub(crate) const ENV_OUTPUT: &str = "COPYDIR_OUTPUT";
pub(crate) const ENV_NO_PAUSE: &str = "COPYDIR_NO_PAUSE";

/// Only errors reach stderr by default so the result line stands alone.
const DEFAULT_LOG_LEVEL: &str = "error";

/// Rendering of the result line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CliConfig {
    pub(crate) log_level: String,
    pub(crate) log_format: LogFormat,
    pub(crate) output: OutputFormat,
    pub(crate) pause: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::infer(),
            output: OutputFormat::Text,
            pause: true,
        }
    }
}

impl CliConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse::<LogFormat>()
                .with_context(|| format!("{ENV_LOG_FORMAT} must be `json` or `pretty`"))?;
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            config.output = parse_output(&output)?;
        }
        if let Some(flag) = lookup(ENV_NO_PAUSE) {
            config.pause = !parse_flag(ENV_NO_PAUSE, &flag)?;
        }
        Ok(config)
    }

    pub(crate) fn logging(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.log_level,
            format: self.log_format,
        }
    }
}

fn parse_output(value: &str) -> Result<OutputFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => bail!("{ENV_OUTPUT} must be `text` or `json`, got `{other}`"),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => bail!("{name} must be a boolean, got `{other}`"),
    }
}
