//! Environment-driven settings for the interactive front-end.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use copydir_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig};

pub(crate) const ENV_EXECUTABLE: &str = "COPYDIR_EXE";
pub(crate) const ENV_LOG_LEVEL: &str = "COPYDIR_LOG_LEVEL";
pub(crate) const ENV_LOG_FORMAT: &str = "COPYDIR_LOG_FORMAT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PromptConfig {
    pub(crate) executable: Option<PathBuf>,
    pub(crate) log_level: String,
    pub(crate) log_format: LogFormat,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            executable: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::infer(),
        }
    }
}

impl PromptConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self {
            executable: lookup(ENV_EXECUTABLE)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            ..Self::default()
        };
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse::<LogFormat>()
                .with_context(|| format!("{ENV_LOG_FORMAT} must be `json` or `pretty`"))?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_is_optional() -> Result<()> {
        let config = PromptConfig::from_lookup(|_: &str| None)?;
        assert_eq!(config, PromptConfig::default());
        assert_eq!(config.logging().level, "warn");

        let blank = PromptConfig::from_lookup(|name: &str| {
            (name == ENV_EXECUTABLE).then(|| "   ".to_string())
        })?;
        assert_eq!(blank.executable, None);
        Ok(())
    }

    #[test]
    fn environment_presets_executable_and_logging() -> Result<()> {
        let config = PromptConfig::from_lookup(|name: &str| match name {
            ENV_EXECUTABLE => Some("/opt/copydir/bin/copydir".to_string()),
            ENV_LOG_LEVEL => Some("debug".to_string()),
            ENV_LOG_FORMAT => Some("json".to_string()),
            _ => None,
        })?;
        assert_eq!(
            config.executable,
            Some(PathBuf::from("/opt/copydir/bin/copydir"))
        );
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = PromptConfig::from_lookup(|name: &str| {
            (name == ENV_LOG_FORMAT).then(|| "xml".to_string())
        });
        assert!(result.is_err());
    }
}
