//! Closed set of results produced by every engine operation.
//!
//! # Design
//! - Outcomes drive control flow; messages are a derived view and are never compared.
//! - The message mapping is total: unknown codes fall back to a generic message.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

/// Message shown when a result cannot be mapped to a known outcome.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again. \
    If you keep getting this error, check the values inputted.";

/// Result code of a copy or move operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The source directory does not exist or is not a directory.
    DirDoesNotExist,
    /// The source file does not exist.
    FileDoesNotExist,
    /// An I/O failure other than an existence or overwrite conflict.
    FailedToCopy,
    /// Copy finished without errors.
    CopiedSuccessfully,
    /// Move finished and the source was removed.
    MovedSuccessfully,
    /// Move finished but removing the source failed.
    MovedWithCleanupWarning,
    /// Target directory already exists and merging was not requested.
    InvalidMoveLocation,
    /// Target file already exists and overwriting was not requested.
    OverwriteError,
    /// A required path was empty.
    NullData,
}

impl Outcome {
    /// Every outcome, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::DirDoesNotExist,
        Self::FileDoesNotExist,
        Self::FailedToCopy,
        Self::CopiedSuccessfully,
        Self::MovedSuccessfully,
        Self::MovedWithCleanupWarning,
        Self::InvalidMoveLocation,
        Self::OverwriteError,
        Self::NullData,
    ];

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DirDoesNotExist => "dir_does_not_exist",
            Self::FileDoesNotExist => "file_does_not_exist",
            Self::FailedToCopy => "failed_to_copy",
            Self::CopiedSuccessfully => "copied_successfully",
            Self::MovedSuccessfully => "moved_successfully",
            Self::MovedWithCleanupWarning => "moved_with_cleanup_warning",
            Self::InvalidMoveLocation => "invalid_move_location",
            Self::OverwriteError => "overwrite_error",
            Self::NullData => "null_data",
        }
    }

    /// User-facing message for this outcome.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CopiedSuccessfully => "Copied successfully.",
            Self::MovedSuccessfully => "Moved successfully.",
            Self::MovedWithCleanupWarning => {
                "Moved successfully, but the source could not be fully removed."
            }
            Self::FailedToCopy => {
                "An error occurred during the operation. \
                 Please ensure there is enough space and try again."
            }
            Self::DirDoesNotExist => "Directory does not exist. Please ensure path is correct.",
            Self::FileDoesNotExist => "File does not exist. Please ensure path is correct.",
            Self::NullData => "Please input all data required.",
            Self::InvalidMoveLocation => {
                "Merge directories option is set to false and there is already a directory \
                 at the destination location."
            }
            Self::OverwriteError => {
                "Input/Output error. Copy was invoked with param 'overwrite' set to false \
                 and at least one file already exists. Please set to true and try again."
            }
        }
    }

    /// Whether the operation reached its goal.
    ///
    /// A move whose source cleanup failed still counts as a success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::CopiedSuccessfully | Self::MovedSuccessfully | Self::MovedWithCleanupWarning
        )
    }

    /// Process exit code reported by the command-line surface.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

impl Display for Outcome {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.message())
    }
}

/// Error returned when parsing an unknown outcome code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome code")]
pub struct UnknownOutcome {
    /// Code that failed to parse.
    pub code: String,
}

impl FromStr for Outcome {
    type Err = UnknownOutcome;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.code() == value)
            .ok_or_else(|| UnknownOutcome {
                code: value.to_string(),
            })
    }
}

/// Message for an optional outcome; `None` maps to the generic error message.
#[must_use]
pub const fn describe(outcome: Option<Outcome>) -> &'static str {
    match outcome {
        Some(outcome) => outcome.message(),
        None => UNEXPECTED_ERROR_MESSAGE,
    }
}
