//! # Design
//!
//! - Provide structured, constant-message errors for the copy engine.
//! - Capture operation context (paths, fields) so failures can be logged precisely.
//! - Classify every failure into exactly one [`Outcome`] at the operation boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::outcome::Outcome;

/// Result type for engine internals.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Kind of filesystem entry an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

impl EntryKind {
    /// Label used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// Errors produced while copying or moving filesystem entries.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A required path was empty.
    #[error("fsops missing value")]
    MissingValue {
        /// Field that was empty.
        field: &'static str,
    },
    /// Input validation failures that are not simple omissions.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// The source entry was not found.
    #[error("fsops source missing")]
    SourceMissing {
        /// Expected kind of the source entry.
        kind: EntryKind,
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The destination entry already exists and the policy forbids reusing it.
    #[error("fsops destination exists")]
    DestinationExists {
        /// Kind of the existing destination entry.
        kind: EntryKind,
        /// Path of the existing entry.
        path: PathBuf,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(
        field: &'static str,
        reason: &'static str,
        value: Option<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            reason,
            value,
        }
    }

    pub(crate) fn source_missing(kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        Self::SourceMissing {
            kind,
            path: path.into(),
        }
    }

    pub(crate) fn destination_exists(kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        Self::DestinationExists {
            kind,
            path: path.into(),
        }
    }

    /// Outcome reported to callers for this failure.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::MissingValue { .. } => Outcome::NullData,
            Self::SourceMissing {
                kind: EntryKind::File,
                ..
            } => Outcome::FileDoesNotExist,
            Self::SourceMissing {
                kind: EntryKind::Directory,
                ..
            } => Outcome::DirDoesNotExist,
            Self::DestinationExists {
                kind: EntryKind::File,
                ..
            } => Outcome::OverwriteError,
            Self::DestinationExists {
                kind: EntryKind::Directory,
                ..
            } => Outcome::InvalidMoveLocation,
            Self::Io { source, .. } if source.kind() == io::ErrorKind::AlreadyExists => {
                Outcome::OverwriteError
            }
            Self::Io { .. } | Self::InvalidInput { .. } => Outcome::FailedToCopy,
        }
    }
}
