//! Operation requests accepted by the copy engine.
//!
//! # Design
//! - Requests are immutable once built; flags are set through consuming builders.
//! - Validation is explicit and runs before any filesystem access.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{FsOpsError, FsOpsResult};

/// Requested operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Replicate the source at the destination.
    Copy,
    /// Replicate the source, then remove it.
    Move,
}

impl Action {
    /// Lowercase name, as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
        }
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A single copy or move invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRequest {
    action: Action,
    source_path: PathBuf,
    destination_path: PathBuf,
    single_file: bool,
    overwrite: bool,
    merge_directories: bool,
}

impl OperationRequest {
    /// Directory-mode request with overwrite and merge disabled.
    #[must_use]
    pub fn new(
        action: Action,
        source_path: impl Into<PathBuf>,
        destination_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            action,
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            single_file: false,
            overwrite: false,
            merge_directories: false,
        }
    }

    /// Operate on one file; the destination must name the target file.
    #[must_use]
    pub const fn single_file(mut self, enabled: bool) -> Self {
        self.single_file = enabled;
        self
    }

    /// Replace files that already exist at the destination.
    #[must_use]
    pub const fn overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    /// Blend into an existing destination directory instead of failing.
    #[must_use]
    pub const fn merge_directories(mut self, enabled: bool) -> Self {
        self.merge_directories = enabled;
        self
    }

    /// Requested action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Source file or directory.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Destination path (full file path in single-file mode, parent directory otherwise).
    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Whether the request targets a single file.
    #[must_use]
    pub const fn is_single_file(&self) -> bool {
        self.single_file
    }

    /// Whether existing files may be replaced.
    #[must_use]
    pub const fn allows_overwrite(&self) -> bool {
        self.overwrite
    }

    /// Whether an existing target directory may be merged into.
    #[must_use]
    pub const fn allows_merge(&self) -> bool {
        self.merge_directories
    }

    /// Check the request before execution.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::MissingValue`] when a path is empty, or when a
    /// single-file destination does not name the target file.
    pub fn validate(&self) -> FsOpsResult<()> {
        require_path("source_path", &self.source_path)?;
        require_path("destination_path", &self.destination_path)?;
        if self.single_file && !names_file(&self.destination_path) {
            return Err(FsOpsError::MissingValue {
                field: "destination_file_name",
            });
        }
        Ok(())
    }
}

pub(crate) fn require_path(field: &'static str, path: &Path) -> FsOpsResult<()> {
    if path.as_os_str().is_empty() {
        return Err(FsOpsError::MissingValue { field });
    }
    Ok(())
}

fn names_file(destination: &Path) -> bool {
    matches!(destination.components().next_back(), Some(Component::Normal(_)))
        && !destination.is_dir()
}
