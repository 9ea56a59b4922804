//! Copy engine: single-file primitives and the depth-first directory walker.
//!
//! # Design
//! - Every public operation returns an [`Outcome`]; internal steps use [`FsOpsResult`]
//!   and are translated (and logged) once at the operation boundary.
//! - Directory levels are listed fresh from the filesystem; no tree model is kept.
//! - The walker is fail-fast and never rolls back: entries copied before a failure
//!   stay on disk.
//! - Removing the source after a successful move is best effort; a failure there is
//!   logged and reported as [`Outcome::MovedWithCleanupWarning`].

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{EntryKind, FsOpsError, FsOpsResult};
use crate::model::{Action, OperationRequest, require_path};
use crate::outcome::Outcome;

/// Validate a request and run the matching operation.
#[must_use]
pub fn execute(request: &OperationRequest) -> Outcome {
    if let Err(err) = request.validate() {
        return report_failure("validate", &err);
    }

    let source = request.source_path();
    let destination = request.destination_path();
    let overwrite = request.allows_overwrite();
    let merge = request.allows_merge();
    match (request.action(), request.is_single_file()) {
        (Action::Copy, true) => copy_file(source, destination, overwrite),
        (Action::Move, true) => move_file(source, destination, overwrite),
        (Action::Copy, false) => copy_directory(source, destination, overwrite, merge),
        (Action::Move, false) => move_directory(source, destination, overwrite, merge),
    }
}

/// Copy one file to `destination`, which must include the target file name.
#[must_use]
pub fn copy_file(source: &Path, destination: &Path, overwrite: bool) -> Outcome {
    match try_copy_file(source, destination, overwrite) {
        Ok(()) => Outcome::CopiedSuccessfully,
        Err(err) => report_failure("copy_file", &err),
    }
}

/// Copy one file, then remove the source if the copy succeeded.
#[must_use]
pub fn move_file(source: &Path, destination: &Path, overwrite: bool) -> Outcome {
    let copied = copy_file(source, destination, overwrite);
    if copied != Outcome::CopiedSuccessfully {
        return copied;
    }
    finish_move(
        fs::remove_file(source)
            .map_err(|err| FsOpsError::io("move_file.remove_source", source, err)),
    )
}

/// Copy the tree rooted at `source` into `destination/<source name>`.
#[must_use]
pub fn copy_directory(source: &Path, destination: &Path, overwrite: bool, merge: bool) -> Outcome {
    match try_copy_directory(source, destination, overwrite, merge) {
        Ok(target) => {
            info!(
                source = %source.display(),
                target = %target.display(),
                "directory copied"
            );
            Outcome::CopiedSuccessfully
        }
        Err(err) => report_failure("copy_directory", &err),
    }
}

/// Copy the tree like [`copy_directory`], then remove the source tree.
#[must_use]
pub fn move_directory(source: &Path, destination: &Path, overwrite: bool, merge: bool) -> Outcome {
    let copied = copy_directory(source, destination, overwrite, merge);
    if copied != Outcome::CopiedSuccessfully {
        return copied;
    }
    finish_move(
        fs::remove_dir_all(source)
            .map_err(|err| FsOpsError::io("move_directory.remove_source", source, err)),
    )
}

fn finish_move(cleanup: FsOpsResult<()>) -> Outcome {
    match cleanup {
        Ok(()) => Outcome::MovedSuccessfully,
        Err(err) => {
            let outcome = Outcome::MovedWithCleanupWarning;
            log_failure("move.cleanup", &err, outcome);
            outcome
        }
    }
}

fn try_copy_file(source: &Path, destination: &Path, overwrite: bool) -> FsOpsResult<()> {
    require_path("source_path", source)?;
    require_path("destination_path", destination)?;

    let metadata = fs::metadata(source).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => FsOpsError::source_missing(EntryKind::File, source),
        _ => FsOpsError::io("copy_file.inspect_source", source, err),
    })?;
    if !metadata.is_file() {
        return Err(FsOpsError::invalid(
            "source_path",
            "not_a_file",
            Some(source.display().to_string()),
        ));
    }

    if fs::symlink_metadata(destination).is_ok() {
        if !overwrite {
            return Err(FsOpsError::destination_exists(EntryKind::File, destination));
        }
        // fs::copy truncates the destination before reading the source.
        if same_entry(source, destination)? {
            return Err(FsOpsError::invalid(
                "destination_path",
                "same_as_source",
                Some(destination.display().to_string()),
            ));
        }
    }

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        "copying file"
    );
    fs::copy(source, destination)
        .map_err(|err| FsOpsError::io("copy_file.copy", destination, err))?;
    Ok(())
}

fn try_copy_directory(
    source: &Path,
    destination: &Path,
    overwrite: bool,
    merge: bool,
) -> FsOpsResult<PathBuf> {
    require_path("source_path", source)?;
    require_path("destination_path", destination)?;
    if !source.is_dir() {
        return Err(FsOpsError::source_missing(EntryKind::Directory, source));
    }

    let target = destination.join(base_name(source)?);
    if !merge && target.is_dir() {
        return Err(FsOpsError::destination_exists(EntryKind::Directory, &target));
    }
    reject_nested_target(source, &target)?;

    copy_level(source, &target, overwrite, merge)?;
    Ok(target)
}

fn copy_level(source: &Path, target: &Path, overwrite: bool, merge: bool) -> FsOpsResult<()> {
    ensure_target(target, merge)?;
    info!(
        source = %source.display(),
        target = %target.display(),
        "copying directory"
    );

    let (files, directories) = list_entries(source)?;
    for file in &files {
        try_copy_file(file, &target.join(entry_name(file)?), overwrite)?;
    }
    for directory in &directories {
        copy_level(
            directory,
            &target.join(entry_name(directory)?),
            overwrite,
            merge,
        )?;
    }
    Ok(())
}

fn ensure_target(target: &Path, merge: bool) -> FsOpsResult<()> {
    match fs::metadata(target) {
        Ok(metadata) if metadata.is_dir() => {
            if !merge {
                return Err(FsOpsError::destination_exists(EntryKind::Directory, target));
            }
            debug!(target = %target.display(), "merging into existing directory");
            Ok(())
        }
        Ok(_) => Err(FsOpsError::invalid(
            "destination_path",
            "target_not_directory",
            Some(target.display().to_string()),
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(target)
            .map_err(|err| FsOpsError::io("copy_directory.create_target", target, err)),
        Err(err) => Err(FsOpsError::io("copy_directory.inspect_target", target, err)),
    }
}

/// Regular files and directories directly under `directory`, each sorted by name.
///
/// Symlinks are followed; entries that are neither (sockets, dangling links) are skipped
/// with a warning, and a move removes them along with the source tree.
fn list_entries(directory: &Path) -> FsOpsResult<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut paths = fs::read_dir(directory)
        .map_err(|err| FsOpsError::io("copy_directory.read_dir", directory, err))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|err| FsOpsError::io("copy_directory.read_entry", directory, err))?;
    paths.sort();

    let (directories, others): (Vec<_>, Vec<_>) = paths.into_iter().partition(|path| path.is_dir());
    let files = others
        .into_iter()
        .filter(|path| {
            let is_file = path.is_file();
            if !is_file {
                warn!(
                    path = %path.display(),
                    "skipping entry that is neither a file nor a directory"
                );
            }
            is_file
        })
        .collect();
    Ok((files, directories))
}

fn entry_name(path: &Path) -> FsOpsResult<&OsStr> {
    path.file_name().ok_or_else(|| {
        FsOpsError::invalid(
            "source_path",
            "no_entry_name",
            Some(path.display().to_string()),
        )
    })
}

fn base_name(source: &Path) -> FsOpsResult<OsString> {
    if let Some(name) = source.file_name() {
        return Ok(name.to_os_string());
    }
    let resolved = fs::canonicalize(source)
        .map_err(|err| FsOpsError::io("copy_directory.resolve_source", source, err))?;
    resolved.file_name().map(OsStr::to_os_string).ok_or_else(|| {
        FsOpsError::invalid(
            "source_path",
            "no_base_name",
            Some(source.display().to_string()),
        )
    })
}

fn reject_nested_target(source: &Path, target: &Path) -> FsOpsResult<()> {
    let source_resolved = fs::canonicalize(source)
        .map_err(|err| FsOpsError::io("copy_directory.resolve_source", source, err))?;
    let target_resolved = resolve_partial(target)
        .map_err(|err| FsOpsError::io("copy_directory.resolve_target", target, err))?;
    if target_resolved.starts_with(&source_resolved) {
        return Err(FsOpsError::invalid(
            "destination_path",
            "inside_source",
            Some(target.display().to_string()),
        ));
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and append the rest verbatim.
fn resolve_partial(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing: Vec<&OsStr> = Vec::new();
    loop {
        match fs::canonicalize(existing) {
            Ok(resolved) => {
                return Ok(missing
                    .iter()
                    .rev()
                    .fold(resolved, |acc, part| acc.join(part)));
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(err);
                };
                missing.push(name);
                existing = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            Err(err) => return Err(err),
        }
    }
}

/// Whether both paths reach the same file, including through hard links or symlinks.
#[cfg(unix)]
fn same_entry(source: &Path, destination: &Path) -> FsOpsResult<bool> {
    use std::os::unix::fs::MetadataExt;

    let source_meta = fs::metadata(source)
        .map_err(|err| FsOpsError::io("copy_file.inspect_source", source, err))?;
    Ok(fs::metadata(destination).is_ok_and(|destination_meta| {
        source_meta.dev() == destination_meta.dev() && source_meta.ino() == destination_meta.ino()
    }))
}

#[cfg(not(unix))]
fn same_entry(source: &Path, destination: &Path) -> FsOpsResult<bool> {
    let source_resolved = fs::canonicalize(source)
        .map_err(|err| FsOpsError::io("copy_file.resolve_source", source, err))?;
    Ok(fs::canonicalize(destination).is_ok_and(|resolved| resolved == source_resolved))
}

fn report_failure(operation: &'static str, error: &FsOpsError) -> Outcome {
    let outcome = error.outcome();
    log_failure(operation, error, outcome);
    outcome
}

fn log_failure(operation: &'static str, error: &FsOpsError, outcome: Outcome) {
    let outcome = outcome.code();
    match error {
        FsOpsError::Io {
            operation: step,
            path,
            source,
        } => warn!(
            operation,
            step = *step,
            path = %path.display(),
            error = %source,
            outcome,
            "filesystem operation failed"
        ),
        FsOpsError::MissingValue { field } => {
            warn!(operation, field = *field, outcome, "required value missing");
        }
        FsOpsError::InvalidInput {
            field,
            reason,
            value,
        } => warn!(
            operation,
            field = *field,
            reason = *reason,
            value = value.as_deref().unwrap_or_default(),
            outcome,
            "invalid input"
        ),
        FsOpsError::SourceMissing { kind, path } => warn!(
            operation,
            kind = kind.as_str(),
            path = %path.display(),
            outcome,
            "source not found"
        ),
        FsOpsError::DestinationExists { kind, path } => warn!(
            operation,
            kind = kind.as_str(),
            path = %path.display(),
            outcome,
            "destination already exists"
        ),
    }
}
