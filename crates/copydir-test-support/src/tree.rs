//! Tree snapshots used to compare directory contents in assertions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Entry recorded in a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// A directory.
    Directory,
    /// A regular file with its contents.
    File(Vec<u8>),
}

/// Relative path to entry map for every descendant of a root directory.
pub type TreeSnapshot = BTreeMap<PathBuf, TreeEntry>;

/// Capture every descendant of `root` (the root itself excluded).
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be read.
pub fn snapshot_tree(root: &Path) -> Result<TreeSnapshot> {
    let mut snapshot = TreeSnapshot::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} escaped {}", entry.path().display(), root.display()))?
            .to_path_buf();
        let value = if entry.file_type().is_dir() {
            TreeEntry::Directory
        } else {
            TreeEntry::File(
                fs::read(entry.path())
                    .with_context(|| format!("failed to read {}", entry.path().display()))?,
            )
        };
        snapshot.insert(relative, value);
    }
    Ok(snapshot)
}

/// Build a snapshot from literal entries, in the same shape as [`crate::fixtures::write_tree`].
#[must_use]
pub fn expected_tree(entries: &[(&str, &[u8])]) -> TreeSnapshot {
    let mut snapshot = TreeSnapshot::new();
    for (relative, contents) in entries {
        let path = PathBuf::from(relative.trim_end_matches('/'));
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                snapshot.insert(ancestor.to_path_buf(), TreeEntry::Directory);
            }
        }
        let value = if relative.ends_with('/') {
            TreeEntry::Directory
        } else {
            TreeEntry::File(contents.to_vec())
        };
        snapshot.insert(path, value);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{scratch_dir, write_tree};

    #[test]
    fn snapshot_matches_written_tree() -> Result<()> {
        let entries: &[(&str, &[u8])] = &[
            ("a.txt", b"alpha"),
            ("sub/b.txt", b"beta"),
            ("sub/deeper/c.txt", b"gamma"),
            ("empty/", b""),
        ];
        let temp = scratch_dir()?;
        write_tree(temp.path(), entries)?;

        let snapshot = snapshot_tree(temp.path())?;
        assert_eq!(snapshot, expected_tree(entries));
        assert_eq!(snapshot.get(Path::new("sub")), Some(&TreeEntry::Directory));
        Ok(())
    }

    #[test]
    fn snapshot_of_missing_root_fails() -> Result<()> {
        let temp = scratch_dir()?;
        assert!(snapshot_tree(&temp.path().join("missing")).is_err());
        Ok(())
    }
}
