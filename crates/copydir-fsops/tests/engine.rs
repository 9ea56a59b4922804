use std::fs;
use std::path::Path;

use anyhow::Result;
use copydir_fsops::service::{copy_directory, copy_file, execute, move_directory, move_file};
use copydir_fsops::{Action, OperationRequest, Outcome};
use copydir_test_support::fixtures::{scratch_dir, write_tree};
use copydir_test_support::tree::{expected_tree, snapshot_tree};

const SAMPLE: &[(&str, &[u8])] = &[
    ("a.txt", b"alpha"),
    ("sub/b.txt", b"beta"),
    ("sub/deeper/c.bin", &[0, 159, 146, 150]),
    ("empty/", b""),
];

#[test]
fn copy_directory_nests_source_under_destination() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("a.txt", b"a contents"), ("sub/b.txt", b"b contents")])?;
    fs::create_dir_all(&output)?;

    assert_eq!(
        copy_directory(&input, &output, false, false),
        Outcome::CopiedSuccessfully
    );
    assert_eq!(fs::read(output.join("in").join("a.txt"))?, b"a contents");
    assert_eq!(
        fs::read(output.join("in").join("sub").join("b.txt"))?,
        b"b contents"
    );
    assert!(input.join("a.txt").is_file(), "copy must leave the source");

    assert_eq!(
        copy_directory(&input, &output, false, false),
        Outcome::InvalidMoveLocation
    );
    Ok(())
}

#[test]
fn copy_directory_round_trips_contents_and_structure() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    write_tree(&input, SAMPLE)?;

    let output = temp.path().join("missing").join("out");
    assert_eq!(
        copy_directory(&input, &output, false, false),
        Outcome::CopiedSuccessfully
    );
    assert_eq!(snapshot_tree(&output.join("in"))?, expected_tree(SAMPLE));
    assert_eq!(snapshot_tree(&input)?, expected_tree(SAMPLE));
    Ok(())
}

#[test]
fn copy_directory_without_merge_leaves_existing_target_untouched() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("a.txt", b"new")])?;
    write_tree(&output.join("in"), &[("old.txt", b"old")])?;
    let before = snapshot_tree(&output)?;

    assert_eq!(
        copy_directory(&input, &output, true, false),
        Outcome::InvalidMoveLocation
    );
    assert_eq!(snapshot_tree(&output)?, before);
    Ok(())
}

#[test]
fn merge_unions_trees_and_respects_overwrite() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("shared.txt", b"from source"), ("new.txt", b"fresh")])?;
    write_tree(
        &output.join("in"),
        &[("shared.txt", b"from destination"), ("kept.txt", b"kept")],
    )?;

    assert_eq!(
        copy_directory(&input, &output, false, true),
        Outcome::OverwriteError
    );
    assert_eq!(
        fs::read(output.join("in").join("shared.txt"))?,
        b"from destination"
    );

    assert_eq!(
        copy_directory(&input, &output, true, true),
        Outcome::CopiedSuccessfully
    );
    assert_eq!(
        snapshot_tree(&output.join("in"))?,
        expected_tree(&[
            ("kept.txt", b"kept"),
            ("new.txt", b"fresh"),
            ("shared.txt", b"from source"),
        ])
    );
    Ok(())
}

#[test]
fn merge_descends_into_existing_subdirectories() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("sub/new.txt", b"new")])?;
    write_tree(&output.join("in"), &[("sub/old.txt", b"old")])?;

    assert_eq!(
        copy_directory(&input, &output, false, true),
        Outcome::CopiedSuccessfully
    );
    assert_eq!(
        snapshot_tree(&output.join("in"))?,
        expected_tree(&[("sub/new.txt", b"new"), ("sub/old.txt", b"old")])
    );
    Ok(())
}

#[test]
fn failure_midway_keeps_partial_copy() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("a.txt", b"a"), ("b.txt", b"b"), ("c.txt", b"c")])?;
    write_tree(&output.join("in"), &[("b.txt", b"existing")])?;

    assert_eq!(
        copy_directory(&input, &output, false, true),
        Outcome::OverwriteError
    );
    assert_eq!(fs::read(output.join("in").join("a.txt"))?, b"a");
    assert_eq!(fs::read(output.join("in").join("b.txt"))?, b"existing");
    assert!(!output.join("in").join("c.txt").exists(), "walk stops at first failure");
    Ok(())
}

#[test]
fn copy_directory_reports_missing_source() -> Result<()> {
    let temp = scratch_dir()?;
    let missing = temp.path().join("nope");
    assert_eq!(
        copy_directory(&missing, temp.path(), false, false),
        Outcome::DirDoesNotExist
    );

    let file = temp.path().join("file.txt");
    fs::write(&file, b"x")?;
    assert_eq!(
        copy_directory(&file, &temp.path().join("out"), false, false),
        Outcome::DirDoesNotExist
    );
    assert!(!temp.path().join("out").exists());
    Ok(())
}

#[test]
fn copy_directory_into_itself_is_rejected() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    write_tree(&input, &[("a.txt", b"a"), ("sub/b.txt", b"b")])?;
    let before = snapshot_tree(&input)?;

    assert_eq!(
        copy_directory(&input, &input.join("sub"), false, false),
        Outcome::FailedToCopy
    );
    assert_eq!(snapshot_tree(&input)?, before);
    Ok(())
}

#[test]
fn empty_paths_return_null_data_without_mutation() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    write_tree(&input, &[("a.txt", b"a")])?;
    let before = snapshot_tree(temp.path())?;
    let empty = Path::new("");

    assert_eq!(copy_file(empty, &input.join("b.txt"), false), Outcome::NullData);
    assert_eq!(copy_file(&input.join("a.txt"), empty, false), Outcome::NullData);
    assert_eq!(move_file(empty, &input.join("b.txt"), true), Outcome::NullData);
    assert_eq!(copy_directory(empty, temp.path(), false, false), Outcome::NullData);
    assert_eq!(copy_directory(&input, empty, false, false), Outcome::NullData);
    assert_eq!(move_directory(&input, empty, true, true), Outcome::NullData);
    assert_eq!(
        execute(&OperationRequest::new(Action::Move, "", "")),
        Outcome::NullData
    );

    assert_eq!(snapshot_tree(temp.path())?, before);
    Ok(())
}

#[test]
fn copy_file_respects_overwrite_flag() -> Result<()> {
    let temp = scratch_dir()?;
    let source = temp.path().join("source.txt");
    let destination = temp.path().join("destination.txt");
    fs::write(&source, b"source bytes")?;
    fs::write(&destination, b"original bytes")?;

    assert_eq!(
        copy_file(&source, &destination, false),
        Outcome::OverwriteError
    );
    assert_eq!(fs::read(&destination)?, b"original bytes");

    assert_eq!(
        copy_file(&source, &destination, true),
        Outcome::CopiedSuccessfully
    );
    assert_eq!(fs::read(&destination)?, b"source bytes");
    assert_eq!(fs::read(&source)?, b"source bytes");
    Ok(())
}

#[test]
fn copy_file_maps_missing_and_unwritable_paths() -> Result<()> {
    let temp = scratch_dir()?;
    assert_eq!(
        copy_file(
            &temp.path().join("missing.txt"),
            &temp.path().join("out.txt"),
            false
        ),
        Outcome::FileDoesNotExist
    );

    let source = temp.path().join("a.txt");
    fs::write(&source, b"a")?;
    assert_eq!(
        copy_file(
            &source,
            &temp.path().join("no-such-dir").join("a.txt"),
            false
        ),
        Outcome::FailedToCopy
    );
    Ok(())
}

#[test]
fn move_file_removes_source_only_on_success() -> Result<()> {
    let temp = scratch_dir()?;
    let source = temp.path().join("a.txt");
    let destination = temp.path().join("b.txt");
    fs::write(&source, b"payload")?;
    fs::write(&destination, b"occupied")?;

    assert_eq!(
        move_file(&source, &destination, false),
        Outcome::OverwriteError
    );
    assert!(source.is_file());
    assert_eq!(fs::read(&destination)?, b"occupied");

    assert_eq!(
        move_file(&source, &destination, true),
        Outcome::MovedSuccessfully
    );
    assert!(!source.exists());
    assert_eq!(fs::read(&destination)?, b"payload");
    Ok(())
}

#[test]
fn move_directory_matches_copy_and_removes_source() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let copied = temp.path().join("out");
    let moved = temp.path().join("out2");
    write_tree(&input, SAMPLE)?;

    assert_eq!(
        copy_directory(&input, &copied, false, false),
        Outcome::CopiedSuccessfully
    );
    assert_eq!(
        move_directory(&input, &moved, false, false),
        Outcome::MovedSuccessfully
    );
    assert!(!input.exists());
    assert_eq!(
        snapshot_tree(&moved.join("in"))?,
        snapshot_tree(&copied.join("in"))?
    );
    Ok(())
}

#[test]
fn failed_move_directory_keeps_source() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("a.txt", b"a")])?;
    write_tree(&output.join("in"), &[("a.txt", b"taken")])?;

    assert_eq!(
        move_directory(&input, &output, false, false),
        Outcome::InvalidMoveLocation
    );
    assert_eq!(
        move_directory(&input, &output, false, true),
        Outcome::OverwriteError
    );
    assert!(input.join("a.txt").is_file());
    Ok(())
}

#[test]
fn execute_dispatches_on_action_and_mode() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    write_tree(&input, &[("a.txt", b"a")])?;

    let single = OperationRequest::new(Action::Copy, input.join("a.txt"), temp.path().join("b.txt"))
        .single_file(true);
    assert_eq!(execute(&single), Outcome::CopiedSuccessfully);
    assert_eq!(fs::read(temp.path().join("b.txt"))?, b"a");

    let into_directory =
        OperationRequest::new(Action::Copy, input.join("a.txt"), temp.path()).single_file(true);
    assert_eq!(execute(&into_directory), Outcome::NullData);

    let tree = OperationRequest::new(Action::Move, &input, temp.path().join("out"));
    assert_eq!(execute(&tree), Outcome::MovedSuccessfully);
    assert!(temp.path().join("out").join("in").join("a.txt").is_file());
    assert!(!input.exists());

    let moved_file = OperationRequest::new(
        Action::Move,
        temp.path().join("b.txt"),
        temp.path().join("c.txt"),
    )
    .single_file(true)
    .overwrite(true);
    assert_eq!(execute(&moved_file), Outcome::MovedSuccessfully);
    assert!(!temp.path().join("b.txt").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn merge_with_overwrite_keeps_hard_linked_destination() -> Result<()> {
    let temp = scratch_dir()?;
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    write_tree(&input, &[("a.txt", b"precious")])?;
    fs::create_dir_all(output.join("in"))?;
    fs::hard_link(input.join("a.txt"), output.join("in").join("a.txt"))?;

    assert_eq!(
        copy_directory(&input, &output, true, true),
        Outcome::FailedToCopy
    );
    assert_eq!(fs::read(input.join("a.txt"))?, b"precious");
    Ok(())
}

#[cfg(unix)]
mod cleanup_failures {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Makes `dir` read-only for the duration of `check`, restoring it afterwards.
    ///
    /// Skips `check` when the process can still write into a read-only directory,
    /// which is the case when running as root.
    fn with_read_only_dir(dir: &Path, check: impl FnOnce() -> Result<()>) -> Result<()> {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o555))?;
        let writable = fs::write(dir.join(".write-test"), b"").is_ok();
        let result = if writable { Ok(()) } else { check() };
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755))?;
        result
    }

    #[test]
    fn move_file_reports_cleanup_warning_when_source_stays() -> Result<()> {
        let temp = scratch_dir()?;
        let locked = temp.path().join("locked");
        write_tree(&locked, &[("a.txt", b"payload")])?;
        let source = locked.join("a.txt");
        let destination = temp.path().join("b.txt");

        with_read_only_dir(&locked, || {
            let outcome = move_file(&source, &destination, false);
            assert_eq!(outcome, Outcome::MovedWithCleanupWarning);
            assert!(outcome.is_success());
            assert!(source.is_file());
            assert_eq!(fs::read(&destination)?, b"payload");
            Ok(())
        })
    }

    #[test]
    fn move_directory_reports_cleanup_warning_when_source_stays() -> Result<()> {
        let temp = scratch_dir()?;
        let locked = temp.path().join("locked");
        let input = locked.join("in");
        write_tree(&input, &[("a.txt", b"a"), ("sub/b.txt", b"b")])?;
        let output = temp.path().join("out");

        with_read_only_dir(&locked, || {
            assert_eq!(
                move_directory(&input, &output, false, false),
                Outcome::MovedWithCleanupWarning
            );
            assert!(input.is_dir());
            assert_eq!(
                snapshot_tree(&output.join("in"))?,
                expected_tree(&[("a.txt", b"a"), ("sub/b.txt", b"b")])
            );
            Ok(())
        })
    }
}
