use crate::common::command::{
    add_and_commit, bough_output, branch_commit_id, committed_repository_dir, head_commit_id,
    init_repository_dir, logged_commit_ids, run_bough_command,
};
use crate::common::file::{FileSpec, read_file, write_file, write_files};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::path::Path;

mod common;

/// History:
///
/// ```text
///   c1 (f, g) ── master
///    └──────── side
/// ```
#[fixture]
fn forked_repository_dir(committed_repository_dir: TempDir) -> TempDir {
    run_bough_command(committed_repository_dir.path(), &["branch", "side"])
        .assert()
        .success();

    committed_repository_dir
}

fn commit_on(dir: &Path, branch: &str, files: &[(&str, &str)], message: &str) {
    let head = std::fs::read_to_string(dir.join(".bough/HEAD")).unwrap();
    if head.trim() != format!("ref: refs/heads/{branch}") {
        run_bough_command(dir, &["checkout", branch]).assert().success();
    }
    write_files(dir, files);
    let paths = files.iter().map(|(path, _)| *path).collect::<Vec<_>>();
    add_and_commit(dir, &paths, message);
}

fn merge_parents(dir: &Path) -> String {
    bough_output(dir, &["log"])
        .lines()
        .find_map(|line| line.strip_prefix("Merge: ").map(str::to_string))
        .expect("head is not a merge commit")
}

/// Scenario B: both branches change the same file
#[rstest]
fn conflicting_changes_are_wrapped_in_markers(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("f"), "x\n".to_string()));
    add_and_commit(dir, &["f"], "c1");
    run_bough_command(dir, &["branch", "b1"]).assert().success();

    write_files(dir, &[("f", "y\n")]);
    add_and_commit(dir, &["f"], "c2");
    let c2 = head_commit_id(dir);
    commit_on(dir, "b1", &[("f", "z\n")], "c3");
    let c3 = head_commit_id(dir);
    run_bough_command(dir, &["checkout", "master"]).assert().success();

    run_bough_command(dir, &["merge", "b1"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(read_file(dir, "f"), "<<<<<<< HEAD\ny\n=======\nz\n>>>>>>>\n");
    assert_eq!(merge_parents(dir), format!("{} {}", &c2[..7], &c3[..7]));

    let log = bough_output(dir, &["log"]);
    assert!(log.contains("Merged b1 into master.\n"));
    assert_eq!(logged_commit_ids(&log).len(), 4);
    assert!(bough_output(dir, &["status"]).contains("=== Staged Files ===\n\n"));
}

#[rstest]
fn conflict_with_a_deleted_side_leaves_that_section_empty(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    write_files(dir, &[("f.txt", "master edit\n")]);
    add_and_commit(dir, &["f.txt"], "edit f on master");

    run_bough_command(dir, &["checkout", "side"]).assert().success();
    run_bough_command(dir, &["rm", "f.txt"]).assert().success();
    run_bough_command(dir, &["commit", "drop f on side"])
        .assert()
        .success();
    run_bough_command(dir, &["checkout", "master"]).assert().success();

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(dir, "f.txt"),
        "<<<<<<< HEAD\nmaster edit\n=======\n>>>>>>>\n"
    );
}

#[rstest]
fn independent_changes_merge_cleanly(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "master", &[("f.txt", "master edit\n")], "edit f");
    let master = head_commit_id(dir);

    run_bough_command(dir, &["checkout", "side"]).assert().success();
    write_files(dir, &[("h.txt", "new on side\n")]);
    run_bough_command(dir, &["add", "h.txt"]).assert().success();
    run_bough_command(dir, &["rm", "g.txt"]).assert().success();
    run_bough_command(dir, &["commit", "add h, drop g"])
        .assert()
        .success();
    let side = head_commit_id(dir);
    run_bough_command(dir, &["checkout", "master"]).assert().success();

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read_file(dir, "f.txt"), "master edit\n");
    assert_eq!(read_file(dir, "h.txt"), "new on side\n");
    forked_repository_dir
        .child("g.txt")
        .assert(predicate::path::missing());
    assert_eq!(merge_parents(dir), format!("{} {}", &master[..7], &side[..7]));
    assert_eq!(branch_commit_id(dir, "side"), side);

    let status = bough_output(dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\n\n"));
    assert!(status.contains("=== Modifications Not Staged For Commit ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\n\n"));
}

#[rstest]
fn identical_changes_on_both_sides_are_not_conflicts(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "master", &[("f.txt", "same\n"), ("m.txt", "m\n")], "master side");
    commit_on(dir, "side", &[("f.txt", "same\n"), ("s.txt", "s\n")], "other side");
    run_bough_command(dir, &["checkout", "master"]).assert().success();

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read_file(dir, "f.txt"), "same\n");
    assert_eq!(read_file(dir, "s.txt"), "s\n");
    assert_eq!(read_file(dir, "m.txt"), "m\n");
}

#[rstest]
fn merge_fast_forwards_when_head_is_an_ancestor(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "side", &[("h.txt", "h\n")], "side work");
    let side = head_commit_id(dir);
    run_bough_command(dir, &["checkout", "master"]).assert().success();
    let log_before = logged_commit_ids(&bough_output(dir, &["global-log"])).len();

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout("Current branch fast-forward.\n");

    assert_eq!(branch_commit_id(dir, "master"), side);
    assert_eq!(read_file(dir, "h.txt"), "h\n");
    assert_eq!(
        logged_commit_ids(&bough_output(dir, &["global-log"])).len(),
        log_before
    );
}

#[rstest]
fn merging_an_ancestor_changes_nothing(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "master", &[("f.txt", "ahead\n")], "master ahead");
    let master = head_commit_id(dir);

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout("Given branch is an ancestor of the current branch.\n");

    assert_eq!(head_commit_id(dir), master);
    assert_eq!(read_file(dir, "f.txt"), "ahead\n");
}

#[rstest]
fn merging_the_current_branch_fails(committed_repository_dir: TempDir) {
    run_bough_command(committed_repository_dir.path(), &["merge", "master"])
        .assert()
        .code(1)
        .stdout("Cannot merge a branch with itself.\n");
}

#[rstest]
fn merging_an_unknown_branch_fails(committed_repository_dir: TempDir) {
    run_bough_command(committed_repository_dir.path(), &["merge", "nope"])
        .assert()
        .code(1)
        .stdout("A branch with that name does not exist.\n");
}

#[rstest]
fn merge_with_staged_changes_fails(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "side", &[("h.txt", "h\n")], "side work");
    run_bough_command(dir, &["checkout", "master"]).assert().success();
    write_files(dir, &[("f.txt", "staged edit\n")]);
    run_bough_command(dir, &["add", "f.txt"]).assert().success();

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .code(1)
        .stdout("You have uncommitted changes.\n");

    forked_repository_dir
        .child("h.txt")
        .assert(predicate::path::missing());
}

#[rstest]
fn merge_refuses_to_overwrite_untracked_files(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "master", &[("f.txt", "master edit\n")], "edit f");
    let master = head_commit_id(dir);
    commit_on(dir, "side", &[("h.txt", "tracked on side\n")], "side work");
    run_bough_command(dir, &["checkout", "master"]).assert().success();
    write_files(dir, &[("h.txt", "precious\n")]);

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .code(1)
        .stdout(
            "There is an untracked file in the way; delete it, or add and commit it first.\n",
        );

    assert_eq!(read_file(dir, "h.txt"), "precious\n");
    assert_eq!(head_commit_id(dir), master);
}

#[rstest]
fn merge_commit_is_recorded_even_without_file_changes(forked_repository_dir: TempDir) {
    let dir = forked_repository_dir.path();
    commit_on(dir, "master", &[("f.txt", "same\n")], "master edit");
    let master = head_commit_id(dir);
    commit_on(dir, "side", &[("f.txt", "same\n")], "side edit");
    run_bough_command(dir, &["checkout", "master"]).assert().success();

    run_bough_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_ne!(head_commit_id(dir), master);
    assert!(bough_output(dir, &["log"]).contains("Merged side into master.\n"));
}
