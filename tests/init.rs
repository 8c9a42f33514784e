use crate::common::command::{logged_commit_ids, repository_dir, run_bough_command};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_the_metadata_layout(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bough_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    repository_dir.child(".bough").assert(predicate::path::is_dir());
    repository_dir
        .child(".bough/HEAD")
        .assert("ref: refs/heads/master");
    repository_dir
        .child(".bough/refs/heads/master")
        .assert(predicate::path::is_file());
    repository_dir
        .child(".bough/logs/refs/heads/master")
        .assert(predicate::str::contains("initial commit"));

    Ok(())
}

#[rstest]
fn root_commit_is_the_only_log_entry(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bough_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let output = run_bough_command(repository_dir.path(), &["log"]).output()?;
    let log = String::from_utf8(output.stdout)?;
    let ids = logged_commit_ids(&log);

    assert_eq!(ids.len(), 1);
    assert_eq!(
        log,
        format!(
            "===\ncommit {}\nDate: Thu Jan 01 00:00:00 1970 +0000\ninitial commit\n\n",
            ids[0]
        )
    );

    Ok(())
}

#[rstest]
fn root_commit_is_identical_across_repositories(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let other_dir = TempDir::new()?;

    for dir in [repository_dir.path(), other_dir.path()] {
        run_bough_command(dir, &["init"]).assert().success();
    }

    let first = std::fs::read_to_string(repository_dir.path().join(".bough/refs/heads/master"))?;
    let second = std::fs::read_to_string(other_dir.path().join(".bough/refs/heads/master"))?;
    assert_eq!(first, second);

    Ok(())
}

#[rstest]
fn init_twice_fails(repository_dir: TempDir) {
    run_bough_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_bough_command(repository_dir.path(), &["init"])
        .assert()
        .code(1)
        .stdout("A bough version-control system already exists in the current directory.\n");
}

#[rstest]
#[case(&["status"])]
#[case(&["log"])]
#[case(&["add", "f.txt"])]
#[case(&["commit", "message"])]
#[case(&["branch", "b1"])]
#[case(&["merge", "b1"])]
#[case(&["checkout", "b1"])]
#[case(&["checkout", "--", "f.txt"])]
#[case(&["checkout", "abcd1234", "--", "f.txt"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_bough_command(repository_dir.path(), args)
        .assert()
        .code(1)
        .stdout("Not in an initialized bough directory.\n");
}

#[rstest]
fn missing_command_is_reported(repository_dir: TempDir) {
    run_bough_command(repository_dir.path(), &[])
        .assert()
        .code(1)
        .stdout("Please enter a command.\n");
}

#[rstest]
fn unknown_command_is_reported(repository_dir: TempDir) {
    run_bough_command(repository_dir.path(), &["frobnicate"])
        .assert()
        .code(1)
        .stdout("No command with that name exists.\n");
}

#[rstest]
#[case(&["add"])]
#[case(&["add", "a.txt", "b.txt"])]
#[case(&["init", "extra"])]
#[case(&["checkout"])]
#[case(&["checkout", "--"])]
#[case(&["checkout", "a", "b"])]
#[case(&["checkout", "a", "--", "b", "c"])]
#[case(&["merge"])]
fn wrong_operand_count_is_reported(repository_dir: TempDir, #[case] args: &[&str]) {
    run_bough_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_bough_command(repository_dir.path(), args)
        .assert()
        .code(1)
        .stdout("Incorrect operands.\n");
}
