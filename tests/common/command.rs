use crate::common::COMMIT_DATE;
use crate::common::file::write_files;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_bough_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// Repository whose master branch has one commit tracking `f.txt` and `g.txt`
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    write_files(
        init_repository_dir.path(),
        &[("f.txt", "f content\n"), ("g.txt", "g content\n")],
    );
    add_and_commit(init_repository_dir.path(), &["f.txt", "g.txt"], "two files");

    init_repository_dir
}

pub fn run_bough_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bough").expect("Failed to find bough binary");
    cmd.envs(vec![
        ("NO_PAGER", "1"),
        ("NO_COLOR", "1"),
        ("BOUGH_COMMIT_DATE", COMMIT_DATE),
    ]);
    cmd.env_remove("BOUGH_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bough_commit(dir: &Path, message: &str) -> Command {
    run_bough_command(dir, &["commit", message])
}

pub fn bough_commit_at(dir: &Path, message: &str, date: &str) -> Command {
    let mut cmd = bough_commit(dir, message);
    cmd.env("BOUGH_COMMIT_DATE", date);
    cmd
}

pub fn add_and_commit(dir: &Path, paths: &[&str], message: &str) {
    for path in paths {
        run_bough_command(dir, &["add", path]).assert().success();
    }
    bough_commit(dir, message).assert().success();
}

/// Stdout of a command that is expected to succeed
pub fn bough_output(dir: &Path, args: &[&str]) -> String {
    let output = run_bough_command(dir, args)
        .output()
        .expect("Failed to run bough");
    assert!(
        output.status.success(),
        "bough {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );

    String::from_utf8(output.stdout).expect("bough printed invalid UTF-8")
}

/// Id of the head commit of the current branch, read straight from the metadata
pub fn head_commit_id(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".bough").join("HEAD")).expect("Failed to read HEAD");
    let ref_path = head
        .trim()
        .strip_prefix("ref: ")
        .expect("HEAD is not a symbolic ref");

    branch_commit_id(dir, ref_path.trim_start_matches("refs/heads/"))
}

pub fn branch_commit_id(dir: &Path, branch: &str) -> String {
    std::fs::read_to_string(dir.join(".bough").join("refs").join("heads").join(branch))
        .expect("Failed to read branch")
        .trim()
        .to_string()
}

/// Ids printed on the `commit <id>` lines of a log, in order
pub fn logged_commit_ids(log: &str) -> Vec<String> {
    log.lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}
