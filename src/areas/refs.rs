//! Branch references
//!
//! Branches are the only kind of reference: each one is a file under
//! `refs/heads/` holding the 40-character id of its head commit. `HEAD` is
//! always symbolic (`ref: refs/heads/<branch>`), so there is no detached state.
//!
//! Each branch also owns a log under `logs/refs/heads/` with one record per
//! commit made on it, newest first.

use crate::artifacts::branch::SYMREF_REGEX;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.bough`)
    path: Box<Path>,
}

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

impl Refs {
    /// Name of the branch HEAD points at
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .with_context(|| format!("HEAD is not a symbolic ref: {:?}", content.trim()))?;

        BranchName::try_parse_symref_target(&symref_match[1])
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Point HEAD at another branch without touching any branch pointer
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        tracing::info!(branch = %branch_name, "switching HEAD");
        self.update_ref_file(
            &self.head_path(),
            format!("ref: {}", branch_name.as_symref_target()),
        )
    }

    /// Head commit of the current branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let branch_name = self.current_branch()?;

        self.read_branch(&branch_name)?
            .with_context(|| format!("current branch {branch_name} has no head commit"))
    }

    /// Move the current branch to `oid`; HEAD keeps naming the same branch
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_branch(&self.current_branch()?, oid)
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(branch_name.as_ref());

        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.heads_path().join(branch_name.as_ref()).is_file()
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::info!(branch = %branch_name, %oid, "moving branch pointer");
        self.update_ref_file(
            &self.heads_path().join(branch_name.as_ref()),
            oid.as_ref().to_string(),
        )
    }

    /// Create a branch at `source_oid` and seed its log with `log_record`
    pub fn create_branch(
        &self,
        branch_name: &BranchName,
        source_oid: &ObjectId,
        log_record: &str,
    ) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(RepositoryError::BranchAlreadyExists.into());
        }

        self.update_branch(branch_name, source_oid)?;
        self.update_ref_file(&self.log_path(branch_name), log_record.to_string())
    }

    /// Remove a branch pointer and its log; commits are left alone
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(branch_name)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        let branch_path = self.heads_path().join(branch_name.as_ref());
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_empty_parent_dirs(&branch_path, &self.heads_path())?;

        let log_path = self.log_path(branch_name);
        if log_path.is_file() {
            std::fs::remove_file(&log_path)
                .with_context(|| format!("failed to delete branch log at {:?}", log_path))?;
            self.prune_empty_parent_dirs(&log_path, &self.logs_path())?;
        }

        tracing::info!(branch = %branch_name, %oid, "deleted branch");
        Ok(oid)
    }

    /// All branch names, sorted
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }

    /// Add `record` to the top of the branch's log
    pub fn prepend_log(&self, branch_name: &BranchName, record: &str) -> anyhow::Result<()> {
        let log_path = self.log_path(branch_name);
        let existing = self.read_log(branch_name)?;

        self.update_ref_file(&log_path, format!("{record}{existing}"))
    }

    pub fn read_log(&self, branch_name: &BranchName) -> anyhow::Result<String> {
        let log_path = self.log_path(branch_name);

        if !log_path.is_file() {
            return Ok(String::new());
        }

        std::fs::read_to_string(&log_path)
            .with_context(|| format!("failed to read branch log at {:?}", log_path))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path, stop_at: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != stop_at
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_empty_parent_dirs(parent, stop_at)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.path.join("refs").join("heads").into_boxed_path()
    }

    pub fn logs_path(&self) -> Box<Path> {
        self.path
            .join("logs")
            .join("refs")
            .join("heads")
            .into_boxed_path()
    }

    fn log_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.logs_path().join(branch_name.as_ref()).into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::is_repository_error;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());

        refs.create_branch(&BranchName::default_branch(), &oid('a'), "root\n")
            .unwrap();
        refs.set_head(&BranchName::default_branch()).unwrap();

        (dir, refs)
    }

    #[rstest]
    fn head_follows_the_current_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        assert_eq!(refs.current_branch().unwrap(), BranchName::default_branch());
        assert_eq!(refs.read_head().unwrap(), oid('a'));

        refs.update_head(&oid('b')).unwrap();
        assert_eq!(
            refs.read_branch(&BranchName::default_branch()).unwrap(),
            Some(oid('b'))
        );
    }

    #[rstest]
    fn creating_an_existing_branch_fails(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs
            .create_branch(&BranchName::default_branch(), &oid('b'), "")
            .unwrap_err();
        assert!(is_repository_error(&error, &RepositoryError::BranchAlreadyExists));
    }

    #[rstest]
    fn hierarchical_branches_are_listed_and_pruned(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&branch("feature/one"), &oid('c'), "c\n")
            .unwrap();
        refs.create_branch(&branch("bugfix"), &oid('d'), "d\n").unwrap();

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![branch("bugfix"), branch("feature/one"), branch("master")]
        );

        assert_eq!(refs.delete_branch(&branch("feature/one")).unwrap(), oid('c'));
        assert!(!refs.heads_path().join("feature").exists());
        assert!(!refs.logs_path().join("feature").exists());
    }

    #[rstest]
    fn deleting_a_missing_branch_fails(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("nope")).unwrap_err();
        assert!(is_repository_error(&error, &RepositoryError::NoSuchBranch));
    }

    #[rstest]
    fn log_records_are_prepended(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.prepend_log(&BranchName::default_branch(), "second\n")
            .unwrap();

        assert_eq!(
            refs.read_log(&BranchName::default_branch()).unwrap(),
            "second\nroot\n"
        );
    }
}
