use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::conflict;
use crate::artifacts::merge::resolution::{Resolution, resolve};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Manifest;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// How a merge concluded; none of these is a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The other head is already part of the current history
    AlreadyMerged,
    /// The current head was an ancestor of the other head and simply moved
    FastForward,
    /// A two-parent merge commit was recorded
    Merged { commit: ObjectId, conflicted: bool },
}

impl Repository {
    pub async fn merge(&mut self, branch_name: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        {
            let index = self.index();
            let mut index = index.lock().await;
            index.rehydrate()?;

            if !index.is_clean() {
                return Err(RepositoryError::UncommittedChanges.into());
            }
        }

        let other_branch = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::NoSuchBranch)?;
        let other_oid = self
            .refs()
            .read_branch(&other_branch)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        let current_branch = self.refs().current_branch()?;
        if current_branch == other_branch {
            return Err(RepositoryError::SelfMerge.into());
        }

        let (head_oid, head) = self.head_commit()?;
        let split_oid = SplitPointFinder::new(|oid: &ObjectId| self.load_parents(oid))
            .find(&head_oid, &other_oid)?;

        if split_oid.as_ref() == Some(&other_oid) {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(MergeOutcome::AlreadyMerged);
        }

        if split_oid.as_ref() == Some(&head_oid) {
            self.migrate_to(&other_oid).await?;
            self.refs().update_head(&other_oid)?;
            writeln!(self.writer(), "Current branch fast-forward.")?;
            return Ok(MergeOutcome::FastForward);
        }

        let split_manifest = match &split_oid {
            Some(split_oid) => self
                .database()
                .parse_object_as_commit(split_oid)?
                .manifest()
                .clone(),
            None => Manifest::new(),
        };
        let other = self.database().parse_object_as_commit(&other_oid)?;
        let resolutions = resolve(&split_manifest, head.manifest(), other.manifest());

        let conflicted = self.apply_resolutions(&resolutions).await?;

        let message = format!("Merged {other_branch} into {current_branch}.");
        let commit = self.write_commit(&message, Some(other_oid)).await?;

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(MergeOutcome::Merged { commit, conflicted })
    }

    /// Write the merged working files and stage them; true if any path conflicted
    async fn apply_resolutions(
        &self,
        resolutions: &BTreeMap<PathBuf, Resolution>,
    ) -> anyhow::Result<bool> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        {
            let inspector = Inspector::new(self.workspace(), &head, &index);
            let touched = resolutions.keys().map(PathBuf::as_path);

            if let Some(path) = inspector.find_untracked_in_the_way(touched) {
                tracing::debug!(?path, "untracked file blocks merge");
                return Err(RepositoryError::UntrackedFileWouldBeOverwritten.into());
            }
        }

        let mut conflicted = false;

        for (path, resolution) in resolutions {
            match resolution {
                Resolution::KeepCurrent => {}
                Resolution::TakeOther(oid) => {
                    let blob = self.database().parse_object_as_blob(oid)?;
                    self.workspace().write_file(path, blob.content())?;
                    index.stage_addition(path.clone(), oid.clone());
                }
                Resolution::Delete => {
                    self.workspace().delete_file(path)?;
                    index.stage_removal(path.clone());
                }
                Resolution::Conflict { current, other } => {
                    let current = self.load_content(current.as_ref())?;
                    let other = self.load_content(other.as_ref())?;

                    let blob = Blob::new(conflict::materialize(current.as_deref(), other.as_deref()));
                    let oid = self.database().store(&blob)?;

                    self.workspace().write_file(path, blob.content())?;
                    index.stage_addition(path.clone(), oid);
                    conflicted = true;
                }
            }
        }

        index.write_updates()?;

        Ok(conflicted)
    }

    fn load_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        oid.map(|oid| Ok(self.database().parse_object_as_blob(oid)?.into_content()))
            .transpose()
    }
}
