use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        self.write_commit(message, None).await
    }

    /// Snapshot the stage on top of HEAD and advance the current branch
    ///
    /// Merge commits pass the merged-in head as `second_parent`; they are
    /// recorded even when the stage is clean.
    pub async fn write_commit(
        &self,
        message: &str,
        second_parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if index.is_clean() && second_parent.is_none() {
            return Err(RepositoryError::NoChanges.into());
        }
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }

        let (head_oid, head) = self.head_commit()?;

        let mut manifest = head.manifest().clone();
        manifest.extend(
            index
                .additions()
                .iter()
                .map(|(path, oid)| (path.clone(), oid.clone())),
        );
        for path in index.removals() {
            manifest.remove(path);
        }

        let commit = Commit::new(
            head_oid,
            second_parent,
            Commit::timestamp_from_env()?,
            message.to_string(),
            manifest,
        );
        let commit_oid = self.database().store(&commit)?;

        let branch_name = self.refs().current_branch()?;
        self.refs().update_branch(&branch_name, &commit_oid)?;
        self.refs()
            .prepend_log(&branch_name, &commit.log_record(&commit_oid))?;

        index.clear();
        index.write_updates()?;

        Ok(commit_oid)
    }
}
