use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepositoryError;

impl Repository {
    /// Switch to another branch, rewriting the working tree to its head
    pub async fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::NoSuchBranch)?;
        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::AlreadyOnBranch.into());
        }

        self.migrate_to(&target_oid).await?;
        self.refs().set_head(&branch_name)?;

        Ok(())
    }

    /// Restore one working file from a commit, HEAD when `revision` is absent
    ///
    /// The stage is left untouched.
    pub async fn checkout_file(&mut self, revision: Option<&str>, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let commit_oid = match revision {
            Some(revision) => self.database().resolve_commit(revision)?,
            None => self.refs().read_head()?,
        };
        let commit = self.database().parse_object_as_commit(&commit_oid)?;

        let path = self.workspace().relative_path(path);
        let (path, blob_oid) = path
            .and_then(|path| commit.entry(&path).map(|oid| (path, oid)))
            .ok_or(RepositoryError::FileNotFoundInCommit)?;
        let blob = self.database().parse_object_as_blob(blob_oid)?;

        self.workspace().write_file(&path, blob.content())
    }

    /// Rewrite the working tree from HEAD's snapshot to `target_oid`'s and clear the stage
    ///
    /// Branch pointers and HEAD are left to the caller.
    pub(crate) async fn migrate_to(&self, target_oid: &ObjectId) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        let target = self.database().parse_object_as_commit(target_oid)?;

        let migration = {
            let inspector = Inspector::new(self.workspace(), &head, &index);
            Migration::plan(head.manifest(), target.manifest(), &inspector)?
        };
        self.workspace()
            .apply_migration(&migration, self.database())?;

        index.clear();
        index.write_updates()?;

        Ok(())
    }
}
