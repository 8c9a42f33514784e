use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .bough/objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .bough/refs/heads directory")?;
        fs::create_dir_all(self.refs().logs_path())
            .context("Failed to create .bough/logs directory")?;

        let root = Commit::root();
        let root_oid = self.database().store(&root)?;

        let default_branch = BranchName::default_branch();
        self.refs()
            .create_branch(&default_branch, &root_oid, &root.log_record(&root_oid))
            .context("Failed to create the default branch")?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        let index = self.index();
        let mut index = index.lock().await;
        index.write_updates()?;

        tracing::debug!(path = %self.path().display(), %root_oid, "initialized repository");
        Ok(())
    }
}
