use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn add(&mut self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = self
            .workspace()
            .relative_path(path)
            .ok_or(RepositoryError::FileNotFound)?;
        if !Workspace::is_storable(&path) {
            return Err(RepositoryError::UnsupportedFileName.into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !self.workspace().is_file(&path) {
            return Err(RepositoryError::FileNotFound.into());
        }

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let (_, head) = self.head_commit()?;

        if head.entry(&path) == Some(&blob_id) {
            // re-adding what HEAD already records drops any pending change
            index.unstage(&path);
        } else if index.addition(&path) != Some(&blob_id) {
            self.database().store(&blob)?;
            index.stage_addition(path, blob_id);
        }

        index.write_updates()?;

        Ok(())
    }
}
