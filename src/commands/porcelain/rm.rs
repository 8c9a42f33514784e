use crate::areas::repository::Repository;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn rm(&mut self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = self
            .workspace()
            .relative_path(path)
            .ok_or(RepositoryError::NothingToRemove)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        let is_staged = index.addition(&path).is_some();
        let is_tracked = head.tracks(&path);

        if !is_staged && !is_tracked {
            return Err(RepositoryError::NothingToRemove.into());
        }

        if is_staged {
            index.unstage(&path);
        }

        if is_tracked {
            index.stage_removal(path.clone());
            self.workspace().delete_file(&path)?;
        }

        index.write_updates()?;

        Ok(())
    }
}
