use crate::areas::repository::Repository;

impl Repository {
    /// Check out an arbitrary commit and move the current branch to it
    pub async fn reset(&mut self, revision: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let target_oid = self.database().resolve_commit(revision)?;

        self.migrate_to(&target_oid).await?;
        self.refs().update_head(&target_oid)?;

        Ok(())
    }
}
