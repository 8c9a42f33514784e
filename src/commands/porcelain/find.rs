use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Print the id of every reachable commit whose message is exactly `message`
    pub async fn find(&mut self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut matches = self
            .reachable_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(oid, _)| oid)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(RepositoryError::NoMatchingCommit.into());
        }

        matches.sort();
        for oid in matches {
            writeln!(self.writer(), "{oid}")?;
        }

        Ok(())
    }
}
