use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::{RevList, reachable_from};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::cmp::Reverse;
use std::io::Write;

impl Repository {
    /// First-parent history of the current branch, newest first
    pub async fn log(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head_oid = self.refs().read_head()?;
        for entry in RevList::new(self, head_oid) {
            let (oid, commit) = entry?;
            write!(self.writer(), "{}", commit.log_record(&oid))?;
        }

        Ok(())
    }

    /// Every commit reachable from any branch, newest first
    pub async fn global_log(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (oid, commit) in self.reachable_commits()? {
            write!(self.writer(), "{}", commit.log_record(&oid))?;
        }

        Ok(())
    }

    /// Commits reachable from all branch heads, ordered by timestamp then id
    pub(crate) fn reachable_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let heads = self
            .refs()
            .list_branches()?
            .iter()
            .filter_map(|branch| self.refs().read_branch(branch).transpose())
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut commits = reachable_from(heads, |oid| self.load_parents(oid))?
            .into_iter()
            .map(|oid| {
                let commit = self.database().parse_object_as_commit(&oid)?;
                Ok((oid, commit))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        commits.sort_by_key(|(oid, commit)| (Reverse(commit.timestamp()), oid.clone()));

        Ok(commits)
    }
}
