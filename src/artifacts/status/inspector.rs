use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::Path;

#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
    head: &'r Commit,
    index: &'r Index,
}

impl<'r> Inspector<'r> {
    /// A path is untracked when neither HEAD nor a staged addition records it,
    /// or when it is staged for removal
    pub fn is_untracked(&self, path: &Path) -> bool {
        let recorded = self.head.tracks(path) || self.index.addition(path).is_some();

        !recorded || self.index.is_staged_for_removal(path)
    }

    /// Whether writing `path` would destroy an untracked working file
    ///
    /// Directories at `path` are searched for untracked files, and an
    /// untracked file at an ancestor of `path` also blocks the write.
    pub fn is_untracked_in_the_way(&self, path: &Path) -> bool {
        if self.workspace.is_file(path) {
            return self.is_untracked(path);
        }

        if self.workspace.is_dir(path) {
            return self
                .workspace
                .files_under(path)
                .iter()
                .any(|file| self.is_untracked(file));
        }

        path.ancestors()
            .skip(1)
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .any(|ancestor| self.workspace.is_file(ancestor) && self.is_untracked(ancestor))
    }

    /// First path of `paths` guarded by an untracked working file, if any
    pub fn find_untracked_in_the_way<'p>(
        &self,
        paths: impl IntoIterator<Item = &'p Path>,
    ) -> Option<&'p Path> {
        paths
            .into_iter()
            .find(|path| self.is_untracked_in_the_way(path))
    }

    fn working_oid(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !self.workspace.is_file(path) {
            return Ok(None);
        }

        Ok(Some(self.workspace.parse_blob(path)?.object_id()?))
    }

    /// How the working copy of `path` diverges from what the next commit would record
    pub fn check_workspace_against_stage(
        &self,
        path: &Path,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if self.index.is_staged_for_removal(path) {
            return Ok(None);
        }

        let expected = match self.index.addition(path) {
            Some(staged) => staged,
            None => match self.head.entry(path) {
                Some(tracked) => tracked,
                None => return Ok(None),
            },
        };

        match self.working_oid(path)? {
            None => Ok(Some(WorkspaceChangeType::Deleted)),
            Some(oid) if &oid != expected => Ok(Some(WorkspaceChangeType::Modified)),
            Some(_) => Ok(None),
        }
    }
}
