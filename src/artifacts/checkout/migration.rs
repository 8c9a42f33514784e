//! Checkout migration
//!
//! A migration turns the working tree of the current commit into the working
//! tree of a target commit:
//!
//! 1. every entry of the target manifest is written (`Add` or `Modify`)
//! 2. every path tracked by the current commit but absent from the target is
//!    deleted (`Delete`)
//!
//! Planning fails if a target path is occupied by an untracked working file.

use crate::artifacts::objects::commit::Manifest;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepositoryError;
use std::collections::HashMap;
use std::path::PathBuf;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create a file the current commit does not track
    Add,
    /// Delete a file the target commit does not track
    Delete,
    /// Overwrite a file both commits track
    Modify,
}

/// Planned actions grouped by type; deletions carry no blob
pub type ActionsSet = HashMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

#[derive(Debug, Clone, Default)]
pub struct Migration {
    actions: ActionsSet,
}

impl Migration {
    pub fn plan(
        current: &Manifest,
        target: &Manifest,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<Self> {
        if let Some(path) = inspector.find_untracked_in_the_way(target.keys().map(PathBuf::as_path))
        {
            tracing::debug!(?path, "untracked file blocks checkout");
            return Err(RepositoryError::UntrackedFileWouldBeOverwritten.into());
        }

        let mut migration = Migration::default();

        for (path, oid) in target {
            let action = if current.contains_key(path) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            migration.record(action, path.clone(), Some(oid.clone()));
        }

        for path in current.keys().filter(|path| !target.contains_key(*path)) {
            migration.record(ActionType::Delete, path.clone(), None);
        }

        Ok(migration)
    }

    fn record(&mut self, action: ActionType, path: PathBuf, oid: Option<ObjectId>) {
        self.actions.entry(action).or_default().push((path, oid));
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn actions_of(&self, action: &ActionType) -> &[(PathBuf, Option<ObjectId>)] {
        self.actions
            .get(action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
