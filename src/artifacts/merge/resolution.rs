//! Three-way classification
//!
//! Each path of `split ∪ current ∪ other` is compared by blob id, where a
//! missing entry counts as its own value:
//!
//! | current vs other | current vs split | other vs split | outcome         |
//! |------------------|------------------|----------------|-----------------|
//! | equal            |                  |                | keep current    |
//! |                  | equal            | differs        | take other      |
//! |                  |                  | equal          | keep current    |
//! | differs          | differs          | differs        | conflict        |
//!
//! Taking other's version of a path it deleted means deleting it.

use crate::artifacts::objects::commit::Manifest;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The current version already is the merged one
    KeepCurrent,
    /// Write other's blob and stage it
    TakeOther(ObjectId),
    /// Other deleted the path: remove it and stage the removal
    Delete,
    /// Both sides diverged from the split point differently
    Conflict {
        current: Option<ObjectId>,
        other: Option<ObjectId>,
    },
}

impl Resolution {
    pub fn classify(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        other: Option<&ObjectId>,
    ) -> Self {
        if current == other || other == split {
            Resolution::KeepCurrent
        } else if current == split {
            match other {
                Some(oid) => Resolution::TakeOther(oid.clone()),
                None => Resolution::Delete,
            }
        } else {
            Resolution::Conflict {
                current: current.cloned(),
                other: other.cloned(),
            }
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Resolution::Conflict { .. })
    }
}

/// Classify every path of the three manifests, leaving out paths already merged
pub fn resolve(
    split: &Manifest,
    current: &Manifest,
    other: &Manifest,
) -> BTreeMap<PathBuf, Resolution> {
    let paths = split
        .keys()
        .chain(current.keys())
        .chain(other.keys())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .filter_map(|path| {
            let resolution =
                Resolution::classify(split.get(path), current.get(path), other.get(path));
            tracing::debug!(?path, ?resolution, "classified path");

            (resolution != Resolution::KeepCurrent).then(|| (path.clone(), resolution))
        })
        .collect()
}
