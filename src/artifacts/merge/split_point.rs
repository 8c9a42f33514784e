//! Split-point search
//!
//! The split point of two branch heads is found in two passes:
//!
//! 1. walk every ancestor of the current head breadth-first and mark it
//!    `VISITED_FROM_CURRENT`
//! 2. walk the ancestors of the other head breadth-first, marking each
//!    `VISITED_FROM_OTHER`, and stop at the first commit carrying both marks
//!
//! Under criss-cross histories this is *a* common ancestor chosen by walk
//! order, not necessarily a lowest one. Merge classification depends on which
//! commit is chosen, so the walk order is part of the contract.

use crate::artifacts::log::rev_list::Ancestors;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const VISITED_FROM_CURRENT = 0b01;
        const VISITED_FROM_OTHER = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_CURRENT.bits() | Self::VISITED_FROM_OTHER.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_CURRENT) {
            flags.push("CURRENT");
        }
        if self.contains(VisitState::VISITED_FROM_OTHER) {
            flags.push("OTHER");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Finds the merge base of two commits
///
/// Generic over the function loading a commit's parent ids, so the search runs
/// the same against the object store and an in-memory graph.
pub struct SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    load_parents: ParentsLoaderFn,
}

impl<ParentsLoaderFn> SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(load_parents: ParentsLoaderFn) -> Self {
        Self { load_parents }
    }

    /// Split point of `current` and `other`, or `None` for unrelated histories
    pub fn find(&self, current: &ObjectId, other: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let mut states = HashMap::<ObjectId, VisitState>::new();

        for oid in Ancestors::new(current.clone(), &self.load_parents) {
            states.insert(oid?, VisitState::VISITED_FROM_CURRENT);
        }

        for oid in Ancestors::new(other.clone(), &self.load_parents) {
            let oid = oid?;
            let state = states.entry(oid.clone()).or_default();
            state.insert(VisitState::VISITED_FROM_OTHER);

            if state.contains(VisitState::VISITED_FROM_BOTH) {
                tracing::debug!(%current, %other, split_point = %oid, state = ?state, "found split point");
                return Ok(Some(oid));
            }
        }

        tracing::debug!(%current, %other, "histories share no commit");
        Ok(None)
    }
}
