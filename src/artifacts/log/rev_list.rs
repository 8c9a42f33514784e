use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::{HashSet, VecDeque};

/// First-parent history from a starting commit down to the root
#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start_oid: ObjectId,
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = anyhow::Result<(ObjectId, Commit)>;
    type IntoIter = RevListIntoIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            repository: self.repository,
            current_commit_oid: Some(self.start_oid),
        }
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self
            .repository
            .database()
            .parse_object_as_commit(&commit_oid)
        {
            Ok(commit) => {
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Breadth-first walk over parent and second-parent edges
///
/// Yields the start commit first, then each ancestor once, visiting a commit's
/// first parent before its second. The walk stops after the first load error.
pub struct Ancestors<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    load_parents: ParentsLoaderFn,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<ParentsLoaderFn> Ancestors<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(start: ObjectId, load_parents: ParentsLoaderFn) -> Self {
        Self {
            load_parents,
            seen: HashSet::from([start.clone()]),
            queue: VecDeque::from([start]),
        }
    }
}

impl<ParentsLoaderFn> Iterator for Ancestors<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.queue.pop_front()?;

        match (self.load_parents)(&oid) {
            Ok(parents) => {
                for parent in parents {
                    if self.seen.insert(parent.clone()) {
                        self.queue.push_back(parent);
                    }
                }
                Some(Ok(oid))
            }
            Err(error) => {
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}

/// Every commit reachable from any of `heads`, each listed once
pub fn reachable_from<ParentsLoaderFn>(
    heads: impl IntoIterator<Item = ObjectId>,
    load_parents: ParentsLoaderFn,
) -> anyhow::Result<Vec<ObjectId>>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    let mut seen = HashSet::new();
    let mut reachable = Vec::new();

    for head in heads {
        if seen.contains(&head) {
            continue;
        }

        for oid in Ancestors::new(head, &load_parents) {
            let oid = oid?;
            if seen.insert(oid.clone()) {
                reachable.push(oid);
            }
        }
    }

    tracing::debug!(commits = reachable.len(), "collected reachable commits");
    Ok(reachable)
}
