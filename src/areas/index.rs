//! Staging area
//!
//! The staging area buffers the changes that the next commit will apply on top
//! of its parent's manifest:
//!
//! - `additions`: paths mapped to the blob they will point at
//! - `removals`: paths that will be dropped from the manifest
//!
//! A path never sits in both sets at once. The whole area is cleared once a
//! commit succeeds.
//!
//! The area is read from disk at the start of a command (`rehydrate`) and
//! written back at the end (`write_updates`), each under an advisory lock on
//! the staging file.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::stage_entry::StageEntry;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging file (typically `.bough/index`)
    path: Box<Path>,
    additions: BTreeMap<PathBuf, ObjectId>,
    removals: BTreeSet<PathBuf>,
    /// Set once the in-memory state diverges from the file
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the staging area from disk, replacing whatever is in memory
    ///
    /// A missing or empty file is an empty staging area.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.reset();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open staging file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock.deref_mut());
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header(&self, reader: &mut Checksum<impl Read>) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        Ok(header.entries_count)
    }

    fn parse_entries(
        &mut self,
        entries_count: u32,
        reader: &mut Checksum<impl Read>,
    ) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            match StageEntry::read_from(reader)? {
                StageEntry::Addition { path, oid } => {
                    self.additions.insert(path, oid);
                }
                StageEntry::Removal { path } => {
                    self.removals.insert(path);
                }
            }
        }

        Ok(())
    }

    fn reset(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;
    }

    /// Stage `path` to point at `oid`, cancelling any pending removal
    pub fn stage_addition(&mut self, path: PathBuf, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
        self.changed = true;
    }

    /// Stage `path` for deletion, cancelling any pending addition
    pub fn stage_removal(&mut self, path: PathBuf) {
        self.additions.remove(&path);
        self.removals.insert(path);
        self.changed = true;
    }

    /// Drop whatever is pending for `path`
    pub fn unstage(&mut self, path: &Path) -> bool {
        let unstaged = self.additions.remove(path).is_some() | self.removals.remove(path);
        self.changed |= unstaged;
        unstaged
    }

    pub fn clear(&mut self) {
        if !self.is_clean() {
            self.changed = true;
        }
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_clean(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn addition(&self, path: &Path) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<PathBuf> {
        &self.removals
    }

    fn entries(&self) -> impl Iterator<Item = StageEntry> + '_ {
        let additions = self
            .additions
            .iter()
            .map(|(path, oid)| StageEntry::Addition {
                path: path.clone(),
                oid: oid.clone(),
            });
        let removals = self
            .removals
            .iter()
            .map(|path| StageEntry::Removal { path: path.clone() });

        additions.chain(removals)
    }

    /// Persist the staging area under an exclusive lock
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open staging file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock.deref_mut());

        let entries_count = u32::try_from(self.additions.len() + self.removals.len())
            .map_err(|_| anyhow!("Too many staged entries"))?;
        writer.write(&IndexHeader::with_entries(entries_count).serialize()?)?;

        for entry in self.entries().collect::<Vec<_>>() {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }
}
