use crate::artifacts::objects::MIN_PREFIX_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Write};
use std::path::{Path, PathBuf};

/// Commits already parsed during the current command, keyed by id
///
/// History walks revisit the same commits many times; the cache keeps each one
/// parsed once per invocation.
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: RefCell<HashMap<ObjectId, Commit>>,
}

impl CommitCache {
    fn get(&self, oid: &ObjectId) -> Option<Commit> {
        self.commits.borrow().get(oid).cloned()
    }

    fn insert(&self, oid: ObjectId, commit: Commit) {
        self.commits.borrow_mut().insert(oid, commit);
    }
}

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    commit_cache: CommitCache,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            commit_cache: CommitCache::default(),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist an object and return its id
    ///
    /// Storing an object that already exists is a no-op.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let oid = object.object_id()?;
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
            tracing::debug!(%oid, object_type = %object.object_type(), "stored object");
        }

        Ok(oid)
    }

    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.read_object(self.path.join(object_id.to_path()))
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader),
            other => anyhow::bail!("Object {object_id} is a {other}, not a blob"),
        }
    }

    /// Load a commit through the per-invocation cache
    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        if let Some(commit) = self.commit_cache.get(object_id) {
            return Ok(commit);
        }

        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;
        let commit = match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader)?,
            other => anyhow::bail!("Object {object_id} is a {other}, not a commit"),
        };

        self.commit_cache.insert(object_id.clone(), commit.clone());
        Ok(commit)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let total_size = object_content.len();
        let mut object_reader = Cursor::new(object_content);

        let (object_type, body_size) = ObjectType::read_envelope(&mut object_reader)
            .with_context(|| format!("Unable to parse object {object_id}"))?;

        let remaining = total_size - object_reader.position() as usize;
        if remaining != body_size {
            anyhow::bail!("Object {object_id} has a corrupt body: expected {body_size} bytes, found {remaining}");
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename so a half-written object is never visible under its id
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose id starts with the given prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// searched; shorter prefixes scan every directory.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let full_oid = format!("{dir_name}{}", file_name.to_string_lossy());

                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Resolve a full or abbreviated id to exactly one stored commit
    pub fn resolve_commit(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if !prefix.is_empty()
            && prefix.len() < MIN_PREFIX_LENGTH
            && prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(RepositoryError::AmbiguousCommitId(prefix.to_string()).into());
        }
        if !ObjectId::is_valid_prefix(prefix) {
            return Err(RepositoryError::NoSuchCommit.into());
        }

        let candidates = self
            .find_objects_by_prefix(prefix)?
            .into_iter()
            .filter(|oid| matches!(self.get_object_type(oid), Ok(ObjectType::Commit)))
            .collect::<Vec<_>>();

        match candidates.as_slice() {
            [] => Err(RepositoryError::NoSuchCommit.into()),
            [oid] => Ok(oid.clone()),
            _ => {
                tracing::debug!(prefix, candidates = candidates.len(), "ambiguous commit id");
                Err(RepositoryError::AmbiguousCommitId(prefix.to_string()).into())
            }
        }
    }
}
