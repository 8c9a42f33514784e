use crate::REPOSITORY_DIR;
use crate::areas::database::Database;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [REPOSITORY_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Turn a path given on the command line into one relative to the root
    ///
    /// Paths that resolve outside the working tree, or into the metadata
    /// directory, yield `None`.
    pub fn relative_path(&self, raw: &str) -> Option<PathBuf> {
        let path = Path::new(raw);
        let path = path.strip_prefix(self.path.as_ref()).unwrap_or(path);

        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => relative.push(name),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        let inside_metadata = relative
            .components()
            .next()
            .is_some_and(|first| first.as_os_str() == REPOSITORY_DIR);
        if relative.as_os_str().is_empty() || inside_metadata {
            return None;
        }

        Some(relative)
    }

    /// Whether a relative path can be recorded in a commit manifest
    pub fn is_storable(path: &Path) -> bool {
        path.to_str().is_some_and(|path| !path.contains(['\n', '\r']))
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    pub fn is_file(&self, path: &Path) -> bool {
        self.path.join(path).is_file()
    }

    /// Every regular file of the working tree, relative to its root, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self.files_under(Path::new("")))
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.path.join(path).is_dir()
    }

    /// Regular files below `dir`, relative to the root, sorted
    pub fn files_under(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = WalkDir::new(self.path.join(dir))
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(PathBuf::from)
            })
            .collect::<Vec<_>>();

        files.sort();
        files
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    /// Create or overwrite a working file, creating parent directories as needed
    ///
    /// An empty directory at `file_path` is replaced; a populated one is an error.
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir(&full_path).with_context(|| {
                format!("Failed to replace non-empty directory: {:?}", file_path)
            })?;
        }
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent of: {:?}", file_path))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a working file if present, then prune directories left empty
    pub fn delete_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(&full_path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // Deletions go first so a file can replace a directory emptied by them.
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> anyhow::Result<()> {
        for action in [ActionType::Delete, ActionType::Modify, ActionType::Add] {
            for (file_path, oid) in migration.actions_of(&action) {
                match (&action, oid) {
                    (ActionType::Delete, None) => self.delete_file(file_path)?,
                    (ActionType::Add | ActionType::Modify, Some(oid)) => {
                        let blob = database.parse_object_as_blob(oid)?;
                        self.write_file(file_path, blob.content())?;
                    }
                    _ => anyhow::bail!("Invalid action and entry combination"),
                }
            }
        }

        Ok(())
    }
}
