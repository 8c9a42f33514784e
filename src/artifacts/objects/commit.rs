//! Commit object
//!
//! A commit is an immutable node of the history graph. Unlike git, it carries
//! its whole snapshot inline: the manifest maps every tracked path to the blob
//! holding its content.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! parent <parent-id>            (absent for the root, twice for merges)
//! timestamp <unix-seconds> <+hhmm>
//! entry <blob-id> <path>        (one per manifest entry, sorted by path)
//!
//! <message>
//! ```
//!
//! The manifest is a `BTreeMap`, so entries are always written in ascending
//! path order and logically identical commits hash to the same id.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone, Timelike};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Complete path-to-blob mapping of one snapshot
pub type Manifest = BTreeMap<PathBuf, ObjectId>;

/// Message of the commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "BOUGH_COMMIT_DATE";

const LOG_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// First parent, then the merged-in head for merge commits
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    message: String,
    manifest: Manifest,
}

impl Commit {
    pub fn new(
        parent: ObjectId,
        second_parent: Option<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        message: String,
        manifest: Manifest,
    ) -> Self {
        let parents = std::iter::once(parent).chain(second_parent).collect();

        Commit {
            parents,
            // ids only cover whole seconds
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            message,
            manifest,
        }
    }

    /// The parentless commit every repository starts from
    pub fn root() -> Self {
        let epoch = FixedOffset::east_opt(0)
            .and_then(|utc| utc.timestamp_opt(0, 0).single())
            .unwrap_or_default();

        Commit {
            parents: Vec::new(),
            timestamp: epoch,
            message: ROOT_COMMIT_MESSAGE.to_string(),
            manifest: Manifest::new(),
        }
    }

    /// Timestamp for a new commit: `BOUGH_COMMIT_DATE` if set, local now otherwise
    pub fn timestamp_from_env() -> anyhow::Result<DateTime<FixedOffset>> {
        match std::env::var(COMMIT_DATE_ENV) {
            Ok(date) => DateTime::parse_from_rfc2822(&date)
                .or_else(|_| DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z"))
                .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {date}")),
            Err(_) => Ok(chrono::Local::now().fixed_offset()),
        }
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn entry(&self, path: &Path) -> Option<&ObjectId> {
        self.manifest.get(path)
    }

    pub fn tracks(&self, path: &Path) -> bool {
        self.manifest.contains_key(path)
    }

    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(LOG_DATE_FORMAT).to_string()
    }

    /// Render the record printed by `log` and kept in the per-branch log
    pub fn log_record(&self, oid: &ObjectId) -> String {
        let mut record = format!("===\ncommit {oid}\n");

        if let (Some(parent), Some(second_parent)) = (self.parent(), self.second_parent()) {
            record.push_str(&format!(
                "Merge: {} {}\n",
                parent.to_short_oid(),
                second_parent.to_short_oid()
            ));
        }

        record.push_str(&format!("Date: {}\n", self.readable_timestamp()));
        record.push_str(&format!("{}\n\n", self.message));
        record
    }

    fn body(&self) -> String {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.manifest {
            lines.push(format!("entry {oid} {}", manifest_path(path)));
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

/// Paths are always stored with `/` separators
fn manifest_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, offset) = value
        .split_once(' ')
        .context("Invalid commit object: malformed timestamp")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: malformed timestamp seconds")?;

    if offset.len() != 5 {
        anyhow::bail!("Invalid commit object: malformed timezone {offset}");
    }
    let sign = match &offset[..1] {
        "+" => 1,
        "-" => -1,
        _ => anyhow::bail!("Invalid commit object: malformed timezone {offset}"),
    };
    let hours = offset[1..3].parse::<i32>()?;
    let minutes = offset[3..5].parse::<i32>()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .and_then(|offset| offset.timestamp_opt(seconds, 0).single())
        .context("Invalid commit object: timestamp out of range")
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(with_header(self.object_type(), self.body().as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut lines = content.split('\n');
        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut manifest = Manifest::new();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(value) = line.strip_prefix("timestamp ") {
                timestamp = Some(parse_timestamp(value)?);
            } else if let Some(entry) = line.strip_prefix("entry ") {
                let (oid, path) = entry
                    .split_once(' ')
                    .context("Invalid commit object: malformed entry line")?;
                manifest.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing timestamp")?;
        let message = lines.collect::<Vec<_>>().join("\n");

        Ok(Commit {
            parents,
            timestamp,
            message,
            manifest,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
