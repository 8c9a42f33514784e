use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const ADDITION_MARKER: u8 = b'A';
const REMOVAL_MARKER: u8 = b'R';

/// One pending change as written to the staging file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEntry {
    Addition { path: PathBuf, oid: ObjectId },
    Removal { path: PathBuf },
}

impl StageEntry {
    pub fn path(&self) -> &Path {
        match self {
            StageEntry::Addition { path, .. } | StageEntry::Removal { path } => path,
        }
    }

    /// Read the next entry, feeding every byte through the checksum
    pub(crate) fn read_from(reader: &mut Checksum<impl Read>) -> anyhow::Result<Self> {
        let marker = reader.read(1)?[0];

        let oid = match marker {
            ADDITION_MARKER => {
                let raw = reader.read(OBJECT_ID_LENGTH / 2)?;
                Some(ObjectId::read_h40_from(&mut raw.as_ref())?)
            }
            REMOVAL_MARKER => None,
            other => return Err(anyhow!("Invalid staging entry marker: {other:#04x}")),
        };

        let path_length = byteorder::NetworkEndian::read_u16(&reader.read(2)?) as usize;
        let path = String::from_utf8(reader.read(path_length)?.to_vec())
            .map_err(|_| anyhow!("Staging entry path is not valid UTF-8"))?;
        let path = PathBuf::from(path);

        Ok(match oid {
            Some(oid) => StageEntry::Addition { path, oid },
            None => StageEntry::Removal { path },
        })
    }
}

impl Packable for StageEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut entry_bytes = Vec::new();

        match self {
            StageEntry::Addition { oid, .. } => {
                entry_bytes.write_u8(ADDITION_MARKER)?;
                oid.write_h40_to(&mut entry_bytes)?;
            }
            StageEntry::Removal { .. } => entry_bytes.write_u8(REMOVAL_MARKER)?,
        }

        let path = self
            .path()
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let path_length = u16::try_from(path.len())
            .map_err(|_| anyhow!("Path too long to stage: {path}"))?;

        entry_bytes.write_u16::<byteorder::NetworkEndian>(path_length)?;
        entry_bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(entry_bytes))
    }
}
