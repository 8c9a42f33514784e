use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::Context;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::BufRead;

/// Fixed-size preamble of the staging file
///
/// Decoding rejects foreign signatures and unknown versions, so a parsed
/// header is always one this build can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn with_entries(entries_count: u32) -> Self {
        IndexHeader { entries_count }
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.extend_from_slice(SIGNATURE);
        bytes.write_u32::<NetworkEndian>(VERSION)?;
        bytes.write_u32::<NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut signature = [0u8; 4];
        reader
            .read_exact(&mut signature)
            .context("Staging file header is truncated")?;
        if &signature != SIGNATURE {
            anyhow::bail!("Invalid staging file signature");
        }

        let version = reader.read_u32::<NetworkEndian>()?;
        if version != VERSION {
            anyhow::bail!("Unsupported staging file version: {version}");
        }

        let entries_count = reader
            .read_u32::<NetworkEndian>()
            .context("Staging file header is truncated")?;

        Ok(IndexHeader { entries_count })
    }
}
