use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::Context;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Stream adapter hashing every byte read or written through it
///
/// The staging file ends with the SHA-1 of everything before it; `verify`
/// checks that trailer on load and `write_checksum` appends it on save.
pub struct Checksum<S> {
    stream: S,
    digest: Sha1,
}

impl<S> Checksum<S> {
    pub(crate) fn new(stream: S) -> Self {
        Checksum {
            stream,
            digest: Sha1::new(),
        }
    }

    fn current_digest(&self) -> [u8; CHECKSUM_SIZE] {
        let mut digest = [0u8; CHECKSUM_SIZE];
        digest.copy_from_slice(&self.digest.clone().finalize());
        digest
    }
}

impl<S: Read> Checksum<S> {
    pub(crate) fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.stream
            .read_exact(&mut buffer)
            .context("Unexpected end-of-file while reading staging file")?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    /// Read the trailing checksum and compare it with the bytes read so far
    pub(crate) fn verify(&mut self) -> anyhow::Result<()> {
        let mut stored = [0u8; CHECKSUM_SIZE];
        self.stream
            .read_exact(&mut stored)
            .context("Staging file is missing its checksum")?;

        if stored != self.current_digest() {
            anyhow::bail!("Staging file checksum does not match its contents");
        }

        Ok(())
    }
}

impl<S: Write> Checksum<S> {
    pub(crate) fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.stream.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    pub(crate) fn write_checksum(&mut self) -> anyhow::Result<()> {
        let checksum = self.current_digest();
        self.stream
            .write_all(&checksum)
            .context("Failed to write checksum to staging file")?;

        self.stream.flush()?;
        Ok(())
    }
}
