//! Blob object
//!
//! A blob is the content of one file and nothing else: the path it was found
//! at is recorded by the commit manifest that references it.
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(with_header(self.object_type(), &self.content))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been consumed
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use proptest::proptest;
    use std::io::Cursor;

    proptest! {
        #[test]
        fn identical_content_yields_identical_ids(content in ".*") {
            let first = Blob::new(Bytes::from(content.clone()));
            let second = Blob::new(Bytes::from(content));

            assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        }
    }

    #[test]
    fn id_matches_the_git_blob_hash() {
        // `printf 'x' | git hash-object --stdin`
        let blob = Blob::new(Bytes::from_static(b"x"));
        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "c1b0730e0133447badcfd47fd144e254807b06e1"
        );
    }

    #[test]
    fn deserializes_what_it_serialized() {
        let blob = Blob::new(Bytes::from_static(b"line one\nline two\n"));
        let mut reader = Cursor::new(blob.serialize().unwrap());

        let (object_type, size) = ObjectType::read_envelope(&mut reader).unwrap();
        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(size, blob.content().len());
        assert_eq!(Blob::deserialize(reader).unwrap(), blob);
    }
}
