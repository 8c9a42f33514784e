use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    /// Full on-disk encoding, envelope included
    fn serialize(&self) -> anyhow::Result<Bytes>;
}

pub trait Unpackable: Sized {
    /// Decode a body whose envelope has already been consumed
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self>;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        let digest = Sha1::digest(self.serialize()?);
        ObjectId::try_parse(format!("{digest:x}"))
    }
}

/// Wrap a body in the `<type> <size>\0` envelope shared by every object
pub(crate) fn with_header(object_type: ObjectType, body: &[u8]) -> Bytes {
    let header = format!("{object_type} {}\0", body.len());

    let mut object_bytes = BytesMut::with_capacity(header.len() + body.len());
    object_bytes.put_slice(header.as_bytes());
    object_bytes.put_slice(body);

    object_bytes.freeze()
}
