//! Stored objects
//!
//! The object store holds exactly two kinds of immutable objects:
//!
//! - **Blob**: the content of one file
//! - **Commit**: a full path-to-blob manifest plus message, timestamp and parent links
//!
//! Both share the envelope `<type> <size>\0<body>`; an object's id is the SHA-1
//! of that whole encoding, so identical content always maps to the same id.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form shown in logs and merge records
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;

/// Shortest prefix accepted when resolving an abbreviated id
pub const MIN_PREFIX_LENGTH: usize = 4;
