//! Staging file format
//!
//! The staging area is persisted to `.bough/index`:
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "STGE" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Kind: b'A' (addition) or b'R' (removal)
//!   - Blob id: 20 raw bytes, additions only
//!   - Path length: u16
//!   - Path bytes, `/`-separated
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are in network byte order.

pub mod checksum;
pub mod index_header;
pub mod stage_entry;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying staging files
pub const SIGNATURE: &[u8; 4] = b"STGE";

/// Staging file format version
pub const VERSION: u32 = 1;
