//! Working tree status inspection
//!
//! Compares the working tree against the staging area and the HEAD commit.
//!
//! ## Components
//!
//! - `file_change`: how a working file diverges from what is recorded
//! - `inspector`: per-path checks shared by `status`, `checkout` and `merge`
//! - `status_info`: the report printed by `status`

pub mod file_change;
pub mod inspector;
pub mod status_info;
