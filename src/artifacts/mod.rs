//! Data structures and algorithms
//!
//! - `branch`: validated branch names
//! - `checkout`: working-tree migration between commits
//! - `core`: shared utilities (pager wrapper, environment switches)
//! - `index`: staging-file format
//! - `log`: commit history traversal
//! - `merge`: split-point search and three-way classification
//! - `objects`: stored object types (blob, commit)
//! - `status`: working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
