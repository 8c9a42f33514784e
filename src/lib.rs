//! bough: a miniature version-control engine
//!
//! The crate is split the same way the on-disk repository is:
//!
//! - `areas`: stateful components backed by files under `.bough/`
//! - `artifacts`: value types and the algorithms that operate on them
//! - `commands`: one `impl Repository` block per user-facing verb
//! - `errors`: the user-facing error taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the metadata directory at the root of the working tree
pub const REPOSITORY_DIR: &str = ".bough";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";
