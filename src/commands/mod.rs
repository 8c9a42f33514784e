//! Command implementations
//!
//! Every user-facing verb is an `impl Repository` block under `porcelain`.
//! Commands validate everything they need before their first write, so a
//! failing command leaves the repository as it found it.

pub mod porcelain;
