//! Three-way merge
//!
//! - `split_point`: picks the common ancestor used as the merge base
//! - `resolution`: classifies every path against base, current and other
//! - `conflict`: renders the conflict-marker file for paths both sides changed

pub mod conflict;
pub mod resolution;
pub mod split_point;
