//! Core repository components
//!
//! Each area owns one part of the `.bough/` directory:
//!
//! - `database`: content-addressed store for blobs and commits
//! - `index`: staging area of pending additions and removals
//! - `refs`: branch pointers, HEAD and per-branch logs
//! - `repository`: the per-invocation context tying the areas together
//! - `workspace`: working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
