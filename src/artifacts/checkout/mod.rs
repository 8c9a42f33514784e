//! Checkout operations
//!
//! Switching the working tree from one commit to another is planned in full
//! before any file is touched, so an untracked file in the way aborts the whole
//! operation with nothing written.

pub mod migration;
