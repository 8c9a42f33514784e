//! Porcelain commands
//!
//! ## Commands
//!
//! - `init`: create the repository with its root commit
//! - `add` / `rm`: stage additions and removals
//! - `commit`: snapshot the stage on top of HEAD
//! - `log` / `global-log` / `find`: query history
//! - `status`: report branches, stage and working tree
//! - `checkout` / `reset`: move the working tree to another commit
//! - `branch` / `rm-branch`: create and delete branch pointers
//! - `merge`: three-way merge of another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
