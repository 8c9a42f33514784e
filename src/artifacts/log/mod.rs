//! Commit history traversal
//!
//! - `rev_list`: first-parent walk used by `log`, and the breadth-first
//!   ancestor walk behind `global-log`, `find` and split-point search
//!
//! Both walks load commits lazily by id, so the graph is never held in memory
//! as linked nodes.

pub mod rev_list;
