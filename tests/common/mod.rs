#![allow(dead_code)]

pub mod command;
pub mod file;

/// Date pinned on every commit made through the helpers
pub const COMMIT_DATE: &str = "2024-01-01 12:00:00 +0000";
