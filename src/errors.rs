//! User-facing error taxonomy
//!
//! Every variant renders as the single line printed when a command aborts.
//! Validation always happens before any mutation, so raising one of these
//! leaves the repository untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Not in an initialized bough directory.")]
    NotInitialized,

    #[error("A bough version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Incorrect operands.")]
    InvalidOperandCount,

    #[error("Please enter a command.")]
    NoCommandGiven,

    #[error("No command with that name exists.")]
    UnknownCommand,

    #[error("File does not exist.")]
    FileNotFound,

    #[error("File names with line breaks cannot be tracked.")]
    UnsupportedFileName,

    #[error("File does not exist in that commit.")]
    FileNotFoundInCommit,

    #[error("A branch with that name does not exist.")]
    NoSuchBranch,

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("No commit with that id exists.")]
    NoSuchCommit,

    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommitId(String),

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("No changes added to the commit.")]
    NoChanges,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("Found no commit with that message.")]
    NoMatchingCommit,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileWouldBeOverwritten,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,
}

/// Check whether an `anyhow` error carries a specific taxonomy variant
pub fn is_repository_error(error: &anyhow::Error, expected: &RepositoryError) -> bool {
    error
        .downcast_ref::<RepositoryError>()
        .is_some_and(|actual| actual == expected)
}
