//! GitHub API client module using octocrab.
//!
//! Provides trait-based repository, content, git-object, and pull request
//! operations on a single `GitHubClient`, with the error classification that
//! makes the write operations idempotent.

mod client;
mod content;
pub(crate) mod error;
mod git;
mod models;
mod pr;
mod repo;

pub use client::GitHubClient;
pub use content::{ContentClient, ContentWalk, FileWrite};
pub use error::GitHubError;
pub use git::GitClient;
pub use models::{
    Branch, Commit, CommitPointer, ContentEntry, ContentKind, Contents, FileCommit, GitRef,
    ObjectSha, PrRef, PullRequestInfo, RepoHandle, StagedChange, Tag,
};
pub use pr::{CreatePrParams, PrClient};
pub use repo::{RepoClient, RepoSpec};

/// Branch used when a caller does not name one.
pub const DEFAULT_BRANCH: &str = "main";
