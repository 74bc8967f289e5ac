//! Client helpers for moving repository content around through the GitHub
//! REST API: read files from one repository, stage and commit changes to
//! another, create branches, and open pull requests.
//!
//! Writes are wrapped in idempotency checks: a write that hits an
//! "already exists" rejection is retried as an update or resolved to the
//! existing resource instead of failing. There is no local state; all
//! entities live on the remote side.

pub mod github;

pub use github::{
    ContentClient, CreatePrParams, FileWrite, GitClient, GitHubClient, GitHubError, PrClient,
    RepoClient, RepoSpec,
};
