//! Repository resolution.

use serde::Deserialize;

use super::client::GitHubClient;
use super::error::Result;
use super::models::RepoHandle;

/// A repository argument: either a plain `owner/name` string still to be
/// looked up, or a handle that has already been resolved.
#[derive(Debug, Clone, Copy)]
pub enum RepoSpec<'a> {
    Name(&'a str),
    Handle(&'a RepoHandle),
}

impl<'a> From<&'a str> for RepoSpec<'a> {
    fn from(name: &'a str) -> Self {
        RepoSpec::Name(name)
    }
}

impl<'a> From<&'a RepoHandle> for RepoSpec<'a> {
    fn from(handle: &'a RepoHandle) -> Self {
        RepoSpec::Handle(handle)
    }
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    full_name: String,
}

/// Trait for repository operations.
#[async_trait::async_trait]
pub trait RepoClient: Send + Sync {
    /// Resolve a repository spec to a handle. A handle passes through
    /// unchanged; a name issues a lookup and adopts the canonical
    /// `full_name` from the response.
    async fn resolve_repo(&self, spec: RepoSpec<'_>) -> Result<RepoHandle>;
}

#[async_trait::async_trait]
impl RepoClient for GitHubClient {
    async fn resolve_repo(&self, spec: RepoSpec<'_>) -> Result<RepoHandle> {
        match spec {
            RepoSpec::Handle(handle) => Ok(handle.clone()),
            RepoSpec::Name(name) => {
                let info: RepoInfo = self
                    .client
                    .get(format!("/repos/{name}"), None::<&()>)
                    .await?;
                RepoHandle::from_full_name(&info.full_name)
            }
        }
    }
}
