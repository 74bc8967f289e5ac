//! GitHub API client construction.

use super::error::Result;

/// Thin wrapper around an octocrab client.
///
/// Constructed once at process start from an injected token and passed by
/// reference into every operation; there is no hidden global instance.
pub struct GitHubClient {
    pub(crate) client: octocrab::Octocrab,
}

impl GitHubClient {
    /// Create a client authenticated with a personal access token.
    pub fn new(token: &str) -> Result<Self> {
        let client = octocrab::Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self { client })
    }

    /// Create a client pointed at a non-default API base URL.
    ///
    /// Used by tests to target a local mock server.
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        let client = octocrab::Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_url)?
            .build()?;
        Ok(Self { client })
    }
}
