//! Pull request operations.

use serde_json::json;
use tracing::info;

use super::DEFAULT_BRANCH;
use super::client::GitHubClient;
use super::error::{self, GitHubError, Result};
use super::models::{PullRequestInfo, RepoHandle};

/// Parameters for creating a pull request.
#[derive(Debug, Clone)]
pub struct CreatePrParams {
    pub head: String,
    /// Base branch; `main` when absent.
    pub base: Option<String>,
    pub title: String,
    pub body: String,
}

#[derive(serde::Serialize)]
struct PrLookupParams<'a> {
    head: String,
    base: &'a str,
    state: &'a str,
}

/// Trait for pull request operations.
#[async_trait::async_trait]
pub trait PrClient: Send + Sync {
    /// Open a pull request from `head` into `base`.
    ///
    /// Idempotent: when a PR already exists for the head/base pair, the
    /// existing open one is looked up and returned instead of failing.
    async fn create_pull_request(
        &self,
        repo: &RepoHandle,
        params: CreatePrParams,
    ) -> Result<PullRequestInfo>;
}

#[async_trait::async_trait]
impl PrClient for GitHubClient {
    async fn create_pull_request(
        &self,
        repo: &RepoHandle,
        params: CreatePrParams,
    ) -> Result<PullRequestInfo> {
        let base = params.base.as_deref().unwrap_or(DEFAULT_BRANCH);
        let route = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let body = json!({
            "title": params.title,
            "head": params.head,
            "base": base,
            "body": params.body,
        });

        let attempt: std::result::Result<PullRequestInfo, octocrab::Error> =
            self.client.post(&route, Some(&body)).await;
        match attempt {
            Ok(pr) => {
                info!(head = %params.head, number = pr.number, "opened pull request");
                Ok(pr)
            }
            Err(err) => {
                let rejected = error::rejected_422(err)?;
                if !error::already_exists(&rejected.errors_payload(), "already exist") {
                    return Err(rejected.into_error());
                }
                info!(head = %params.head, "pull request already exists");

                let open: Vec<PullRequestInfo> = self
                    .client
                    .get(
                        &route,
                        Some(&PrLookupParams {
                            head: format!("{}:{}", repo.owner, params.head),
                            base,
                            state: "open",
                        }),
                    )
                    .await?;
                open.into_iter()
                    .next()
                    .ok_or_else(|| GitHubError::MissingPullRequest {
                        head: params.head.clone(),
                    })
            }
        }
    }
}
