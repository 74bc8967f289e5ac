//! Git object operations: refs, blobs, trees, commits.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use tracing::{debug, info};

use super::DEFAULT_BRANCH;
use super::client::GitHubClient;
use super::error::{self, GitHubError, Result};
use super::models::{Branch, Commit, GitRef, ObjectSha, RepoHandle, StagedChange, Tag};

#[derive(serde::Serialize)]
struct PageParam {
    per_page: u8,
}

/// Trait for git-object operations.
#[async_trait::async_trait]
pub trait GitClient: Send + Sync {
    /// Resolve a name that may be a branch or a tag to a commit sha.
    /// Branches are searched first, so a branch shadows a tag of the same
    /// name. No match is a resolution failure.
    async fn ref_sha(&self, repo: &RepoHandle, name: &str) -> Result<String>;

    /// Create `branch` at the tip of `source` (`main` when absent).
    ///
    /// Creation is idempotent: when the ref already exists it is returned
    /// as-is and its sha is left untouched.
    async fn create_branch(
        &self,
        repo: &RepoHandle,
        branch: &str,
        source: Option<&str>,
    ) -> Result<GitRef>;

    /// Upload `content` as a blob and describe it as a staged regular-file
    /// change at `path`. A fresh blob is created on every call; no
    /// content-addressed dedup is attempted.
    async fn stage_change(
        &self,
        repo: &RepoHandle,
        path: &str,
        content: &[u8],
    ) -> Result<StagedChange>;

    /// Commit the staged changes on top of the branch head and move the
    /// branch ref to the new commit.
    ///
    /// Not atomic against concurrent pushes: a writer that lands between
    /// reading the head and moving the ref is silently overwritten. Callers
    /// that need safety against that must serialize externally.
    async fn push_changes(
        &self,
        repo: &RepoHandle,
        changes: &[StagedChange],
        message: &str,
        branch: Option<&str>,
    ) -> Result<Commit>;
}

#[async_trait::async_trait]
impl GitClient for GitHubClient {
    async fn ref_sha(&self, repo: &RepoHandle, name: &str) -> Result<String> {
        let branches: Vec<Branch> = self
            .client
            .get(
                format!("/repos/{}/{}/branches", repo.owner, repo.name),
                Some(&PageParam { per_page: 100 }),
            )
            .await?;
        if let Some(branch) = branches.into_iter().find(|b| b.name == name) {
            return Ok(branch.commit.sha);
        }

        let tags: Vec<Tag> = self
            .client
            .get(
                format!("/repos/{}/{}/tags", repo.owner, repo.name),
                Some(&PageParam { per_page: 100 }),
            )
            .await?;
        if let Some(tag) = tags.into_iter().find(|t| t.name == name) {
            return Ok(tag.commit.sha);
        }

        Err(GitHubError::RefNotFound(name.to_string()))
    }

    async fn create_branch(
        &self,
        repo: &RepoHandle,
        branch: &str,
        source: Option<&str>,
    ) -> Result<GitRef> {
        let source = source.unwrap_or(DEFAULT_BRANCH);
        let tip: Branch = self
            .client
            .get(
                format!("/repos/{}/{}/branches/{}", repo.owner, repo.name, source),
                None::<&()>,
            )
            .await?;

        let body = json!({
            "ref": format!("refs/heads/{branch}"),
            "sha": tip.commit.sha,
        });
        let attempt: std::result::Result<GitRef, octocrab::Error> = self
            .client
            .post(
                format!("/repos/{}/{}/git/refs", repo.owner, repo.name),
                Some(&body),
            )
            .await;
        match attempt {
            Ok(created) => {
                info!(branch, sha = %created.object.sha, "created branch");
                Ok(created)
            }
            Err(err) => {
                let rejected = error::rejected_422(err)?;
                if !error::already_exists(&rejected.message_payload(), "already exist") {
                    return Err(rejected.into_error());
                }
                info!(branch, "branch already exists");
                let existing: GitRef = self
                    .client
                    .get(
                        format!(
                            "/repos/{}/{}/git/ref/heads/{}",
                            repo.owner, repo.name, branch
                        ),
                        None::<&()>,
                    )
                    .await?;
                Ok(existing)
            }
        }
    }

    async fn stage_change(
        &self,
        repo: &RepoHandle,
        path: &str,
        content: &[u8],
    ) -> Result<StagedChange> {
        let body = json!({
            "content": STANDARD.encode(content),
            "encoding": "base64",
        });
        let blob: ObjectSha = self
            .client
            .post(
                format!("/repos/{}/{}/git/blobs", repo.owner, repo.name),
                Some(&body),
            )
            .await?;
        debug!(path, sha = %blob.sha, "staged blob");
        Ok(StagedChange::blob(path, blob.sha))
    }

    async fn push_changes(
        &self,
        repo: &RepoHandle,
        changes: &[StagedChange],
        message: &str,
        branch: Option<&str>,
    ) -> Result<Commit> {
        let branch = branch.unwrap_or(DEFAULT_BRANCH);

        // Start point: the branch's head commit and its tree.
        let head: Branch = self
            .client
            .get(
                format!("/repos/{}/{}/branches/{}", repo.owner, repo.name, branch),
                None::<&()>,
            )
            .await?;
        let head_commit: Commit = self
            .client
            .get(
                format!(
                    "/repos/{}/{}/git/commits/{}",
                    repo.owner, repo.name, head.commit.sha
                ),
                None::<&()>,
            )
            .await?;

        // New tree layered on the head tree, then a commit with the head as
        // sole parent.
        let tree_body = json!({
            "base_tree": head_commit.tree.sha,
            "tree": changes,
        });
        let tree: ObjectSha = self
            .client
            .post(
                format!("/repos/{}/{}/git/trees", repo.owner, repo.name),
                Some(&tree_body),
            )
            .await?;
        let commit_body = json!({
            "message": message,
            "tree": tree.sha,
            "parents": [head.commit.sha],
        });
        let commit: Commit = self
            .client
            .post(
                format!("/repos/{}/{}/git/commits", repo.owner, repo.name),
                Some(&commit_body),
            )
            .await?;
        info!(sha = %commit.sha, "created commit");

        // Fast-forward the branch ref. No compare-and-swap on the prior
        // sha: a concurrent push between the head read and this update is
        // lost.
        let _moved: GitRef = self
            .client
            .patch(
                format!("/repos/{}/{}/git/refs/heads/{}", repo.owner, repo.name, branch),
                Some(&json!({ "sha": commit.sha })),
            )
            .await?;
        info!(sha = %commit.sha, branch, "pushed commit");
        Ok(commit)
    }
}
