//! Repository content operations: fetch, read, traverse, write.

use std::collections::VecDeque;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use tracing::{debug, info};

use super::DEFAULT_BRANCH;
use super::client::GitHubClient;
use super::error::{self, GitHubError, Result};
use super::models::{ContentEntry, ContentKind, Contents, FileCommit, RepoHandle};

/// Payload for a create-or-update file write.
#[derive(Debug, Clone)]
pub struct FileWrite {
    pub path: String,
    pub message: String,
    pub content: Vec<u8>,
    /// Target branch; `main` when absent.
    pub branch: Option<String>,
}

/// Trait for content operations.
#[async_trait::async_trait]
pub trait ContentClient: Send + Sync {
    /// Fetch the content at `path` for a ref (branch name or commit sha,
    /// `main` when absent). Returns `None` when the path does not exist;
    /// every other failure propagates.
    async fn get_contents(
        &self,
        repo: &RepoHandle,
        path: &str,
        ref_: Option<&str>,
    ) -> Result<Option<Contents>>;

    /// Decode the raw bytes of a file entry.
    ///
    /// The entry must be a file; anything else is a contract error and no
    /// network call is made. Entries fetched directly carry their content
    /// inline; entries discovered via a directory listing are read through
    /// their backing blob.
    async fn read_content(&self, repo: &RepoHandle, entry: &ContentEntry) -> Result<Vec<u8>>;

    /// Fetch and decode a single file, collapsing a possible listing to its
    /// first entry. An absent path is `ContentNotFound`.
    async fn get_file_content(
        &self,
        repo: &RepoHandle,
        path: &str,
        ref_: Option<&str>,
    ) -> Result<Vec<u8>>;

    /// Create `path` on `branch`, or update it in place when it already has
    /// content. The create is attempted unconditionally; a 422 rejection
    /// naming the missing `sha` parameter triggers a re-fetch of the current
    /// sha and an update carrying it. Callers never need to know in advance
    /// whether the file exists.
    async fn update_file(&self, repo: &RepoHandle, write: FileWrite) -> Result<FileCommit>;
}

#[async_trait::async_trait]
impl ContentClient for GitHubClient {
    async fn get_contents(
        &self,
        repo: &RepoHandle,
        path: &str,
        ref_: Option<&str>,
    ) -> Result<Option<Contents>> {
        let ref_ = ref_.unwrap_or(DEFAULT_BRANCH);
        let route = format!(
            "/repos/{}/{}/contents/{}",
            repo.owner,
            repo.name,
            path.trim_end_matches('/')
        );
        let response: std::result::Result<Contents, octocrab::Error> =
            self.client.get(route, Some(&RefParam { r#ref: ref_ })).await;
        match response {
            Ok(contents) => Ok(Some(contents)),
            Err(err) => match &err {
                octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
                    info!(path, ref_, "path does not exist");
                    Ok(None)
                }
                _ => Err(err.into()),
            },
        }
    }

    async fn read_content(&self, repo: &RepoHandle, entry: &ContentEntry) -> Result<Vec<u8>> {
        if entry.kind != ContentKind::File {
            return Err(GitHubError::NotAFile {
                path: entry.path.clone(),
                kind: entry.kind,
            });
        }

        if let Some(content) = &entry.content {
            return decode_base64(content);
        }

        // Listing entries carry no inline content; go through the blob.
        debug!(path = %entry.path, sha = %entry.sha, "fetching blob");
        let blob: BlobData = self
            .client
            .get(
                format!("/repos/{}/{}/git/blobs/{}", repo.owner, repo.name, entry.sha),
                None::<&()>,
            )
            .await?;
        if blob.encoding == "base64" {
            decode_base64(&blob.content)
        } else {
            Ok(blob.content.into_bytes())
        }
    }

    async fn get_file_content(
        &self,
        repo: &RepoHandle,
        path: &str,
        ref_: Option<&str>,
    ) -> Result<Vec<u8>> {
        let entry = self
            .get_contents(repo, path, ref_)
            .await?
            .and_then(Contents::into_single)
            .ok_or_else(|| GitHubError::ContentNotFound {
                path: path.to_string(),
            })?;
        self.read_content(repo, &entry).await
    }

    async fn update_file(&self, repo: &RepoHandle, write: FileWrite) -> Result<FileCommit> {
        let branch = write.branch.as_deref().unwrap_or(DEFAULT_BRANCH);
        let route = format!(
            "/repos/{}/{}/contents/{}",
            repo.owner, repo.name, write.path
        );
        let encoded = STANDARD.encode(&write.content);
        let body = json!({
            "message": write.message,
            "content": encoded,
            "branch": branch,
        });

        let attempt: std::result::Result<FileCommit, octocrab::Error> =
            self.client.put(&route, Some(&body)).await;
        match attempt {
            Ok(response) => {
                info!(path = %write.path, branch, "created file");
                Ok(response)
            }
            Err(err) => {
                let rejected = error::rejected_422(err)?;
                if !error::already_exists(&rejected.message_payload(), "\"sha\" wasn't supplied") {
                    return Err(rejected.into_error());
                }

                // The path already has content: re-fetch its sha and update.
                let existing = self
                    .get_contents(repo, &write.path, Some(branch))
                    .await?
                    .and_then(Contents::into_single)
                    .ok_or_else(|| GitHubError::ContentNotFound {
                        path: write.path.clone(),
                    })?;
                let body = json!({
                    "message": write.message,
                    "content": encoded,
                    "branch": branch,
                    "sha": existing.sha,
                });
                let response: FileCommit = self.client.put(&route, Some(&body)).await?;
                info!(path = %write.path, branch, "updated existing file");
                Ok(response)
            }
        }
    }
}

impl GitHubClient {
    /// Lazily enumerate the file entries reachable under `path` at a ref.
    ///
    /// No network call happens until the first `next`.
    pub fn walk_files<'a>(
        &'a self,
        repo: &'a RepoHandle,
        path: &str,
        ref_: Option<&str>,
    ) -> ContentWalk<'a> {
        ContentWalk {
            client: self,
            repo,
            ref_: ref_.unwrap_or(DEFAULT_BRANCH).to_string(),
            root: Some(path.to_string()),
            stack: Vec::new(),
        }
    }
}

#[derive(serde::Serialize)]
struct RefParam<'a> {
    r#ref: &'a str,
}

#[derive(serde::Deserialize)]
struct BlobData {
    content: String,
    encoding: String,
}

/// Decode base64 content, tolerating the line wrapping the API inserts.
fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// Depth-first traversal over the files under a root path.
///
/// Directories are fetched one listing at a time as the traversal reaches
/// them and are never yielded themselves; the whole tree is never buffered.
/// The sequence is finite and not restartable after exhaustion.
pub struct ContentWalk<'a> {
    client: &'a GitHubClient,
    repo: &'a RepoHandle,
    ref_: String,
    root: Option<String>,
    stack: Vec<VecDeque<ContentEntry>>,
}

impl ContentWalk<'_> {
    /// Advance to the next file entry, fetching directory listings on
    /// demand. Returns `None` once the tree is exhausted (an absent root
    /// exhausts immediately).
    pub async fn next(&mut self) -> Result<Option<ContentEntry>> {
        if let Some(root) = self.root.take() {
            match self
                .client
                .get_contents(self.repo, &root, Some(&self.ref_))
                .await?
            {
                None => return Ok(None),
                Some(Contents::File(entry)) => return Ok(Some(*entry)),
                Some(Contents::Dir(entries)) => self.stack.push(entries.into()),
            }
        }

        loop {
            let entry = match self.stack.last_mut() {
                None => return Ok(None),
                Some(top) => match top.pop_front() {
                    Some(entry) => entry,
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
            };

            if entry.kind != ContentKind::Dir {
                return Ok(Some(entry));
            }

            match self
                .client
                .get_contents(self.repo, &entry.path, Some(&self.ref_))
                .await?
            {
                Some(Contents::Dir(entries)) => self.stack.push(entries.into()),
                Some(Contents::File(file)) => return Ok(Some(*file)),
                // A directory that vanished between listing and fetch.
                None => continue,
            }
        }
    }
}
