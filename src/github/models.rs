//! Wire models for the subset of the GitHub REST API this crate touches.
//!
//! These are deliberately minimal: each struct names only the fields the
//! operations read, and unknown response fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{GitHubError, Result};

/// A resolved repository, addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    pub owner: String,
    pub name: String,
}

impl RepoHandle {
    /// Split a canonical `owner/name` string into a handle.
    pub fn from_full_name(full_name: &str) -> Result<Self> {
        match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(GitHubError::InvalidRepoName(full_name.to_string())),
        }
    }
}

impl fmt::Display for RepoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The kind of a remote content entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentKind::File => "file",
            ContentKind::Dir => "dir",
            ContentKind::Symlink => "symlink",
            ContentKind::Submodule => "submodule",
        };
        f.write_str(s)
    }
}

/// A remote file or directory record addressed by repository + path + ref.
///
/// `content` and `encoding` are only populated when a file is fetched
/// directly; entries discovered through a directory listing carry neither and
/// must be read through their blob sha.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub size: Option<u64>,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

/// Result of a contents fetch: the API returns a single entry when the path
/// is a file and an ordered list when it is a directory — never both. The
/// ambiguity is resolved here, at the deserialization boundary, instead of
/// being re-checked at every call site.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Dir(Vec<ContentEntry>),
    File(Box<ContentEntry>),
}

impl Contents {
    /// Collapse either shape to a single entry: the file itself, or the
    /// first entry of a directory listing.
    pub fn into_single(self) -> Option<ContentEntry> {
        match self {
            Contents::File(entry) => Some(*entry),
            Contents::Dir(entries) => entries.into_iter().next(),
        }
    }
}

/// Pointer to a commit, as embedded in branch and tag listings.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitPointer {
    pub sha: String,
}

/// A branch and the commit it currently points at.
#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: CommitPointer,
}

/// A tag and the commit it points at.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: CommitPointer,
}

/// A git reference (`refs/heads/...`) and the object it resolves to.
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub full_ref: String,
    pub object: ObjectSha,
}

/// Minimal response carrying only an object sha.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSha {
    pub sha: String,
}

/// A commit object and the tree it snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub tree: ObjectSha,
}

/// One staged file change: an uploaded blob waiting to be layered into a
/// tree. Serializes directly as a tree-creation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedChange {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl StagedChange {
    /// A regular-file blob entry for `path`.
    pub fn blob(path: &str, sha: String) -> Self {
        Self {
            path: path.to_string(),
            mode: "100644".to_string(),
            kind: "blob".to_string(),
            sha,
        }
    }
}

/// Response of a contents write: the written entry plus the commit that
/// recorded it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommit {
    pub content: Option<ContentEntry>,
    pub commit: ObjectSha,
}

/// One side of a pull request (head or base).
#[derive(Debug, Clone, Deserialize)]
pub struct PrRef {
    #[serde(rename = "ref")]
    pub name: String,
}

/// A pull request as returned by create and list calls.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub html_url: Option<String>,
    pub state: String,
    pub head: PrRef,
    pub base: PrRef,
}
