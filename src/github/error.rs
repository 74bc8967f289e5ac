//! GitHub API error types and the idempotency classifier.

use thiserror::Error;

use super::models::ContentKind;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("{}", format_octocrab_error(.0))]
    ApiError(#[from] octocrab::Error),

    #[error("content at '{path}' must be a file to be read, not '{kind}'")]
    NotAFile { path: String, kind: ContentKind },

    #[error("no content found at '{path}'")]
    ContentNotFound { path: String },

    #[error("no branch or tag named '{0}'")]
    RefNotFound(String),

    #[error("repository name must be 'owner/name', got '{0}'")]
    InvalidRepoName(String),

    #[error("pull request for '{head}' reported as existing but not found")]
    MissingPullRequest { head: String },

    #[error("failed to decode base64 content: {0}")]
    Decode(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Format octocrab::Error to extract detailed error information from GitHub API responses.
fn format_octocrab_error(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let mut msg = format!(
                "GitHub API error: {} (HTTP {})",
                source.message,
                source.status_code.as_u16()
            );

            if let Some(errors) = &source.errors {
                let details: Vec<String> = errors
                    .iter()
                    .filter_map(|e| {
                        e.get("message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                            .or_else(|| e.as_str().map(str::to_string))
                    })
                    .collect();
                if !details.is_empty() {
                    msg.push_str(&format!(" [{}]", details.join(", ")));
                }
            }

            msg
        }
        // For other error types, use the default Display implementation
        _ => format!("GitHub API error: {err}"),
    }
}

/// An HTTP 422 rejection with its parsed body, split off from every other
/// failure. Keeps the original error around so an unrecognized rejection can
/// be re-raised unchanged.
pub(crate) struct Rejected {
    pub(crate) message: String,
    pub(crate) errors: Vec<serde_json::Value>,
    source: octocrab::Error,
}

impl Rejected {
    /// The top-level message, in the shape the classifier takes.
    pub(crate) fn message_payload(&self) -> serde_json::Value {
        serde_json::Value::String(self.message.clone())
    }

    /// The error-detail list, in the shape the classifier takes.
    pub(crate) fn errors_payload(&self) -> serde_json::Value {
        serde_json::Value::Array(self.errors.clone())
    }

    /// Give the original error back for the caller to raise.
    pub(crate) fn into_error(self) -> GitHubError {
        self.source.into()
    }
}

/// Split an API failure into the one retryable shape (HTTP 422 with a parsed
/// GitHub body) and everything else, which is fatal as-is.
pub(crate) fn rejected_422(err: octocrab::Error) -> Result<Rejected> {
    match &err {
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 422 => {
            Ok(Rejected {
                message: source.message.clone(),
                errors: source.errors.clone().unwrap_or_default(),
                source: err,
            })
        }
        _ => Err(err.into()),
    }
}

/// Decide whether a 422 payload is the precise "already exists" rejection.
///
/// The payload shape varies by endpoint: a bare string, a structured error
/// object, or a list of either. A list with anything but exactly one entry is
/// ambiguous and never matches; an object contributes its `message` field;
/// any other shape is unrecognized. The extracted message must contain
/// `pattern`, otherwise the caller re-raises the original error unchanged —
/// swallowing unrelated 422s would hide real failures.
pub(crate) fn already_exists(payload: &serde_json::Value, pattern: &str) -> bool {
    let err = match payload {
        serde_json::Value::Array(items) => match items.as_slice() {
            [only] => only,
            _ => return false,
        },
        other => other,
    };

    let message = match err {
        serde_json::Value::String(s) => Some(s.as_str()),
        serde_json::Value::Object(map) => map.get("message").and_then(|m| m.as_str()),
        _ => None,
    };

    message.is_some_and(|m| m.contains(pattern))
}
