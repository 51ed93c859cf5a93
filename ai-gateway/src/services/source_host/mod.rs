//! Source-hosting platform capability used by the publisher.

pub mod github;

use crate::services::error::GatewayError;
use async_trait::async_trait;

pub use github::GitHubClient;

/// Write (create or overwrite) one file on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    pub path: String,
    pub branch: String,
    pub message: String,
    /// Plain text; transport encoding is the client's job.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[async_trait]
pub trait SourceHostClient: Send + Sync {
    /// Commit hash at the tip of `branch`.
    async fn resolve_ref(&self, branch: &str) -> Result<String, GatewayError>;

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<(), GatewayError>;

    async fn put_file(&self, commit: &FileCommit) -> Result<(), GatewayError>;

    /// Returns the browser URL of the new pull request.
    async fn open_pull_request(&self, draft: &PullRequestDraft) -> Result<String, GatewayError>;
}
