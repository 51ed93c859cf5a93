//! GitOps publishing: turn a manifest into an open pull request.
//!
//! Publishing walks a fixed sequence of states:
//!
//! ```text
//! Start -> RefResolved -> BranchCreated -> FileCommitted -> PrCreated
//! ```
//!
//! Each transition is one call to the source host. A failed call aborts the
//! walk and surfaces the upstream error. Nothing already created is rolled
//! back, so a failure after `BranchCreated` leaves a dangling branch.

use crate::services::error::GatewayError;
use crate::services::metrics::MetricsRecorder;
use crate::services::naming;
use crate::services::source_host::{FileCommit, PullRequestDraft, SourceHostClient};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

/// Where a publish currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    Start,
    RefResolved { base_sha: String },
    BranchCreated,
    FileCommitted,
    PrCreated { pr_url: String },
}

impl PublishState {
    pub fn name(&self) -> &'static str {
        match self {
            PublishState::Start => "start",
            PublishState::RefResolved { .. } => "ref_resolved",
            PublishState::BranchCreated => "branch_created",
            PublishState::FileCommitted => "file_committed",
            PublishState::PrCreated { .. } => "pr_created",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub pr_url: String,
    pub branch_name: String,
    pub file_path: String,
}

pub struct GitOpsPublisher {
    client: Arc<dyn SourceHostClient>,
    base_branch: String,
    /// Model named in the pull request body.
    model: String,
    metrics: Arc<dyn MetricsRecorder>,
}

pub fn commit_message(app_name: &str) -> String {
    format!("feat(ai-generated): add manifest for {}", app_name)
}

pub fn pull_request_title(app_name: &str) -> String {
    format!("[AI Gateway] Deploy {}", app_name)
}

pub fn pull_request_body(prompt: &str, model: &str, generated_at: &str) -> String {
    format!(
        "## AI Generated Manifest\n\n\
         **Original request:** {}\n\n\
         **Model:** {}\n\n\
         **Generated at:** {}\n\n\
         > Review the generated manifest carefully before merging.",
        prompt, model, generated_at
    )
}

impl GitOpsPublisher {
    pub fn new(
        client: Arc<dyn SourceHostClient>,
        base_branch: impl Into<String>,
        model: impl Into<String>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            client,
            base_branch: base_branch.into(),
            model: model.into(),
            metrics,
        }
    }

    #[tracing::instrument(skip(self, manifest, prompt), fields(base = %self.base_branch))]
    pub async fn publish(
        &self,
        manifest: &str,
        file_path: &str,
        app_name: &str,
        prompt: &str,
    ) -> Result<PublishResult, GatewayError> {
        let branch = naming::branch_name(app_name);
        let mut state = PublishState::Start;

        loop {
            let completed = state.name();
            state = match self
                .advance(state, &branch, manifest, file_path, app_name, prompt)
                .await
            {
                Ok(PublishState::PrCreated { pr_url }) => {
                    self.metrics.record_pull_request("created");
                    tracing::info!(branch = %branch, pr_url = %pr_url, "Pull request created");
                    return Ok(PublishResult {
                        pr_url,
                        branch_name: branch,
                        file_path: file_path.to_string(),
                    });
                }
                Ok(next) => {
                    tracing::debug!(branch = %branch, step = next.name(), "Publish step done");
                    next
                }
                Err(e) => {
                    tracing::error!(
                        branch = %branch,
                        last_completed = completed,
                        error = %e,
                        "Publish aborted"
                    );
                    return Err(e);
                }
            };
        }
    }

    /// Perform the single call that moves `state` forward.
    async fn advance(
        &self,
        state: PublishState,
        branch: &str,
        manifest: &str,
        file_path: &str,
        app_name: &str,
        prompt: &str,
    ) -> Result<PublishState, GatewayError> {
        match state {
            PublishState::Start => {
                let base_sha = self.client.resolve_ref(&self.base_branch).await?;
                Ok(PublishState::RefResolved { base_sha })
            }
            PublishState::RefResolved { base_sha } => {
                self.client.create_branch(branch, &base_sha).await?;
                Ok(PublishState::BranchCreated)
            }
            PublishState::BranchCreated => {
                let commit = FileCommit {
                    path: file_path.to_string(),
                    branch: branch.to_string(),
                    message: commit_message(app_name),
                    content: manifest.to_string(),
                };
                self.client.put_file(&commit).await?;
                Ok(PublishState::FileCommitted)
            }
            PublishState::FileCommitted => {
                let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
                let draft = PullRequestDraft {
                    title: pull_request_title(app_name),
                    body: pull_request_body(prompt, &self.model, &generated_at),
                    head: branch.to_string(),
                    base: self.base_branch.clone(),
                };
                let pr_url = self.client.open_pull_request(&draft).await?;
                Ok(PublishState::PrCreated { pr_url })
            }
            done @ PublishState::PrCreated { .. } => Ok(done),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::services::error::Upstream;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        ResolveRef(String),
        CreateBranch { branch: String, sha: String },
        PutFile(FileCommit),
        OpenPullRequest(PullRequestDraft),
    }

    /// In-memory source host that records calls and can fail on a chosen step.
    #[derive(Default)]
    pub struct FakeSourceHost {
        pub calls: Mutex<Vec<Call>>,
        fail_on: Option<&'static str>,
    }

    impl FakeSourceHost {
        pub fn failing_on(step: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(step),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, step: &'static str, call: Call) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(step) {
                return Err(GatewayError::UpstreamRejected {
                    upstream: Upstream::SourceHost,
                    status: 422,
                    message: format!("{} refused", step),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SourceHostClient for FakeSourceHost {
        async fn resolve_ref(&self, branch: &str) -> Result<String, GatewayError> {
            self.record("resolve_ref", Call::ResolveRef(branch.to_string()))?;
            Ok("base-sha-1".to_string())
        }

        async fn create_branch(&self, branch: &str, sha: &str) -> Result<(), GatewayError> {
            self.record(
                "create_branch",
                Call::CreateBranch {
                    branch: branch.to_string(),
                    sha: sha.to_string(),
                },
            )
        }

        async fn put_file(&self, commit: &FileCommit) -> Result<(), GatewayError> {
            self.record("put_file", Call::PutFile(commit.clone()))
        }

        async fn open_pull_request(
            &self,
            draft: &PullRequestDraft,
        ) -> Result<String, GatewayError> {
            self.record("open_pull_request", Call::OpenPullRequest(draft.clone()))?;
            Ok("https://github.com/acme/homelab/pull/1".to_string())
        }
    }
}
