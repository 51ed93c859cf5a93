//! GitHub REST client for the four calls the publisher makes.

use super::{FileCommit, PullRequestDraft, SourceHostClient};
use crate::config::GitHubConfig;
use crate::services::error::{GatewayError, Upstream};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ACCEPT: &str = "application/vnd.github.v3+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "ai-gateway";

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    repo: String,
    token: Secret<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    html_url: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repo: config.repo.clone(),
            token: config.token.clone(),
            timeout: config.timeout,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repo, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.repo_url(path))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", self.token.expose_secret()),
            )
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(Upstream::SourceHost, self.timeout, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, body = %body, "GitHub request failed");
        Err(GatewayError::from_status(Upstream::SourceHost, status, body))
    }

    async fn parse<T: DeserializeOwned>(&self, response: Response) -> Result<T, GatewayError> {
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::UpstreamTimeout {
                    upstream: Upstream::SourceHost,
                    timeout: self.timeout,
                }
            } else {
                GatewayError::malformed(Upstream::SourceHost, e)
            }
        })
    }
}

#[async_trait]
impl SourceHostClient for GitHubClient {
    async fn resolve_ref(&self, branch: &str) -> Result<String, GatewayError> {
        let response = self
            .send(self.request(Method::GET, &format!("git/ref/heads/{}", branch)))
            .await?;
        let git_ref: GitRef = self.parse(response).await?;
        Ok(git_ref.object.sha)
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<(), GatewayError> {
        let body = CreateRefRequest {
            reference: format!("refs/heads/{}", branch),
            sha,
        };
        self.send(self.request(Method::POST, "git/refs").json(&body))
            .await?;
        Ok(())
    }

    async fn put_file(&self, commit: &FileCommit) -> Result<(), GatewayError> {
        let body = PutContentsRequest {
            message: &commit.message,
            content: BASE64.encode(commit.content.as_bytes()),
            branch: &commit.branch,
        };
        self.send(
            self.request(Method::PUT, &format!("contents/{}", commit.path))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> Result<String, GatewayError> {
        let body = CreatePullRequest {
            title: &draft.title,
            body: &draft.body,
            head: &draft.head,
            base: &draft.base,
        };
        let response = self
            .send(self.request(Method::POST, "pulls").json(&body))
            .await?;
        let pr: PullRequest = self.parse(response).await?;
        Ok(pr.html_url)
    }
}
