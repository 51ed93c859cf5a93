#![allow(dead_code)]

use ai_gateway::config::{GatewayConfig, GitHubConfig, InferenceConfig, ManifestConfig};
use ai_gateway::Application;
use secrecy::Secret;
use serde_json::json;
use service_core::config::Config;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_REPO: &str = "acme/homelab";
pub const TEST_MODEL: &str = "qwen2.5-coder:7b";
pub const TEST_TOKEN: &str = "test-token";
pub const TEST_PREFIX: &str = "gitops/apps/ai-generated";
pub const BASE_SHA: &str = "0123456789abcdef0123456789abcdef01234567";
pub const PR_URL: &str = "https://github.com/acme/homelab/pull/42";

/// Gateway settings pointing at the given fake upstreams, bound to a random port.
pub fn test_config(ollama_url: &str, github_url: &str) -> GatewayConfig {
    GatewayConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        inference: InferenceConfig {
            url: ollama_url.to_string(),
            model: TEST_MODEL.to_string(),
            timeout: Duration::from_secs(5),
        },
        github: GitHubConfig {
            api_url: github_url.to_string(),
            token: Secret::new(TEST_TOKEN.to_string()),
            repo: TEST_REPO.to_string(),
            base_branch: "main".to_string(),
            timeout: Duration::from_secs(5),
        },
        manifests: ManifestConfig {
            path_prefix: TEST_PREFIX.to_string(),
        },
        otlp_endpoint: None,
    }
}

pub struct TestApp {
    pub address: String,
    pub ollama: MockServer,
    pub github: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut GatewayConfig)) -> Self {
        let ollama = MockServer::start().await;
        let github = MockServer::start().await;

        let mut config = test_config(&ollama.uri(), &github.uri());
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            ollama,
            github,
            client,
        }
    }

    pub async fn post_manifest(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate/manifest", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, route: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, route))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn mock_ollama_reply(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": TEST_MODEL,
                "response": text,
                "done": true
            })))
            .mount(&self.ollama)
            .await;
    }

    /// Happy-path responses for all four GitHub calls.
    pub async fn mock_github_success(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/git/ref/heads/main", TEST_REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": { "sha": BASE_SHA, "type": "commit" }
            })))
            .mount(&self.github)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/repos/{}/git/refs", TEST_REPO)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&self.github)
            .await;

        Mock::given(method("PUT"))
            .and(wiremock::matchers::path_regex(format!(
                "^/repos/{}/contents/.+$",
                TEST_REPO
            )))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&self.github)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/repos/{}/pulls", TEST_REPO)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 42,
                "html_url": PR_URL
            })))
            .mount(&self.github)
            .await;
    }

    /// (method, path) of every call GitHub received, in order.
    pub async fn github_calls(&self) -> Vec<(String, String)> {
        self.github
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect()
    }

    pub async fn github_bodies(&self) -> Vec<serde_json::Value> {
        self.github
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap_or(serde_json::Value::Null))
            .collect()
    }
}
