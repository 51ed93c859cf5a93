use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_env_parsed, get_optional_env};
use service_core::error::AppError;
use std::time::Duration;

/// Inference calls can take minutes on CPU-only hosts.
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SOURCE_HOST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub inference: InferenceConfig,
    pub github: GitHubConfig,
    pub manifests: ManifestConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the Ollama-compatible server, without the `/api` suffix.
    pub url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: Secret<String>,
    /// `owner/name` of the GitOps repository.
    pub repo: String,
    pub base_branch: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// Directory inside the repository that receives generated manifests.
    pub path_prefix: String,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = core_config::is_production();

        Ok(GatewayConfig {
            common: common_config,
            inference: InferenceConfig {
                url: get_env("OLLAMA_URL", Some("http://192.168.1.94:11434"), is_prod)?,
                model: get_env("OLLAMA_MODEL", Some("qwen2.5-coder:7b"), is_prod)?,
                timeout: Duration::from_secs(get_env_parsed(
                    "INFERENCE_TIMEOUT_SECS",
                    DEFAULT_INFERENCE_TIMEOUT_SECS,
                    false,
                )?),
            },
            github: GitHubConfig {
                api_url: get_env("GITHUB_API_URL", Some("https://api.github.com"), false)?,
                token: Secret::new(get_env("GITHUB_TOKEN", Some(""), is_prod)?),
                repo: get_env("GITHUB_REPO", Some("mihai7785/homelab"), is_prod)?,
                base_branch: get_env("GITHUB_BRANCH_BASE", Some("main"), is_prod)?,
                timeout: Duration::from_secs(get_env_parsed(
                    "SOURCE_HOST_TIMEOUT_SECS",
                    DEFAULT_SOURCE_HOST_TIMEOUT_SECS,
                    false,
                )?),
            },
            manifests: ManifestConfig {
                path_prefix: get_env(
                    "MANIFEST_PATH_PREFIX",
                    Some("gitops/apps/ai-generated"),
                    is_prod,
                )?,
            },
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
        })
    }
}
