use crate::services::GenerationOutcome;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateManifestRequest {
    /// Forwarded to the model as-is.
    pub prompt: String,
    /// Becomes part of the branch name and the manifest file name.
    #[validate(custom(function = "validate_app_name"))]
    pub app_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateManifestResponse {
    pub pr_url: String,
    pub branch: String,
    pub manifest: String,
    pub app_name: String,
}

impl From<GenerationOutcome> for GenerateManifestResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            pr_url: outcome.publish.pr_url,
            branch: outcome.publish.branch_name,
            manifest: outcome.manifest,
            app_name: outcome.app_name,
        }
    }
}

/// Longest name that still leaves room for `.yaml` in a 255-byte file name.
const MAX_APP_NAME_LEN: usize = 250;

/// Characters git refuses in ref names, plus the path separators.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '~', '^', ':', '?', '*', '['];

/// The name must be usable both as a file name and inside a git ref.
/// Anything else is accepted. Blank means "generate one for me".
fn validate_app_name(app_name: &str) -> Result<(), ValidationError> {
    let name = app_name.trim();
    if name.is_empty() {
        return Ok(());
    }

    let bad_char = name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(&c));
    let unsafe_sequence = name.contains("..") || name.contains("@{");
    let bad_edges = name.starts_with('.') || name.ends_with('.') || name.ends_with(".lock");

    if bad_char || unsafe_sequence || bad_edges || name.len() > MAX_APP_NAME_LEN {
        let mut err = ValidationError::new("app_name");
        err.message = Some(
            "App name must be a single path segment that is also valid in a git branch name"
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, app_name: Option<&str>) -> GenerateManifestRequest {
        GenerateManifestRequest {
            prompt: prompt.to_string(),
            app_name: app_name.map(str::to_string),
        }
    }

    #[test]
    fn accepts_any_ref_safe_app_name() {
        for good in ["web", "my-app-2", "Web", "web.v2", "my_app", "-web", "app@1"] {
            assert!(
                request("deploy nginx", Some(good)).validate().is_ok(),
                "{} should be accepted",
                good
            );
        }
        assert!(request("deploy nginx", None).validate().is_ok());
        assert!(request("deploy nginx", Some("")).validate().is_ok());
        assert!(request("deploy nginx", Some("  ")).validate().is_ok());
    }

    #[test]
    fn rejects_path_and_ref_breaking_app_names() {
        for bad in [
            "../etc", "web/", "a/b", "a\\b", "a b", "tab\there", "nul\0", "a..b", ".hidden",
            "web.", "web.lock", "a~1", "a^", "a:b", "a?", "a*", "a[0]", "a@{1}",
        ] {
            let errors = request("deploy nginx", Some(bad)).validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key("app_name"),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(request("x", Some("a".repeat(251).as_str())).validate().is_err());
        assert!(request("x", Some("a".repeat(250).as_str())).validate().is_ok());
    }

    #[test]
    fn empty_prompt_is_forwarded() {
        assert!(request("", Some("web")).validate().is_ok());
    }

    #[test]
    fn request_app_name_is_optional_in_json() {
        let parsed: GenerateManifestRequest =
            serde_json::from_str(r#"{"prompt": "deploy nginx"}"#).unwrap();
        assert_eq!(parsed.prompt, "deploy nginx");
        assert!(parsed.app_name.is_none());
    }
}
