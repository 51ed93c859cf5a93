//! Naming of apps, branches and manifest files.

use uuid::Uuid;

pub const BRANCH_PREFIX: &str = "ai-gateway";

/// Six lowercase hex characters, fresh per call.
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Name used when the caller did not pick one.
pub fn default_app_name() -> String {
    format!("ai-app-{}", random_suffix())
}

/// Treat a missing or blank `app_name` the same way.
pub fn resolve_app_name(requested: Option<String>) -> String {
    requested
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(default_app_name)
}

/// Unique per call even for a repeated `app_name`.
pub fn branch_name(app_name: &str) -> String {
    format!("{}/{}-{}", BRANCH_PREFIX, app_name, random_suffix())
}

/// Deterministic for a given prefix and app.
pub fn manifest_path(prefix: &str, app_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{}.yaml", app_name)
    } else {
        format!("{}/{}.yaml", prefix, app_name)
    }
}
