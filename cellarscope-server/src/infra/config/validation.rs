use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

use super::models::Config;

/// Largest offset chrono accepts, in minutes.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Upper bound for every lifetime setting.
pub const MAX_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("firestore.project_id is required")]
    MissingProjectId,
    #[error("{field} must not be empty")]
    EmptyCredential { field: &'static str },
    #[error("display.utc_offset_minutes {minutes} is out of range")]
    InvalidOffset { minutes: i32 },
    #[error("CORS wildcard origins cannot be combined with session cookies")]
    DangerousCorsWildcard,
    #[error("invalid CORS origin '{origin}'")]
    InvalidCorsOrigin { origin: String },
    #[error("{field} must not exceed {} days", MAX_TTL.as_secs() / 86_400)]
    TtlTooLong { field: &'static str },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.firestore.project_id.trim().is_empty() {
        return Err(ConfigGuardRailError::MissingProjectId);
    }
    if config.auth.username.trim().is_empty() {
        return Err(ConfigGuardRailError::EmptyCredential {
            field: "auth.username",
        });
    }
    if config.auth.password.is_empty() {
        return Err(ConfigGuardRailError::EmptyCredential {
            field: "auth.password",
        });
    }

    for (field, ttl) in [
        ("auth.session_ttl", config.auth.session_ttl),
        ("firestore.snapshot_ttl", config.firestore.snapshot_ttl),
        ("catalog.cache_ttl", config.catalog.cache_ttl),
        ("catalog.stale_after", config.catalog.stale_after),
    ] {
        if ttl > MAX_TTL {
            return Err(ConfigGuardRailError::TtlTooLong { field });
        }
    }

    let minutes = config.display.utc_offset_minutes;
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
        return Err(ConfigGuardRailError::InvalidOffset { minutes });
    }

    if config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }
    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            return Err(ConfigGuardRailError::InvalidCorsOrigin {
                origin: origin.clone(),
            });
        }
    }

    if config.auth.uses_default_credentials() {
        warnings.push_with_hint(
            "Dashboard login uses the default admin/admin credentials",
            "Set ADMIN_USERNAME and ADMIN_PASSWORD or the [auth] section",
        );
    }

    if config.firestore.api_key.is_none() && config.firestore.bearer_token.is_none() {
        warnings.push_with_hint(
            "No document store credentials configured; reads rely on open security rules",
            "Set FIRESTORE_API_KEY or FIRESTORE_BEARER_TOKEN",
        );
    }

    if !config.catalog.is_enabled() {
        warnings.push_with_hint(
            "Catalog API not configured; catalog routes will answer 503",
            "Set CATALOG_API_URL or catalog.base_url to enable the catalog view",
        );
    }

    Ok(warnings)
}
