use std::{path::PathBuf, time::Duration};

use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub firestore: FirestoreSettings,
    pub catalog: CatalogSettings,
    pub display: DisplayConfig,
    pub cors: CorsConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub session_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl AuthConfig {
    pub fn uses_default_credentials(&self) -> bool {
        self.username == DEFAULT_ADMIN_USERNAME
            && self.password == DEFAULT_ADMIN_PASSWORD
    }
}

#[derive(Clone)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub base_url: String,
    pub database: String,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
    pub per_user_limit: usize,
    /// How long a loaded scan snapshot is served before reloading.
    pub snapshot_ttl: Duration,
    pub timeout: Duration,
}

impl std::fmt::Debug for FirestoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreSettings")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("per_user_limit", &self.per_user_limit)
            .field("snapshot_ttl", &self.snapshot_ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct CatalogSettings {
    /// Catalog API root. The catalog view is disabled when unset.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub max_pages: u32,
    pub cache_ttl: Duration,
    /// Entries cached longer ago than this count as stale in cache stats.
    pub stale_after: Duration,
    pub timeout: Duration,
}

impl std::fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("cache_ttl", &self.cache_ttl)
            .field("stale_after", &self.stale_after)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CatalogSettings {
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayConfig {
    /// Offset used for date filtering and timestamp display.
    pub utc_offset_minutes: i32,
}

impl DisplayConfig {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

/// Convert a std duration into the chrono flavour used for time arithmetic.
pub fn chrono_duration(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}
