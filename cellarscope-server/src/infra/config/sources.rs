use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub firestore: FileFirestoreConfig,
    #[serde(default)]
    pub catalog: FileCatalogConfig,
    #[serde(default)]
    pub display: FileDisplayConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Human-readable duration, e.g. `"12h"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_ttl: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileFirestoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_user_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDisplayConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
///
/// Durations and numbers are kept as raw strings and parsed by the loader so
/// a typo is reported instead of silently ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub session_ttl: Option<String>,
    pub firestore_project_id: Option<String>,
    pub firestore_base_url: Option<String>,
    pub firestore_database: Option<String>,
    pub firestore_api_key: Option<String>,
    pub firestore_bearer_token: Option<String>,
    pub scan_per_user_limit: Option<String>,
    pub scan_snapshot_ttl: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_api_key: Option<String>,
    pub catalog_page_size: Option<String>,
    pub catalog_max_pages: Option<String>,
    pub catalog_cache_ttl: Option<String>,
    pub catalog_stale_after: Option<String>,
    pub display_utc_offset_minutes: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        EnvConfig {
            config_path: var("CELLARSCOPE_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT"),
            admin_username: var("ADMIN_USERNAME"),
            admin_password: var("ADMIN_PASSWORD"),
            session_ttl: var("SESSION_TTL"),
            firestore_project_id: var("FIRESTORE_PROJECT_ID"),
            firestore_base_url: var("FIRESTORE_BASE_URL"),
            firestore_database: var("FIRESTORE_DATABASE"),
            firestore_api_key: var("FIRESTORE_API_KEY"),
            firestore_bearer_token: var("FIRESTORE_BEARER_TOKEN"),
            scan_per_user_limit: var("SCAN_PER_USER_LIMIT"),
            scan_snapshot_ttl: var("SCAN_SNAPSHOT_TTL"),
            catalog_base_url: var("CATALOG_API_URL"),
            catalog_api_key: var("CATALOG_API_KEY"),
            catalog_page_size: var("CATALOG_PAGE_SIZE"),
            catalog_max_pages: var("CATALOG_MAX_PAGES"),
            catalog_cache_ttl: var("CATALOG_CACHE_TTL"),
            catalog_stale_after: var("CATALOG_STALE_AFTER"),
            display_utc_offset_minutes: var("DISPLAY_UTC_OFFSET_MINUTES"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS").map(|raw| parse_csv(&raw)),
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_treats_blank_as_unset_and_splits_lists() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "8080"),
            ("ADMIN_USERNAME", "  "),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("CATALOG_PAGE_SIZE", "many"),
        ]);
        let env = EnvConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(env.server_port.as_deref(), Some("8080"));
        assert_eq!(env.admin_username, None);
        assert_eq!(env.catalog_page_size.as_deref(), Some("many"));
        assert_eq!(
            env.cors_allowed_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }
}
