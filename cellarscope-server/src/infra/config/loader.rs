use once_cell::sync::Lazy;
use std::{fs, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

use cellarscope_core::catalog::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use cellarscope_core::providers::firestore::{DEFAULT_DATABASE, FIRESTORE_V1_BASE};
use cellarscope_core::scan::DEFAULT_PER_USER_LIMIT;

use super::{
    models::{
        AuthConfig, CatalogSettings, Config, ConfigMetadata, CorsConfig,
        DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DisplayConfig,
        FirestoreSettings, ServerConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("cellarscope.toml"),
        PathBuf::from("config/cellarscope.toml"),
    ]
});

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_CATALOG_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_CATALOG_STALE_AFTER: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Load `.env`, then the process environment, then the config file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolve against an already-gathered environment; no `.env` handling.
    pub fn load_with_env(&self, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) = compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = match (&self.options.config_path, &env.config_path) {
            (Some(path), _) | (None, Some(path)) => (path.clone(), true),
            (None, None) => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(path) => (path.clone(), false),
                None => return Ok((None, None)),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents = fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
            path: path.clone(),
            source: err,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if config_path.is_none() {
        warnings.push_with_hint(
            "No cellarscope.toml detected; using environment variables and defaults",
            "Create cellarscope.toml or pass --config to pin settings in a file",
        );
    }

    let FileConfig {
        server: file_server,
        auth: file_auth,
        firestore: file_firestore,
        catalog: file_catalog,
        display: file_display,
        cors: file_cors,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| "0.0.0.0".to_string()),
        port: numeric_setting("server.port", env.server_port)?
            .or(file_server.port)
            .unwrap_or(3000),
    };

    let auth = AuthConfig {
        username: env
            .admin_username
            .or(file_auth.username)
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
        password: env
            .admin_password
            .or(file_auth.password)
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        session_ttl: duration_setting(
            "auth.session_ttl",
            env.session_ttl.or(file_auth.session_ttl),
            DEFAULT_SESSION_TTL,
        )?,
    };

    let firestore = FirestoreSettings {
        project_id: env
            .firestore_project_id
            .or(file_firestore.project_id)
            .unwrap_or_default(),
        base_url: env
            .firestore_base_url
            .or(file_firestore.base_url)
            .unwrap_or_else(|| FIRESTORE_V1_BASE.to_string()),
        database: env
            .firestore_database
            .or(file_firestore.database)
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        api_key: env.firestore_api_key.or(file_firestore.api_key),
        bearer_token: env.firestore_bearer_token.or(file_firestore.bearer_token),
        per_user_limit: numeric_setting("firestore.per_user_limit", env.scan_per_user_limit)?
            .or(file_firestore.per_user_limit)
            .unwrap_or(DEFAULT_PER_USER_LIMIT)
            .max(1),
        snapshot_ttl: duration_setting(
            "firestore.snapshot_ttl",
            env.scan_snapshot_ttl.or(file_firestore.snapshot_ttl),
            DEFAULT_SNAPSHOT_TTL,
        )?,
        timeout: duration_setting(
            "firestore.timeout",
            file_firestore.timeout,
            DEFAULT_HTTP_TIMEOUT,
        )?,
    };

    let catalog = CatalogSettings {
        base_url: env.catalog_base_url.or(file_catalog.base_url),
        api_key: env.catalog_api_key.or(file_catalog.api_key),
        page_size: numeric_setting("catalog.page_size", env.catalog_page_size)?
            .or(file_catalog.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .max(1),
        max_pages: numeric_setting("catalog.max_pages", env.catalog_max_pages)?
            .or(file_catalog.max_pages)
            .unwrap_or(DEFAULT_MAX_PAGES)
            .max(1),
        cache_ttl: duration_setting(
            "catalog.cache_ttl",
            env.catalog_cache_ttl.or(file_catalog.cache_ttl),
            DEFAULT_CATALOG_CACHE_TTL,
        )?,
        stale_after: duration_setting(
            "catalog.stale_after",
            env.catalog_stale_after.or(file_catalog.stale_after),
            DEFAULT_CATALOG_STALE_AFTER,
        )?,
        timeout: duration_setting(
            "catalog.timeout",
            file_catalog.timeout,
            DEFAULT_HTTP_TIMEOUT,
        )?,
    };

    let display = DisplayConfig {
        utc_offset_minutes: numeric_setting(
            "display.utc_offset_minutes",
            env.display_utc_offset_minutes,
        )?
        .or(file_display.utc_offset_minutes)
        .unwrap_or(0),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let config = Config {
        server,
        auth,
        firestore,
        catalog,
        display,
        cors,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);

    Ok((config, warnings))
}

fn duration_setting(
    field: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match raw {
        Some(value) => humantime::parse_duration(value.trim()).map_err(|source| {
            ConfigLoadError::InvalidDuration {
                field,
                value,
                source,
            }
        }),
        None => Ok(default),
    }
}

fn numeric_setting<T>(
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigLoadError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|source| ConfigLoadError::InvalidNumber {
                field,
                value,
                source,
            })
    })
    .transpose()
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration '{value}' for {field}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid number '{value}' for {field}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
