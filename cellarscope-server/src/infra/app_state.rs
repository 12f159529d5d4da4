use std::{fmt, sync::Arc};

use chrono::{FixedOffset, Utc};

use cellarscope_core::catalog::{CatalogCache, CatalogLoader};
use cellarscope_core::providers::{
    CatalogApiConfig, CatalogApiProvider, FirestoreConfig, FirestoreScanSource,
};
use cellarscope_core::scan::ScanLoader;
use cellarscope_core::{CatalogSource, ProviderError, ScanSource};

use super::config::{Config, chrono_duration};
use super::scan_store::ScanStore;
use super::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scans: Arc<ScanStore>,
    /// Absent when no catalog API is configured.
    pub catalog: Option<Arc<CatalogCache>>,
    pub sessions: Arc<SessionStore>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("catalog_enabled", &self.catalog.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire state around already-built sources.
    pub fn new(
        config: Arc<Config>,
        scan_source: Arc<dyn ScanSource>,
        catalog_source: Option<Arc<dyn CatalogSource>>,
    ) -> Self {
        let loader = ScanLoader::new(scan_source)
            .with_per_user_limit(config.firestore.per_user_limit);
        let scans = ScanStore::new(loader, chrono_duration(config.firestore.snapshot_ttl));

        let catalog = catalog_source.map(|source| {
            let loader = CatalogLoader::new(source)
                .with_page_size(config.catalog.page_size)
                .with_max_pages(config.catalog.max_pages);
            Arc::new(CatalogCache::new(
                loader,
                chrono_duration(config.catalog.cache_ttl),
            ))
        });

        let sessions = SessionStore::new(chrono_duration(config.auth.session_ttl));

        Self {
            config,
            scans: Arc::new(scans),
            catalog,
            sessions: Arc::new(sessions),
        }
    }

    /// Build the remote clients described by `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ProviderError> {
        let settings = &config.firestore;
        let mut firestore = FirestoreConfig::new(settings.project_id.clone());
        firestore.base_url = settings.base_url.clone();
        firestore.database = settings.database.clone();
        firestore.api_key = settings.api_key.clone();
        firestore.bearer_token = settings.bearer_token.clone();
        firestore.timeout = settings.timeout;
        let scan_source: Arc<dyn ScanSource> = Arc::new(FirestoreScanSource::new(firestore)?);

        let catalog_source = match &config.catalog.base_url {
            Some(base_url) => {
                let mut api = CatalogApiConfig::new(base_url.clone());
                api.api_key = config.catalog.api_key.clone();
                api.timeout = config.catalog.timeout;
                let provider: Arc<dyn CatalogSource> = Arc::new(CatalogApiProvider::new(api)?);
                Some(provider)
            }
            None => None,
        };

        Ok(Self::new(config, scan_source, catalog_source))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display_offset(&self) -> FixedOffset {
        self.config.display.offset()
    }

    pub fn catalog_stale_after(&self) -> chrono::Duration {
        chrono_duration(self.config.catalog.stale_after)
    }

    pub async fn cleanup_expired_sessions(&self) -> usize {
        self.sessions.cleanup_expired(Utc::now()).await
    }
}
