use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use cellarscope_model::WineEntry;

use super::loader::CatalogLoader;
use crate::providers::ProviderError;

/// Catalog entries as of one full load.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub wines: Vec<WineEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// In-process copy of the catalog, reloaded once older than `ttl`.
///
/// Concurrent callers that find the cache expired wait on the same reload.
#[derive(Debug)]
pub struct CatalogCache {
    loader: CatalogLoader,
    ttl: Duration,
    current: Mutex<Option<Arc<CatalogSnapshot>>>,
}

impl CatalogCache {
    pub fn new(loader: CatalogLoader, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            current: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, now: DateTime<Utc>) -> Result<Arc<CatalogSnapshot>, ProviderError> {
        let mut current = self.current.lock().await;
        if let Some(snapshot) = current.as_ref()
            && snapshot.is_fresh(now, self.ttl)
        {
            debug!(wines = snapshot.wines.len(), "catalog cache hit");
            return Ok(Arc::clone(snapshot));
        }

        let wines = self.loader.load_all().await?;
        let snapshot = Arc::new(CatalogSnapshot {
            wines,
            fetched_at: now,
        });
        info!(wines = snapshot.wines.len(), "catalog cache refreshed");
        *current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The cached snapshot regardless of age, without fetching.
    pub async fn peek(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current.lock().await.clone()
    }

    pub async fn invalidate(&self) {
        if self.current.lock().await.take().is_some() {
            debug!("catalog cache invalidated");
        }
    }

    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<CatalogSnapshot>, ProviderError> {
        self.invalidate().await;
        self.get(now).await
    }
}
