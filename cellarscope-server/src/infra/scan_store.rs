use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use cellarscope_core::ProviderError;
use cellarscope_core::scan::{ScanLoader, ScanSnapshot};

/// The scan snapshot the dashboard serves, reloaded once older than `ttl`.
#[derive(Debug)]
pub struct ScanStore {
    loader: ScanLoader,
    ttl: Duration,
    current: Mutex<Option<Arc<ScanSnapshot>>>,
}

impl ScanStore {
    pub fn new(loader: ScanLoader, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            current: Mutex::new(None),
        }
    }

    pub async fn current(&self, now: DateTime<Utc>) -> Result<Arc<ScanSnapshot>, ProviderError> {
        let mut current = self.current.lock().await;
        if let Some(snapshot) = current.as_ref()
            && !snapshot.is_stale(now, self.ttl)
        {
            debug!(scans = snapshot.scans.len(), "serving cached scan snapshot");
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(self.loader.snapshot(now).await?);
        *current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the held snapshot and load a new one. A failed reload leaves
    /// nothing cached.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<ScanSnapshot>, ProviderError> {
        self.current.lock().await.take();
        self.current(now).await
    }
}
