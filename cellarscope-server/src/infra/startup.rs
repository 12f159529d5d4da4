use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::infra::app_state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[async_trait]
pub trait StartupHooks: Send + Sync {
    async fn run(&self, state: &AppState) -> Result<()>;
}

/// Warms the scan snapshot and starts the periodic session sweep.
#[derive(Debug, Default)]
pub struct ProdStartupHooks;

#[async_trait]
impl StartupHooks for ProdStartupHooks {
    async fn run(&self, state: &AppState) -> Result<()> {
        match state.scans.current(chrono::Utc::now()).await {
            Ok(snapshot) => debug!(scans = snapshot.scans.len(), "scan snapshot warmed"),
            Err(err) => warn!(error = %err, "initial scan load failed; retrying on first request"),
        }

        let cleanup_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                cleanup_state.cleanup_expired_sessions().await;
            }
        });

        Ok(())
    }
}
