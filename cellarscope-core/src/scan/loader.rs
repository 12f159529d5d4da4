use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use cellarscope_model::ScanRecord;

use super::stats::ScanStats;
use crate::providers::{ProviderError, ScanSource};

/// Scans fetched per user, matching the history page the mobile app keeps.
pub const DEFAULT_PER_USER_LIMIT: usize = 100;

/// Collects recent scans across every user into one newest-first list.
#[derive(Clone)]
pub struct ScanLoader {
    source: Arc<dyn ScanSource>,
    per_user_limit: usize,
}

impl std::fmt::Debug for ScanLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanLoader")
            .field("per_user_limit", &self.per_user_limit)
            .finish_non_exhaustive()
    }
}

impl ScanLoader {
    pub fn new(source: Arc<dyn ScanSource>) -> Self {
        Self {
            source,
            per_user_limit: DEFAULT_PER_USER_LIMIT,
        }
    }

    pub fn with_per_user_limit(mut self, limit: usize) -> Self {
        self.per_user_limit = limit.max(1);
        self
    }

    /// Fetch every user's history one user at a time.
    ///
    /// Missing fields default relative to `now`. The first failed request
    /// aborts the whole load.
    pub async fn load(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScanRecord>, ProviderError> {
        let user_ids = self.source.list_user_ids().await?;
        let mut scans = Vec::new();

        for user_id in &user_ids {
            let documents = self
                .source
                .recent_scans(user_id, self.per_user_limit)
                .await
                .inspect_err(|err| {
                    warn!(user_id = %user_id, error = %err, "failed to fetch scan history");
                })?;

            scans.extend(documents.into_iter().map(|doc| {
                ScanRecord::from_raw(doc.id, user_id.clone(), doc.raw, now)
            }));
        }

        // Stable: equal timestamps keep per-user fetch order.
        scans.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        info!(users = user_ids.len(), scans = scans.len(), "loaded scans");
        Ok(scans)
    }

    pub async fn snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ScanSnapshot, ProviderError> {
        let scans = self.load(now).await?;
        Ok(ScanSnapshot::new(scans, now))
    }
}

/// Scans as of one load, with their headline statistics.
#[derive(Debug, Clone)]
pub struct ScanSnapshot {
    pub scans: Vec<ScanRecord>,
    pub stats: ScanStats,
    pub loaded_at: DateTime<Utc>,
}

impl ScanSnapshot {
    pub fn new(scans: Vec<ScanRecord>, loaded_at: DateTime<Utc>) -> Self {
        let stats = ScanStats::compute(&scans);
        Self {
            scans,
            stats,
            loaded_at,
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.loaded_at >= max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockScanSource, ScanDocument};
    use cellarscope_model::RawScanDocument;
    use chrono::TimeZone;

    fn doc(id: &str, minute: u32) -> ScanDocument {
        ScanDocument {
            id: id.to_string(),
            raw: RawScanDocument {
                timestamp: Some(
                    Utc.with_ymd_and_hms(2026, 3, 1, 10, minute, 0).unwrap(),
                ),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn merges_users_newest_first() {
        let mut source = MockScanSource::new();
        source
            .expect_list_user_ids()
            .returning(|| Ok(vec!["alice".into(), "bob".into()]));
        source
            .expect_recent_scans()
            .withf(|_, limit| *limit == DEFAULT_PER_USER_LIMIT)
            .returning(|user_id, _| match user_id {
                "alice" => Ok(vec![doc("a2", 30), doc("a1", 5)]),
                _ => Ok(vec![doc("b1", 20)]),
            });

        let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let scans = ScanLoader::new(Arc::new(source)).load(now).await.unwrap();

        let ids: Vec<&str> = scans.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "b1", "a1"]);
        assert_eq!(scans[1].user_id, "bob");
    }

    #[tokio::test]
    async fn missing_timestamp_defaults_to_now() {
        let mut source = MockScanSource::new();
        source
            .expect_list_user_ids()
            .returning(|| Ok(vec!["alice".into()]));
        source.expect_recent_scans().returning(|_, _| {
            Ok(vec![
                doc("old", 0),
                ScanDocument {
                    id: "undated".into(),
                    raw: RawScanDocument::default(),
                },
            ])
        });

        let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let scans = ScanLoader::new(Arc::new(source)).load(now).await.unwrap();
        assert_eq!(scans[0].id, "undated");
        assert_eq!(scans[0].timestamp, now);
    }

    #[tokio::test]
    async fn any_failure_aborts_the_load() {
        let mut source = MockScanSource::new();
        source
            .expect_list_user_ids()
            .returning(|| Ok(vec!["alice".into(), "bob".into()]));
        source.expect_recent_scans().returning(|user_id, _| {
            if user_id == "bob" {
                Err(ProviderError::RateLimited)
            } else {
                Ok(vec![doc("a1", 1)])
            }
        });

        let result = ScanLoader::new(Arc::new(source)).load(Utc::now()).await;
        assert!(matches!(result, Err(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn per_user_limit_is_forwarded() {
        let mut source = MockScanSource::new();
        source
            .expect_list_user_ids()
            .returning(|| Ok(vec!["alice".into()]));
        source
            .expect_recent_scans()
            .withf(|_, limit| *limit == 5)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let loader = ScanLoader::new(Arc::new(source)).with_per_user_limit(5);
        assert!(loader.load(Utc::now()).await.unwrap().is_empty());
    }

    #[test]
    fn snapshot_staleness() {
        let loaded = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let snapshot = ScanSnapshot::new(Vec::new(), loaded);
        assert!(!snapshot.is_stale(loaded + Duration::seconds(59), Duration::minutes(1)));
        assert!(snapshot.is_stale(loaded + Duration::minutes(1), Duration::minutes(1)));
    }
}
