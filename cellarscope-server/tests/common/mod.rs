// Used across several test binaries; not every helper is used by each.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use cellarscope_core::api_routes::v1;
use cellarscope_core::model::{CatalogPage, RawScanDocument, WineEntry, WineType};
use cellarscope_core::{CatalogSource, ProviderError, ScanDocument, ScanSource};
use cellarscope_server::{
    AppState, create_app,
    infra::config::{
        AuthConfig, CatalogSettings, Config, ConfigMetadata, CorsConfig, DisplayConfig,
        FirestoreSettings, ServerConfig,
    },
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

pub const USERNAME: &str = "curator";
pub const PASSWORD: &str = "decant-slowly";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        auth: AuthConfig {
            username: USERNAME.into(),
            password: PASSWORD.into(),
            session_ttl: Duration::from_secs(3600),
        },
        firestore: FirestoreSettings {
            project_id: "demo".into(),
            base_url: "http://127.0.0.1:9/v1".into(),
            database: "(default)".into(),
            api_key: None,
            bearer_token: None,
            per_user_limit: 100,
            snapshot_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(5),
        },
        catalog: CatalogSettings {
            base_url: Some("http://127.0.0.1:9".into()),
            api_key: None,
            page_size: 2,
            max_pages: 10,
            cache_ttl: Duration::from_secs(3600),
            stale_after: Duration::from_secs(7 * 24 * 3600),
            timeout: Duration::from_secs(5),
        },
        display: DisplayConfig {
            utc_offset_minutes: 0,
        },
        cors: CorsConfig::default(),
        metadata: ConfigMetadata::default(),
    }
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

pub fn scan(
    id: &str,
    scan_type: Option<&str>,
    status: Option<&str>,
    result: Option<&str>,
    timestamp: DateTime<Utc>,
) -> ScanDocument {
    ScanDocument {
        id: id.to_string(),
        raw: RawScanDocument {
            scan_type: scan_type.map(str::to_string),
            timestamp: Some(timestamp),
            status: status.map(str::to_string),
            analysis_result: result.map(str::to_string),
            error: None,
        },
    }
}

/// In-memory scan history keyed by user.
pub struct FakeScanSource {
    users: Vec<(String, Vec<ScanDocument>)>,
    failure: Option<fn() -> ProviderError>,
    pub user_listings: AtomicUsize,
}

impl FakeScanSource {
    pub fn new(users: Vec<(&str, Vec<ScanDocument>)>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|(id, scans)| (id.to_string(), scans))
                .collect(),
            failure: None,
            user_listings: AtomicUsize::new(0),
        }
    }

    pub fn failing(failure: fn() -> ProviderError) -> Self {
        Self {
            users: Vec::new(),
            failure: Some(failure),
            user_listings: AtomicUsize::new(0),
        }
    }

    /// Two users, five scans across both, spanning two days.
    pub fn sample() -> Self {
        Self::new(vec![
            (
                "alice-0001-uid",
                vec![
                    scan("a1", Some("bottle"), Some("completed"), Some("Catena Malbec 2019"), at(1, 10)),
                    scan("a2", Some("wine-list"), Some("error"), Some(""), at(1, 8)),
                    scan("a3", Some("shelf"), Some("pending"), Some("<b>three</b> bottles"), at(2, 9)),
                ],
            ),
            (
                "bob-0002-uid",
                vec![
                    scan("b1", None, None, Some("ERROR: label unreadable"), at(2, 12)),
                    scan("b2", Some("party"), Some("completed"), Some("Riesling flight"), at(1, 9)),
                ],
            ),
        ])
    }

    pub fn listings(&self) -> usize {
        self.user_listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanSource for FakeScanSource {
    async fn list_user_ids(&self) -> Result<Vec<String>, ProviderError> {
        self.user_listings.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        Ok(self.users.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn recent_scans(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ScanDocument>, ProviderError> {
        let scans = self
            .users
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, scans)| scans.iter().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(scans)
    }
}

pub fn wine(id: &str, name: &str, wine_type: WineType, country: &str, rating: Option<f32>) -> WineEntry {
    WineEntry {
        id: id.to_string(),
        name: name.to_string(),
        winery: String::new(),
        vintage: None,
        wine_type,
        region: String::new(),
        country: country.to_string(),
        grapes: Vec::new(),
        rating,
        price: None,
        cached_at: Some(Utc::now()),
    }
}

/// Serves a fixed catalog in pages of `page_size`.
pub struct FakeCatalogSource {
    wines: Vec<WineEntry>,
    pub page_fetches: AtomicUsize,
}

impl FakeCatalogSource {
    pub fn new(wines: Vec<WineEntry>) -> Self {
        Self {
            wines,
            page_fetches: AtomicUsize::new(0),
        }
    }

    pub fn sample() -> Self {
        Self::new(vec![
            wine("w1", "Catena Malbec", WineType::Red, "Argentina", Some(4.2)),
            wine("w2", "Cloudy Bay Sauvignon", WineType::White, "New Zealand", None),
            wine("w3", "Barolo Cannubi", WineType::Red, "Italy", Some(4.6)),
        ])
    }

    pub fn fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalogSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<CatalogPage, ProviderError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        let size = page_size.max(1) as usize;
        let total_pages = self.wines.len().div_ceil(size).max(1) as u32;
        let start = (page.saturating_sub(1) as usize) * size;
        Ok(CatalogPage {
            wines: self.wines.iter().skip(start).take(size).cloned().collect(),
            page,
            total_pages,
            total: self.wines.len() as u64,
        })
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn build_app(
    config: Config,
    scans: Arc<FakeScanSource>,
    catalog: Option<Arc<FakeCatalogSource>>,
) -> TestApp {
    let catalog: Option<Arc<dyn CatalogSource>> = catalog.map(|c| c as Arc<dyn CatalogSource>);
    let state = AppState::new(Arc::new(config), scans, catalog);
    let server = TestServer::new(create_app(state.clone())).expect("test server");
    TestApp { server, state }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Log in with the configured credentials and return the session token.
pub async fn login(server: &TestServer) -> String {
    let response = server
        .post(v1::auth::LOGIN)
        .json(&json!({ "username": USERNAME, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().expect("token in login response").to_string()
}
