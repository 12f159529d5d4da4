use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::firestore_values::{
    ListDocumentsResponse, RunQueryRequest, RunQueryResponseItem,
};
use super::{ProviderError, ScanDocument, ScanSource};

pub const FIRESTORE_V1_BASE: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";

const USERS_COLLECTION: &str = "users";
const SCAN_HISTORY_COLLECTION: &str = "snapHistory";
const SCAN_ORDER_FIELD: &str = "timestamp";
const USER_PAGE_SIZE: u32 = 300;

#[derive(Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub database: String,
    /// Web API key sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// OAuth access token sent as a bearer token.
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        FirestoreConfig {
            base_url: FIRESTORE_V1_BASE.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
            bearer_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Scan history read from the hosted document store over its REST API.
///
/// Layout: `users/{uid}` profile documents, each with a `snapHistory`
/// subcollection of scan documents.
pub struct FirestoreScanSource {
    http: reqwest::Client,
    config: FirestoreConfig,
}

impl fmt::Debug for FirestoreScanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreScanSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FirestoreScanSource {
    pub fn new(config: FirestoreConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn documents_url(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let base = format!("{}/", self.config.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .map_err(|err| ProviderError::InvalidUrl(format!("{base}: {err}")))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ProviderError::InvalidUrl(format!("{base}: cannot be a base"))
            })?;
            path.pop_if_empty()
                .push("projects")
                .push(&self.config.project_id)
                .push("databases")
                .push(&self.config.database)
                .push("documents");
            for segment in segments {
                path.push(segment);
            }
        }
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|err| ProviderError::ParseError(err.to_string()));
        }

        #[derive(Debug, Deserialize)]
        struct ErrorBody {
            error: ErrorDetail,
        }

        #[derive(Debug, Deserialize)]
        struct ErrorDetail {
            #[serde(default)]
            message: Option<String>,
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| {
                format!("document store request failed with status {}", status)
            });

        error!(%status, %message, "document store request failed");
        Err(ProviderError::from_status(status, message))
    }
}

#[async_trait]
impl ScanSource for FirestoreScanSource {
    async fn list_user_ids(&self) -> Result<Vec<String>, ProviderError> {
        let mut user_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.documents_url(&[USERS_COLLECTION])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &USER_PAGE_SIZE.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.authorize(self.http.get(url)).send().await?;
            let page: ListDocumentsResponse = Self::read_json(response).await?;
            user_ids.extend(page.documents.iter().map(|doc| doc.id().to_string()));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(users = user_ids.len(), "listed user profiles");
        Ok(user_ids)
    }

    async fn recent_scans(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ScanDocument>, ProviderError> {
        let target = format!("{user_id}:runQuery");
        let url = self.documents_url(&[USERS_COLLECTION, &target])?;
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        let body = RunQueryRequest::newest_first(
            SCAN_HISTORY_COLLECTION,
            SCAN_ORDER_FIELD,
            limit,
        );

        let response = self
            .authorize(self.http.post(url).json(&body))
            .send()
            .await?;
        let items: Vec<RunQueryResponseItem> = Self::read_json(response).await?;

        let scans: Vec<ScanDocument> = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|doc| ScanDocument {
                id: doc.id().to_string(),
                raw: doc.to_raw_scan(),
            })
            .collect();

        debug!(user_id, scans = scans.len(), "fetched scan history");
        Ok(scans)
    }
}
