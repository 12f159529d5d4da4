//! Remote data sources: the hosted document store holding scan history and
//! the wine catalog API.

pub mod catalog_api;
pub mod firestore;
pub mod firestore_values;

use async_trait::async_trait;

use cellarscope_model::{CatalogPage, RawScanDocument};

pub use catalog_api::{CatalogApiConfig, CatalogApiProvider};
pub use firestore::{FirestoreConfig, FirestoreScanSource};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => ProviderError::InvalidCredentials,
            404 => ProviderError::NotFound,
            429 => ProviderError::RateLimited,
            _ => ProviderError::ApiError(message),
        }
    }
}

/// A stored scan document together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDocument {
    pub id: String,
    pub raw: RawScanDocument,
}

/// Read access to per-user scan history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Identifiers of every user with a profile document.
    async fn list_user_ids(&self) -> Result<Vec<String>, ProviderError>;

    /// The user's most recent scans, newest first, at most `limit`.
    async fn recent_scans(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ScanDocument>, ProviderError>;
}

/// Paged read access to the wine catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<CatalogPage, ProviderError>;
}
