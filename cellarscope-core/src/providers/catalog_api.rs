use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use cellarscope_model::CatalogPage;

use super::{CatalogSource, ProviderError};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Service root; the listing lives at `{base_url}/wines`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CatalogApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        CatalogApiConfig {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WinesQuery {
    page: u32,
    page_size: u32,
}

pub struct CatalogApiProvider {
    http: reqwest::Client,
    config: CatalogApiConfig,
}

impl fmt::Debug for CatalogApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogApiProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CatalogApiProvider {
    pub fn new(config: CatalogApiConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn wines_url(&self) -> String {
        format!("{}/wines", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CatalogSource for CatalogApiProvider {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<CatalogPage, ProviderError> {
        let query = WinesQuery {
            page: page.max(1),
            page_size: page_size.max(1),
        };

        let mut request = self.http.get(self.wines_url()).query(&query);
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let page = response
                .json::<CatalogPage>()
                .await
                .map_err(|err| ProviderError::ParseError(err.to_string()))?;
            debug!(
                page = page.page,
                total_pages = page.total_pages,
                wines = page.wines.len(),
                "fetched catalog page"
            );
            return Ok(page);
        }

        #[derive(Debug, Deserialize)]
        struct CatalogErrorBody {
            #[serde(default, alias = "error")]
            message: Option<String>,
        }

        let message = response
            .json::<CatalogErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                format!("catalog request failed with status {}", status)
            });

        error!(%status, %message, "catalog request failed");
        Err(ProviderError::from_status(status, message))
    }
}
