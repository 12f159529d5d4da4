use std::sync::Arc;

use tracing::{debug, info, warn};

use cellarscope_model::WineEntry;

use crate::providers::{CatalogSource, ProviderError};

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Walks the paged catalog listing front to back.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    page_size: u32,
    max_pages: u32,
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetch pages sequentially until the last page or the page cap.
    pub async fn load_all(&self) -> Result<Vec<WineEntry>, ProviderError> {
        let mut wines = Vec::new();
        let mut page = 1;

        loop {
            let listing = self.source.fetch_page(page, self.page_size).await?;
            let fetched = listing.wines.len();
            wines.extend(listing.wines);
            debug!(page, fetched, total_pages = listing.total_pages, "catalog page");

            if page >= listing.total_pages || fetched == 0 {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    total_pages = listing.total_pages,
                    "catalog has more pages than the configured cap"
                );
                break;
            }
            page += 1;
        }

        info!(wines = wines.len(), pages = page, "loaded wine catalog");
        Ok(wines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::wine;
    use crate::providers::MockCatalogSource;
    use cellarscope_model::CatalogPage;
    use mockall::predicate::eq;

    fn page(number: u32, total_pages: u32, ids: &[&str]) -> CatalogPage {
        CatalogPage {
            wines: ids.iter().map(|id| wine(id)).collect(),
            page: number,
            total_pages,
            total: 0,
        }
    }

    #[tokio::test]
    async fn walks_every_page() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(2))
            .returning(|_, _| Ok(page(1, 2, &["a", "b"])));
        source
            .expect_fetch_page()
            .with(eq(2), eq(2))
            .returning(|_, _| Ok(page(2, 2, &["c"])));

        let wines = CatalogLoader::new(Arc::new(source))
            .with_page_size(2)
            .load_all()
            .await
            .unwrap();
        let ids: Vec<&str> = wines.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn stops_at_page_cap() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch_page()
            .times(2)
            .returning(|number, _| Ok(page(number, 10, &["x"])));

        let wines = CatalogLoader::new(Arc::new(source))
            .with_max_pages(2)
            .load_all()
            .await
            .unwrap();
        assert_eq!(wines.len(), 2);
    }

    #[tokio::test]
    async fn empty_page_ends_the_walk() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(1, 5, &[])));

        let wines = CatalogLoader::new(Arc::new(source)).load_all().await.unwrap();
        assert!(wines.is_empty());
    }
}
