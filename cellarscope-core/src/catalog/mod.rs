//! Wine catalog: paged loading, a TTL cache, browsing filters and cache statistics.

pub mod cache;
pub mod filter;
pub mod loader;
pub mod stats;

pub use cache::{CatalogCache, CatalogSnapshot};
pub use filter::{
    CatalogFilter, CatalogQuery, CatalogSlice, CatalogSort, DEFAULT_CATALOG_LIMIT,
    MAX_CATALOG_LIMIT, SortOrder,
};
pub use loader::{CatalogLoader, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
pub use stats::{CacheStats, CountryCount, TypeCount, VintageRange};
