//! Scan records: classification, statistics, filtering and loading.

pub mod classify;
pub mod filter;
pub mod loader;
pub mod stats;

pub use classify::{ScanBadge, ScanOutcome, badge, classify, is_error, is_success};
pub use filter::{ScanFilter, ScanFilterQuery, StatusFilter};
pub use loader::{DEFAULT_PER_USER_LIMIT, ScanLoader, ScanSnapshot};
pub use stats::{OutcomeCounts, ScanStats, TypeBreakdown};
