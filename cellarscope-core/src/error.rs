use thiserror::Error;

/// Rejected filter input coming from a query string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown status filter `{0}` (expected success or error)")]
    UnknownStatus(String),

    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("unknown sort key `{0}`")]
    UnknownSort(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),
}
