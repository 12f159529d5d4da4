//! Translating dashboard filter controls into a predicate over scans.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use cellarscope_model::{ScanRecord, ScanType};

use super::classify::is_error;
use crate::error::FilterError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    Any,
    /// Everything that is not an error, pending scans included.
    Success,
    Error,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "any" => Ok(StatusFilter::Any),
            "success" => Ok(StatusFilter::Success),
            "error" => Ok(StatusFilter::Error),
            _ => Err(FilterError::UnknownStatus(raw.to_string())),
        }
    }

    fn admits(&self, scan: &ScanRecord) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Success => !is_error(scan),
            StatusFilter::Error => is_error(scan),
        }
    }
}

/// Raw filter controls as they arrive from a query string.
///
/// Empty strings mean the control is unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScanFilterQuery {
    #[serde(default, rename = "type")]
    pub scan_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    pub scan_type: Option<ScanType>,
    pub status: StatusFilter,
    /// Calendar day, evaluated in `offset`.
    pub date: Option<NaiveDate>,
    /// Lowercased needle; never blank.
    search: Option<String>,
    pub offset: FixedOffset,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanFilter {
    pub fn new() -> Self {
        ScanFilter {
            scan_type: None,
            status: StatusFilter::Any,
            date: None,
            search: None,
            offset: utc(),
        }
    }

    pub fn from_query(
        query: &ScanFilterQuery,
        offset: FixedOffset,
    ) -> Result<Self, FilterError> {
        let scan_type = non_empty(query.scan_type.as_deref()).map(ScanType::parse);
        let status = match non_empty(query.status.as_deref()) {
            Some(raw) => StatusFilter::parse(raw)?,
            None => StatusFilter::Any,
        };
        let date = match non_empty(query.date.as_deref()) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| FilterError::InvalidDate(raw.to_string()))?,
            ),
            None => None,
        };

        Ok(ScanFilter::new()
            .with_type(scan_type)
            .with_status(status)
            .with_date(date)
            .with_search(query.search.as_deref())
            .with_offset(offset))
    }

    pub fn with_type(mut self, scan_type: Option<ScanType>) -> Self {
        self.scan_type = scan_type;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = non_empty(search).map(str::to_lowercase);
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.scan_type.is_none()
            && self.status == StatusFilter::Any
            && self.date.is_none()
            && self.search.is_none()
    }

    pub fn matches(&self, scan: &ScanRecord) -> bool {
        if let Some(kind) = &self.scan_type
            && &scan.scan_type != kind
        {
            return false;
        }

        if !self.status.admits(scan) {
            return false;
        }

        if let Some(day) = self.date
            && scan.timestamp.with_timezone(&self.offset).date_naive() != day
        {
            return false;
        }

        if let Some(needle) = &self.search {
            let haystack = format!(
                "{} {} {}",
                scan.result, scan.user_id, scan.scan_type
            )
            .to_lowercase();
            if !haystack.contains(needle.as_str()) {
                return false;
            }
        }

        true
    }

    /// Matching scans in their original order.
    pub fn apply<'a>(&self, scans: &'a [ScanRecord]) -> Vec<&'a ScanRecord> {
        scans.iter().filter(|scan| self.matches(scan)).collect()
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}

fn utc() -> FixedOffset {
    Utc.fix()
}
