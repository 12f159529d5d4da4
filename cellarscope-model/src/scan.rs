use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of image analysis a scan performed.
///
/// Stored documents carry the kind as a free-form string; values the
/// dashboard does not know about are preserved in [`ScanType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanType {
    WineList,
    Bottle,
    Shelf,
    Party,
    Other(String),
}

impl ScanType {
    /// Scan type assumed when a stored document has none.
    pub const DEFAULT: ScanType = ScanType::WineList;

    pub fn known() -> &'static [ScanType] {
        use ScanType::*;
        &[WineList, Bottle, Shelf, Party]
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "wine-list" => ScanType::WineList,
            "bottle" => ScanType::Bottle,
            "shelf" => ScanType::Shelf,
            "party" => ScanType::Party,
            other => ScanType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScanType::WineList => "wine-list",
            ScanType::Bottle => "bottle",
            ScanType::Shelf => "shelf",
            ScanType::Party => "party",
            ScanType::Other(raw) => raw,
        }
    }

    /// Human-readable label; only the first hyphen becomes a space.
    pub fn label(&self) -> String {
        self.as_str().replacen('-', " ", 1)
    }
}

impl Default for ScanType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<String> for ScanType {
    fn from(raw: String) -> Self {
        match ScanType::parse(&raw) {
            ScanType::Other(_) => ScanType::Other(raw),
            known => known,
        }
    }
}

impl From<ScanType> for String {
    fn from(value: ScanType) -> Self {
        match value {
            ScanType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status recorded on a scan document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanStatus {
    Completed,
    Error,
    /// Any other stored value, e.g. `pending` or `processing`.
    Other(String),
}

impl ScanStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "completed" => ScanStatus::Completed,
            "error" => ScanStatus::Error,
            other => ScanStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScanStatus::Completed => "completed",
            ScanStatus::Error => "error",
            ScanStatus::Other(raw) => raw,
        }
    }
}

impl Default for ScanStatus {
    fn default() -> Self {
        ScanStatus::Completed
    }
}

impl From<String> for ScanStatus {
    fn from(raw: String) -> Self {
        ScanStatus::parse(&raw)
    }
}

impl From<ScanStatus> for String {
    fn from(value: ScanStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan document as read from the store, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawScanDocument {
    pub scan_type: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub analysis_result: Option<String>,
    pub error: Option<String>,
}

/// A normalized scan record belonging to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub scan_type: ScanType,
    pub timestamp: DateTime<Utc>,
    pub status: ScanStatus,
    pub result: String,
    pub error: Option<String>,
}

impl ScanRecord {
    /// Build a record, filling missing fields with dashboard defaults.
    ///
    /// Empty strings count as missing for type and status, so a blank
    /// `scanType` still reads as a wine-list scan.
    pub fn from_raw(
        id: impl Into<String>,
        user_id: impl Into<String>,
        raw: RawScanDocument,
        now: DateTime<Utc>,
    ) -> Self {
        let RawScanDocument {
            scan_type,
            timestamp,
            status,
            analysis_result,
            error,
        } = raw;

        ScanRecord {
            id: id.into(),
            user_id: user_id.into(),
            scan_type: scan_type
                .filter(|value| !value.is_empty())
                .map(ScanType::from)
                .unwrap_or_default(),
            timestamp: timestamp.unwrap_or(now),
            status: status
                .filter(|value| !value.is_empty())
                .map(ScanStatus::from)
                .unwrap_or_default(),
            result: analysis_result.unwrap_or_default(),
            error: error.filter(|value| !value.is_empty()),
        }
    }
}
