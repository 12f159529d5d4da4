//! Outcome classification for scan records.
//!
//! A scan counts as an error when its status says so *or* when the stored
//! analysis text mentions an error; the analysis pipeline sometimes records
//! a failure message with a `completed` status. Success is stricter and
//! requires an explicit `completed` status, so a scan can be neither.

use serde::{Deserialize, Serialize};

use cellarscope_model::{ScanRecord, ScanStatus};

const ERROR_MARKER: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    Success,
    Error,
    /// Neither failed nor completed, e.g. still processing.
    Pending,
}

/// Badge shown next to a scan in the list; pending scans render as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanBadge {
    Success,
    Error,
}

impl ScanBadge {
    pub fn label(&self) -> &'static str {
        match self {
            ScanBadge::Success => "Success",
            ScanBadge::Error => "Error",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScanBadge::Success => "success",
            ScanBadge::Error => "error",
        }
    }
}

fn result_mentions_error(result: &str) -> bool {
    result.to_lowercase().contains(ERROR_MARKER)
}

pub fn is_error(scan: &ScanRecord) -> bool {
    scan.status == ScanStatus::Error || result_mentions_error(&scan.result)
}

pub fn is_success(scan: &ScanRecord) -> bool {
    scan.status == ScanStatus::Completed && !result_mentions_error(&scan.result)
}

pub fn classify(scan: &ScanRecord) -> ScanOutcome {
    if is_error(scan) {
        ScanOutcome::Error
    } else if is_success(scan) {
        ScanOutcome::Success
    } else {
        ScanOutcome::Pending
    }
}

pub fn badge(scan: &ScanRecord) -> ScanBadge {
    if is_error(scan) {
        ScanBadge::Error
    } else {
        ScanBadge::Success
    }
}
