//! Render-ready projections of scan records.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use cellarscope_model::ScanRecord;

use crate::scan::{ScanBadge, badge};

pub const USER_ID_PREFIX_LEN: usize = 8;
pub const RESULT_PREVIEW_LEN: usize = 500;
const ELLIPSIS: &str = "...";

/// First eight characters of a user id, always followed by an ellipsis.
pub fn short_user_id(user_id: &str) -> String {
    let prefix: String = user_id.chars().take(USER_ID_PREFIX_LEN).collect();
    format!("{prefix}{ELLIPSIS}")
}

/// Analysis text cut to the preview length; the ellipsis marks a cut.
pub fn result_preview(result: &str) -> String {
    match result.char_indices().nth(RESULT_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &result[..cut]),
        None => result.to_string(),
    }
}

/// e.g. `Mar 1, 2026, 02:05 PM`.
pub fn format_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// One row of the scan list. Text fields are raw; escape before embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanView {
    pub id: String,
    pub scan_type: String,
    pub type_label: String,
    pub badge: ScanBadge,
    pub badge_label: &'static str,
    pub timestamp: DateTime<Utc>,
    pub formatted_date: String,
    pub user_id: String,
    pub short_user: String,
    pub preview: String,
    pub error: Option<String>,
}

impl ScanView {
    pub fn from_record(scan: &ScanRecord, offset: FixedOffset) -> Self {
        let badge = badge(scan);
        ScanView {
            id: scan.id.clone(),
            scan_type: scan.scan_type.as_str().to_string(),
            type_label: scan.scan_type.label(),
            badge,
            badge_label: badge.label(),
            timestamp: scan.timestamp,
            formatted_date: format_timestamp(scan.timestamp, offset),
            user_id: scan.user_id.clone(),
            short_user: short_user_id(&scan.user_id),
            preview: result_preview(&scan.result),
            error: scan.error.clone(),
        }
    }
}
