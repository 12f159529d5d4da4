//! Wire shapes of the document store's REST API.
//!
//! Field values arrive wrapped in a type tag, e.g.
//! `{"stringValue": "bottle"}` or `{"timestampValue": "2026-03-01T12:00:00Z"}`.
//! Only the tags the dashboard reads are decoded; anything else is treated
//! as absent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cellarscope_model::RawScanDocument;

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Full resource name, ending in `<collection>/<document id>`.
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn string_field(&self, key: &str) -> Option<String> {
        let value = self.fields.get(key)?;
        value
            .get("stringValue")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Timestamp fields; RFC 3339 strings stored as plain strings count too.
    pub fn timestamp_field(&self, key: &str) -> Option<DateTime<Utc>> {
        let value = self.fields.get(key)?;
        let raw = value
            .get("timestampValue")
            .or_else(|| value.get("stringValue"))
            .and_then(Value::as_str)?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|stamp| stamp.with_timezone(&Utc))
    }

    pub fn to_raw_scan(&self) -> RawScanDocument {
        RawScanDocument {
            scan_type: self.string_field("scanType"),
            timestamp: self.timestamp_field("timestamp"),
            status: self.string_field("status"),
            analysis_result: self.string_field("analysisResult"),
            error: self.string_field("error"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One element of a `runQuery` response stream. Entries without a
/// document only carry read metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "orderBy")]
    pub order_by: Vec<Order>,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

const DESCENDING: &str = "DESCENDING";

impl RunQueryRequest {
    /// Newest-first query over a subcollection.
    pub fn newest_first(collection: &str, order_field: &str, limit: u32) -> Self {
        RunQueryRequest {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                order_by: vec![Order {
                    field: FieldReference {
                        field_path: order_field.to_string(),
                    },
                    direction: DESCENDING,
                }],
                limit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn document(fields: Value) -> Document {
        serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/users/u1/snapHistory/scan-42",
            "fields": fields,
        }))
        .unwrap()
    }

    #[test]
    fn id_is_last_path_segment() {
        assert_eq!(document(json!({})).id(), "scan-42");
    }

    #[test]
    fn decodes_scan_fields() {
        let doc = document(json!({
            "scanType": { "stringValue": "bottle" },
            "timestamp": { "timestampValue": "2026-03-01T12:30:00.123456Z" },
            "status": { "stringValue": "error" },
            "analysisResult": { "stringValue": "Could not read label" },
            "error": { "nullValue": null },
            "confidence": { "doubleValue": 0.4 }
        }));
        let raw = doc.to_raw_scan();

        assert_eq!(raw.scan_type.as_deref(), Some("bottle"));
        assert_eq!(raw.status.as_deref(), Some("error"));
        assert_eq!(raw.analysis_result.as_deref(), Some("Could not read label"));
        assert_eq!(raw.error, None);
        let stamp = raw.timestamp.unwrap();
        assert_eq!(
            stamp.timestamp(),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let doc = document(json!({
            "scanType": { "integerValue": "3" },
            "timestamp": { "stringValue": "yesterday" }
        }));
        let raw = doc.to_raw_scan();
        assert_eq!(raw.scan_type, None);
        assert_eq!(raw.timestamp, None);
    }

    #[test]
    fn run_query_request_shape() {
        let body = serde_json::to_value(RunQueryRequest::newest_first(
            "snapHistory",
            "timestamp",
            100,
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "snapHistory" }],
                    "orderBy": [{
                        "field": { "fieldPath": "timestamp" },
                        "direction": "DESCENDING"
                    }],
                    "limit": 100
                }
            })
        );
    }

    #[test]
    fn run_query_items_without_documents() {
        let items: Vec<RunQueryResponseItem> =
            serde_json::from_value(json!([{ "readTime": "2026-03-01T00:00:00Z" }]))
                .unwrap();
        assert!(items[0].document.is_none());
    }
}
