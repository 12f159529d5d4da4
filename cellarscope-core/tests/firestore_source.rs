//! Document store client against an in-process fake REST endpoint.

mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cellarscope_core::providers::{FirestoreConfig, FirestoreScanSource};
use cellarscope_core::scan::ScanLoader;
use cellarscope_core::{ProviderError, ScanSource};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

const PREFIX: &str = "/v1/projects/{project}/databases/{database}/documents";

#[derive(Clone, Default)]
struct FakeStore {
    queries: Arc<Mutex<Vec<(String, Value)>>>,
    list_params: Arc<Mutex<Vec<HashMap<String, String>>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

fn user_doc(id: &str) -> Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/users/{id}"),
        "fields": { "displayName": { "stringValue": id } }
    })
}

fn scan_doc(user: &str, id: &str, fields: Value) -> Value {
    json!({
        "document": {
            "name": format!(
                "projects/demo/databases/(default)/documents/users/{user}/snapHistory/{id}"
            ),
            "fields": fields
        },
        "readTime": "2026-03-02T00:00:00Z"
    })
}

async fn list_users(
    State(store): State<FakeStore>,
    Path((project, database)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    assert_eq!(project, "demo");
    assert_eq!(database, "(default)");
    if let Some(auth) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
        store.auth_headers.lock().unwrap().push(auth.to_string());
    }
    store.list_params.lock().unwrap().push(params.clone());

    match params.get("pageToken").map(String::as_str) {
        None => Json(json!({
            "documents": [user_doc("alice")],
            "nextPageToken": "page-2"
        }))
        .into_response(),
        Some("page-2") => Json(json!({ "documents": [user_doc("bob")] })).into_response(),
        Some(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn run_query(
    State(store): State<FakeStore>,
    Path((_project, _database, target)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = target.strip_suffix(":runQuery") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    store
        .queries
        .lock()
        .unwrap()
        .push((user.to_string(), body));

    let items = match user {
        "alice" => json!([
            scan_doc("alice", "a-1", json!({
                "scanType": { "stringValue": "bottle" },
                "timestamp": { "timestampValue": "2026-03-01T10:00:00Z" },
                "status": { "stringValue": "completed" },
                "analysisResult": { "stringValue": "Malbec, Mendoza 2019" }
            })),
            scan_doc("alice", "a-2", json!({
                "timestamp": { "stringValue": "2026-03-01T08:00:00+00:00" },
                "status": { "stringValue": "error" },
                "error": { "stringValue": "image too dark" }
            }))
        ]),
        "bob" => json!([
            scan_doc("bob", "b-1", json!({
                "scanType": { "stringValue": "shelf" },
                "timestamp": { "timestampValue": "2026-03-01T09:00:00Z" },
                "analysisResult": { "stringValue": "Three bottles" }
            })),
            { "readTime": "2026-03-02T00:00:00Z" }
        ]),
        _ => json!([]),
    };
    Json(items).into_response()
}

async fn start(store: FakeStore) -> String {
    let router = Router::new()
        .route(&format!("{PREFIX}/users"), get(list_users))
        .route(&format!("{PREFIX}/users/{{target}}"), post(run_query))
        .with_state(store);
    let base = support::spawn_fake(router).await.unwrap();
    format!("{base}/v1")
}

fn source(base_url: String) -> FirestoreScanSource {
    let mut config = FirestoreConfig::new("demo");
    config.base_url = base_url;
    config.api_key = Some("web-key".into());
    config.bearer_token = Some("access-token".into());
    FirestoreScanSource::new(config).unwrap()
}

#[tokio::test]
async fn lists_users_across_pages() {
    let store = FakeStore::default();
    let source = source(start(store.clone()).await);

    let users = source.list_user_ids().await.unwrap();
    assert_eq!(users, vec!["alice", "bob"]);

    let params = store.list_params.lock().unwrap().clone();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].get("key").map(String::as_str), Some("web-key"));
    assert_eq!(params[0].get("pageSize").map(String::as_str), Some("300"));
    assert_eq!(params[1].get("pageToken").map(String::as_str), Some("page-2"));
    assert!(
        store
            .auth_headers
            .lock()
            .unwrap()
            .iter()
            .all(|h| h == "Bearer access-token")
    );
}

#[tokio::test]
async fn recent_scans_sends_a_newest_first_query() {
    let store = FakeStore::default();
    let source = source(start(store.clone()).await);

    let scans = source.recent_scans("alice", 25).await.unwrap();
    assert_eq!(scans.len(), 2);
    assert_eq!(scans[0].id, "a-1");
    assert_eq!(scans[0].raw.scan_type.as_deref(), Some("bottle"));
    assert_eq!(scans[1].raw.error.as_deref(), Some("image too dark"));
    assert_eq!(
        scans[1].raw.timestamp,
        Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap())
    );

    let queries = store.queries.lock().unwrap().clone();
    let (user, body) = &queries[0];
    assert_eq!(user, "alice");
    let query = &body["structuredQuery"];
    assert_eq!(query["from"][0]["collectionId"], "snapHistory");
    assert_eq!(query["orderBy"][0]["field"]["fieldPath"], "timestamp");
    assert_eq!(query["orderBy"][0]["direction"], "DESCENDING");
    assert_eq!(query["limit"], 25);
}

#[tokio::test]
async fn loader_merges_all_users() {
    let store = FakeStore::default();
    let source = Arc::new(source(start(store).await));

    let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
    let snapshot = ScanLoader::new(source).snapshot(now).await.unwrap();

    let ids: Vec<&str> = snapshot.scans.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a-1", "b-1", "a-2"]);
    assert_eq!(snapshot.stats.total, 3);
    assert_eq!(snapshot.stats.successful, 2);
    assert_eq!(snapshot.stats.errors, 1);
    assert_eq!(snapshot.scans[2].scan_type.as_str(), "wine-list");
}

#[tokio::test]
async fn error_bodies_map_to_provider_errors() {
    async fn denied() -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "code": 403, "message": "Missing or insufficient permissions." } })),
        )
            .into_response()
    }
    async fn broken() -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "code": 500, "message": "backend unavailable" } })),
        )
            .into_response()
    }

    let router = Router::new()
        .route(&format!("{PREFIX}/users"), get(denied))
        .route(&format!("{PREFIX}/users/{{target}}"), post(broken));
    let base = support::spawn_fake(router).await.unwrap();
    let source = source(format!("{base}/v1"));

    assert!(matches!(
        source.list_user_ids().await,
        Err(ProviderError::InvalidCredentials)
    ));
    match source.recent_scans("alice", 10).await {
        Err(ProviderError::ApiError(message)) => assert_eq!(message, "backend unavailable"),
        other => panic!("unexpected result: {other:?}"),
    }
}
