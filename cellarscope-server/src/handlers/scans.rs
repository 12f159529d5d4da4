use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use cellarscope_core::ScanView;
use cellarscope_core::scan::{ScanFilter, ScanFilterQuery, ScanStats};

use crate::auth::handlers::current_user;
use crate::html;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    sessions::SessionInfo,
};

#[derive(Debug, Serialize)]
pub struct ScanListResponse {
    pub scans: Vec<ScanView>,
    pub matched: usize,
    /// Statistics over every loaded scan, not just the matches.
    pub stats: ScanStats,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub stats: ScanStats,
    pub loaded_at: DateTime<Utc>,
}

pub async fn list_scans(
    State(state): State<AppState>,
    Query(query): Query<ScanFilterQuery>,
) -> AppResult<Json<ScanListResponse>> {
    let offset = state.display_offset();
    let filter = ScanFilter::from_query(&query, offset)?;
    let snapshot = state.scans.current(Utc::now()).await.map_err(|err| {
        error!(error = %err, "scan load failed");
        AppError::scan_load(&err)
    })?;

    let scans: Vec<ScanView> = filter
        .apply(&snapshot.scans)
        .into_iter()
        .map(|scan| ScanView::from_record(scan, offset))
        .collect();

    Ok(Json(ScanListResponse {
        matched: scans.len(),
        scans,
        stats: snapshot.stats.clone(),
        loaded_at: snapshot.loaded_at,
    }))
}

pub async fn scan_stats(State(state): State<AppState>) -> AppResult<Json<ScanStats>> {
    let snapshot = state
        .scans
        .current(Utc::now())
        .await
        .map_err(|err| AppError::scan_load(&err))?;
    Ok(Json(snapshot.stats.clone()))
}

pub async fn refresh_scans(
    State(state): State<AppState>,
    session: Extension<SessionInfo>,
) -> AppResult<Json<RefreshResponse>> {
    let snapshot = state.scans.refresh(Utc::now()).await.map_err(|err| {
        error!(error = %err, "scan refresh failed");
        AppError::scan_load(&err)
    })?;
    info!(
        by = current_user(&session),
        scans = snapshot.scans.len(),
        "scan snapshot refreshed"
    );
    Ok(Json(RefreshResponse {
        stats: snapshot.stats.clone(),
        loaded_at: snapshot.loaded_at,
    }))
}

/// The rendered list fragment. A failed load renders the error in place
/// of the list.
pub async fn scans_html(
    State(state): State<AppState>,
    Query(query): Query<ScanFilterQuery>,
) -> AppResult<Response> {
    let offset = state.display_offset();
    let filter = ScanFilter::from_query(&query, offset)?;

    let snapshot = match state.scans.current(Utc::now()).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(error = %err, "scan load failed");
            let message = AppError::scan_load(&err).message;
            return Ok((StatusCode::BAD_GATEWAY, Html(html::load_error(&message))).into_response());
        }
    };

    let views: Vec<ScanView> = filter
        .apply(&snapshot.scans)
        .into_iter()
        .map(|scan| ScanView::from_record(scan, offset))
        .collect();
    Ok(Html(html::scan_list(&views)).into_response())
}
