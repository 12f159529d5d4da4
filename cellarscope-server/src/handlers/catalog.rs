use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use cellarscope_core::catalog::{CacheStats, CatalogCache, CatalogFilter, CatalogQuery};
use cellarscope_core::model::WineEntry;

use crate::auth::handlers::current_user;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    sessions::SessionInfo,
};

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub wines: Vec<WineEntry>,
    pub total_matches: usize,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CatalogStatsResponse {
    pub fetched_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: CacheStats,
}

fn catalog_cache(state: &AppState) -> AppResult<&Arc<CatalogCache>> {
    state
        .catalog
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Catalog API is not configured"))
}

pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<CatalogListResponse>> {
    let filter = CatalogFilter::from_query(&query)?;
    let snapshot = catalog_cache(&state)?
        .get(Utc::now())
        .await
        .map_err(|err| {
            error!(error = %err, "catalog load failed");
            AppError::catalog_load(&err)
        })?;

    let slice = filter.apply(&snapshot.wines);
    Ok(Json(CatalogListResponse {
        total_matches: slice.total_matches,
        wines: slice.wines.into_iter().cloned().collect(),
        total: snapshot.wines.len(),
        offset: filter.offset,
        limit: filter.limit,
        fetched_at: snapshot.fetched_at,
    }))
}

pub async fn catalog_stats(
    State(state): State<AppState>,
) -> AppResult<Json<CatalogStatsResponse>> {
    let now = Utc::now();
    let snapshot = catalog_cache(&state)?
        .get(now)
        .await
        .map_err(|err| AppError::catalog_load(&err))?;

    Ok(Json(CatalogStatsResponse {
        fetched_at: snapshot.fetched_at,
        stats: CacheStats::compute(&snapshot.wines, now, state.catalog_stale_after()),
    }))
}

pub async fn refresh_catalog(
    State(state): State<AppState>,
    session: Extension<SessionInfo>,
) -> AppResult<Json<CatalogStatsResponse>> {
    let now = Utc::now();
    let snapshot = catalog_cache(&state)?.refresh(now).await.map_err(|err| {
        error!(error = %err, "catalog refresh failed");
        AppError::catalog_load(&err)
    })?;
    info!(
        by = current_user(&session),
        wines = snapshot.wines.len(),
        "catalog cache refreshed on request"
    );

    Ok(Json(CatalogStatsResponse {
        fetched_at: snapshot.fetched_at,
        stats: CacheStats::compute(&snapshot.wines, now, state.catalog_stale_after()),
    }))
}
