use axum::{
    Router, middleware,
    routing::{get, post},
};

use cellarscope_core::api_routes::v1;

use crate::{
    AppState,
    auth::{self, require_session},
    handlers::{catalog, health, scans},
};

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public endpoints
        .route(v1::HEALTH, get(health::health))
        .route(v1::auth::LOGIN, post(auth::handlers::login))
        .route(v1::auth::LOGOUT, post(auth::handlers::logout))
        .route(v1::auth::STATUS, get(auth::handlers::status))
        .merge(create_dashboard_routes(state))
}

/// Routes that need a logged-in dashboard session.
fn create_dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(v1::scans::COLLECTION, get(scans::list_scans))
        .route(v1::scans::STATS, get(scans::scan_stats))
        .route(v1::scans::REFRESH, post(scans::refresh_scans))
        .route(v1::scans::HTML, get(scans::scans_html))
        .route(v1::catalog::COLLECTION, get(catalog::list_catalog))
        .route(v1::catalog::STATS, get(catalog::catalog_stats))
        .route(v1::catalog::REFRESH, post(catalog::refresh_catalog))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}
