//! # Cellarscope Server
//!
//! Admin dashboard for the wine recognition app. It reads every user's
//! recent scan history from the hosted document store, and optionally the
//! wine catalog from the catalog API, and serves:
//!
//! - a login-gated HTML dashboard at `/`
//! - JSON and HTML fragment endpoints under `/api/v1`

pub mod auth;
pub mod handlers;
pub mod html;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn create_app(state: AppState) -> Router {
    let versioned_api = routes::create_api_router(state.clone());

    let origins: Vec<HeaderValue> = state
        .config()
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(handlers::shell::index))
        .merge(versioned_api)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
