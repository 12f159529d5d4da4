use axum::{
    extract::State,
    http::HeaderMap,
    response::Html,
};
use chrono::Utc;

use crate::auth::session_token;
use crate::html;
use crate::infra::app_state::AppState;

/// Login form for anonymous visitors, the dashboard for live sessions.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let session = match session_token(&headers) {
        Some(token) => state.sessions.validate(&token, Utc::now()).await,
        None => None,
    };
    match session {
        Some(session) => Html(html::dashboard_page(&session.username)),
        None => Html(html::login_page()),
    }
}
