use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::middleware::{expired_session_cookie, session_cookie, session_token};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    sessions::SessionInfo,
};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

fn credentials_match(state: &AppState, request: &LoginRequest) -> bool {
    let auth = &state.config().auth;
    // Both comparisons always run.
    let username_ok = constant_time_eq(request.username.as_bytes(), auth.username.as_bytes());
    let password_ok = constant_time_eq(request.password.as_bytes(), auth.password.as_bytes());
    username_ok & password_ok
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Response> {
    if !credentials_match(&state, &request) {
        warn!(username = %request.username, "dashboard login rejected");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let now = Utc::now();
    let session = state.sessions.issue(&request.username, now).await;
    let cookie = session_cookie(&session.token, state.sessions.ttl().num_seconds());
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::internal("failed to encode session cookie"))?;

    let body = LoginResponse {
        token: session.token,
        username: session.username,
        expires_at: session.expires_at,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(&token).await;
    }
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(AuthStatus {
            authenticated: false,
            username: None,
            expires_at: None,
        }),
    )
        .into_response()
}

pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatus> {
    let session = match session_token(&headers) {
        Some(token) => state.sessions.validate(&token, Utc::now()).await,
        None => None,
    };
    Json(match session {
        Some(session) => AuthStatus {
            authenticated: true,
            username: Some(session.username),
            expires_at: Some(session.expires_at),
        },
        None => AuthStatus {
            authenticated: false,
            username: None,
            expires_at: None,
        },
    })
}

/// Who is logged in, for handlers behind the session middleware.
pub fn current_user(session: &Extension<SessionInfo>) -> &str {
    &session.username
}
