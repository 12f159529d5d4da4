use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub token: String,
    pub username: String,
    pub authenticated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Opaque dashboard login sessions held in memory.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, SessionInfo>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn issue(&self, username: &str, now: DateTime<Utc>) -> SessionInfo {
        let session = SessionInfo {
            token: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            authenticated_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions
            .lock()
            .await
            .insert(session.token.clone(), session.clone());
        info!(username, "dashboard session issued");
        session
    }

    /// The live session for `token`. Expired entries are dropped on sight.
    pub async fn validate(&self, token: &str, now: DateTime<Utc>) -> Option<SessionInfo> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(token) {
            Some(session) if session.is_valid(now) => Some(session.clone()),
            Some(_) => {
                sessions.remove(token);
                debug!("expired session rejected");
                None
            }
            None => None,
        }
    }

    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.lock().await.remove(token).is_some();
        if removed {
            info!("dashboard session revoked");
        }
        removed
    }

    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().await;
        let initial_count = sessions.len();
        sessions.retain(|_, session| session.is_valid(now));
        let removed_count = initial_count - sessions.len();
        if removed_count > 0 {
            info!("Cleaned up {} expired dashboard sessions", removed_count);
        }
        removed_count
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
