pub mod handlers;
pub mod middleware;

pub use middleware::{SESSION_COOKIE, require_session, session_token};
