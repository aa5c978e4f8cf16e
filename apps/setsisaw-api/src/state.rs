//! Application state shared across all request handlers.

use setsisaw_auth::SessionManager;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Cloned for each request; the session manager sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    #[must_use]
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }
}
