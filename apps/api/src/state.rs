use std::sync::Arc;

use crate::config::Config;
use crate::model_client::TextGenerator;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: HTTP `ModelClient`.
    pub generator: Arc<dyn TextGenerator>,
    /// Pluggable session store. Redis when `REDIS_URL` is set, memory otherwise.
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
}
