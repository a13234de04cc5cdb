use std::sync::Arc;

use crate::config::Config;
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no connections: handlers open their own per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Config,
}
