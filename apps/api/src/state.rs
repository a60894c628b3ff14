use std::sync::Arc;

use crate::ats::engine::AtsEngine;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable after startup; vocabulary regexes are compiled once here.
    pub engine: Arc<AtsEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: AtsEngine) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
        }
    }
}
