use std::sync::Arc;

use patsim_session::protocol::Simulator;
use patsim_session::registry::SessionRegistry;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<Simulator>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator: Arc::new(simulator),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}
