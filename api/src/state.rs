use orchestrator::OrchestratorClient;
use std::sync::Arc;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: Arc<dyn OrchestratorClient>,
}

impl AppState {
    pub fn new(config: AppConfig, orchestrator: Arc<dyn OrchestratorClient>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}

// Ensure critical dependencies uphold Send/Sync for Axum state usage.
#[allow(dead_code)]
fn _assert_state_types_are_send_sync()
where
    AppConfig: Send + Sync + 'static,
    dyn OrchestratorClient: Send + Sync,
{
}

#[allow(dead_code)]
fn _assert_state_bounds() {
    fn assert_bounds<T: Clone + Send + Sync + 'static>() {}
    assert_bounds::<AppState>();
}
