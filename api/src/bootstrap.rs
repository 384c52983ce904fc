use std::sync::Arc;

use anyhow::Result;
use orchestrator::{HttpOrchestratorClient, OrchestratorClient, StaticOrchestratorClient};

use crate::{config::AppConfig, state::AppState};

pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let orchestrator: Arc<dyn OrchestratorClient> = if config.orchestrator_offline {
        tracing::warn!("ORCHESTRATOR_OFFLINE set, serving empty telemetry");
        Arc::new(StaticOrchestratorClient::offline(config.history_limit))
    } else {
        let client =
            HttpOrchestratorClient::new(&config.orchestrator_url, config.orchestrator_timeout)?;
        tracing::info!(
            orchestrator = %client.base_url(),
            timeout_secs = config.orchestrator_timeout.as_secs(),
            "orchestrator client ready"
        );
        Arc::new(client)
    };

    Ok(AppState::new(config.clone(), orchestrator))
}
