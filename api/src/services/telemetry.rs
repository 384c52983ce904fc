use compounding::{compounding_view, normalize, project, HistorySeries, ProjectionOverrides};
use domain::{
    CompoundingView, DashboardSnapshot, QueueMetrics, Snapshot, StackStatus, StrategyMetrics,
    TradingMetrics,
};
use orchestrator::OrchestratorResult;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{config::AppConfig, state::AppState};

/// Entries shown in the dashboard's recent PnL list.
pub const RECENT_PNL_ENTRIES: usize = 5;

pub async fn proxy_get(state: &AppState, path: &str) -> OrchestratorResult<Value> {
    let result = state.orchestrator.get_json(path).await;
    record_outcome(path, result.is_ok());
    result
}

pub async fn proxy_post(state: &AppState, path: &str, body: &Value) -> OrchestratorResult<Value> {
    let result = state.orchestrator.post_json(path, body).await;
    record_outcome(path, result.is_ok());
    result
}

fn record_outcome(path: &str, ok: bool) {
    let route = path.split('?').next().unwrap_or(path).to_string();
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!("orchestrator_requests_total", "path" => route, "outcome" => outcome)
        .increment(1);
}

fn history_path(snapshot_path: &str, limit: usize) -> String {
    format!("{snapshot_path}/history?limit={limit}")
}

/// Fetches `snapshot_path` and its `/history` sibling together and returns
/// the snapshot object with the history list under `history`. Fails when
/// either request fails.
pub async fn snapshot_with_history(state: &AppState, snapshot_path: &str) -> OrchestratorResult<Value> {
    let history_uri = history_path(snapshot_path, state.config.history_limit);
    let (snapshot, history) = tokio::join!(
        proxy_get(state, snapshot_path),
        proxy_get(state, &history_uri)
    );
    Ok(merge_history(snapshot?, history?))
}

fn merge_history(snapshot: Value, history: Value) -> Value {
    let mut merged = match snapshot {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let entries = match history.get("history") {
        Some(list @ Value::Array(_)) => list.clone(),
        _ => Value::Array(Vec::new()),
    };
    merged.insert("history".to_string(), entries);
    Value::Object(merged)
}

async fn fetch_optional<T: DeserializeOwned>(state: &AppState, path: &str) -> Option<T> {
    match proxy_get(state, path).await {
        Ok(body) => decode(path, body),
        Err(err) => {
            tracing::warn!(error = %err, %path, "telemetry fetch failed, treating as absent");
            None
        }
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Option<T> {
    serde_json::from_value(body)
        .map_err(|err| tracing::warn!(error = %err, %path, "unexpected telemetry shape"))
        .ok()
}

/// History entries that fail to decode are dropped individually.
fn decode_history(body: &Value) -> Vec<Snapshot> {
    let Some(items) = body.get("history").and_then(Value::as_array) else {
        return Vec::new();
    };
    let entries: Vec<Snapshot> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();
    if entries.len() < items.len() {
        tracing::debug!(
            dropped = items.len() - entries.len(),
            "skipped malformed history entries"
        );
    }
    entries
}

/// Loads the trading snapshot and its history independently; whichever
/// request succeeds still contributes.
async fn load_trading(state: &AppState) -> Option<TradingMetrics> {
    let history_uri = history_path("/telemetry/trading", state.config.history_limit);
    let (snapshot, history) = tokio::join!(
        fetch_optional::<TradingMetrics>(state, "/telemetry/trading"),
        fetch_optional::<Value>(state, &history_uri)
    );
    let history = history.as_ref().map(decode_history);
    match (snapshot, history) {
        (None, None) => None,
        (snapshot, history) => {
            let mut trading = snapshot.unwrap_or_default();
            trading.history = history.unwrap_or_default();
            Some(trading)
        }
    }
}

pub fn compounding_view_for(
    trading: Option<&TradingMetrics>,
    config: &AppConfig,
) -> (HistorySeries, CompoundingView) {
    let series = normalize(trading.map(|t| t.history.as_slice()));
    let overrides = trading.map(ProjectionOverrides::from).unwrap_or_default();
    let projection = project(&series, overrides, &config.compounding);
    let view = compounding_view(&series, projection);
    (series, view)
}

pub async fn load_compounding(state: &AppState) -> CompoundingView {
    let trading = load_trading(state).await;
    compounding_view_for(trading.as_ref(), &state.config).1
}

pub async fn load_dashboard(state: &AppState) -> DashboardSnapshot {
    let (status, queue, trading, strategies) = tokio::join!(
        fetch_optional::<StackStatus>(state, "/status"),
        fetch_optional::<QueueMetrics>(state, "/telemetry/metrics"),
        load_trading(state),
        load_strategies(state)
    );
    let (series, compounding) = compounding_view_for(trading.as_ref(), &state.config);

    DashboardSnapshot {
        status,
        queue,
        trading,
        strategies,
        compounding,
        recent_pnl: series.recent(RECENT_PNL_ENTRIES),
    }
}

async fn load_strategies(state: &AppState) -> Option<StrategyMetrics> {
    match snapshot_with_history(state, "/telemetry/strategies").await {
        Ok(body) => decode("/telemetry/strategies", body),
        Err(err) => {
            tracing::warn!(error = %err, "strategy telemetry unavailable");
            None
        }
    }
}
