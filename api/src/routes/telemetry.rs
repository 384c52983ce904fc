use axum::{extract::State, routing::get, Json, Router};
use domain::CompoundingView;
use serde_json::Value;

use crate::{
    error::ApiResult,
    services::{load_compounding, proxy_get, snapshot_with_history},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/telemetry/metrics", get(queue_metrics))
        .route("/telemetry/trading", get(trading))
        .route("/telemetry/strategies", get(strategies))
        .route("/telemetry/compounding", get(compounding))
}

async fn queue_metrics(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(proxy_get(&state, "/telemetry/metrics").await?))
}

async fn trading(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(snapshot_with_history(&state, "/telemetry/trading").await?))
}

async fn strategies(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(
        snapshot_with_history(&state, "/telemetry/strategies").await?,
    ))
}

async fn compounding(State(state): State<AppState>) -> Json<CompoundingView> {
    Json(load_compounding(&state).await)
}
