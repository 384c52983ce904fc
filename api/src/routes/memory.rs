use axum::{extract::State, routing::get, routing::post, Json, Router};
use domain::MemoryWriteRequest;
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    services::{proxy_get, proxy_post},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/memory/projects", get(list_projects))
        .route("/memory/status", get(stack_status))
        .route("/memory/write", post(write_entry))
}

async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(proxy_get(&state, "/projects").await?))
}

async fn stack_status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(proxy_get(&state, "/status").await?))
}

async fn write_entry(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let request: MemoryWriteRequest = serde_json::from_value(body.clone())
        .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
    if let Some(field) = request.missing_field() {
        return Err(ApiError::MissingField(field));
    }
    tracing::info!(
        project = %request.project_name,
        file = %request.file_name,
        bytes = request.content.len(),
        "forwarding memory entry"
    );
    Ok(Json(proxy_post(&state, "/memory/write", &body).await?))
}
