use axum::{extract::State, routing::get, Json, Router};
use domain::DashboardSnapshot;

use crate::{services::load_dashboard, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Everything the dashboard page renders in one response. Sections whose
/// upstream call failed come back as `null`.
async fn dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(load_dashboard(&state).await)
}
