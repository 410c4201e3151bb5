//! `/api/metrics`

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use super::AppState;
use crate::error::ApiResult;
use crate::types::Metric;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_metrics))
        .route("/{name}", get(get_metric))
}

/// Recomputed from the live collections on every call.
async fn list_metrics(State(state): State<AppState>) -> Json<Vec<Metric>> {
    Json(state.store.live_metrics())
}

async fn get_metric(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Metric>> {
    state.store.get_metric(&name).map(Json)
}
