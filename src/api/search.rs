//! `/api/search`

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{SearchResults, SearchScope};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// The normalized (trimmed, lowercased) term.
    pub query: String,
    pub total: usize,
    pub results: SearchResults,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let term = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::missing_field("q", "Search query (q) is required"))?;

    let results = state
        .store
        .search(&term, SearchScope::from_param(query.kind.as_deref()));
    Ok(Json(SearchResponse {
        query: term,
        total: results.total(),
        results,
    }))
}
