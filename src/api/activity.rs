//! `/api/activity`
//!
//! The listing serves two modes. A non-empty `cursor` selects cursor mode
//! and ignores `page`; otherwise an offset page is returned.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use super::params::{parse_int, path_id, positive_or};
use crate::error::ApiResult;
use crate::pagination::{CursorPage, DEFAULT_LIMIT};
use crate::types::ActivityEntry;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activity))
        .route("/{id}", get(get_activity))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
    cursor: Option<String>,
}

async fn list_activity(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let limit = positive_or(query.limit.as_deref(), DEFAULT_LIMIT);

    match query.cursor.as_deref().filter(|c| !c.is_empty()) {
        Some(cursor) => {
            let page = match parse_int(cursor) {
                Some(cursor) => state.store.activity_after(cursor, limit),
                None => CursorPage::<ActivityEntry>::empty(),
            };
            Json(page).into_response()
        }
        None => {
            let page = positive_or(query.page.as_deref(), 1);
            Json(state.store.activity_page(page, limit)).into_response()
        }
    }
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActivityEntry>> {
    state.store.get_activity(path_id(&id)).map(Json)
}
