//! `/api/users`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::AppState;
use super::body::{JsonBody, trimmed_string};
use super::params::path_id;
use crate::error::{ApiError, ApiResult};
use crate::types::{EntityKind, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).patch(update_user).delete(delete_user))
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.list_users())
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    state.store.get_user(path_id(&id)).map(Json)
}

async fn create_user(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<(StatusCode, Json<User>)> {
    let name = body
        .field("name")
        .and_then(trimmed_string)
        .ok_or_else(|| ApiError::missing_field("name", "Name is required"))?;
    let user = state.store.create_user(name)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<User>> {
    let id = path_id(&id);
    state.store.ensure_exists(EntityKind::User, id)?;
    let name = body
        .field("name")
        .map(|v| {
            trimmed_string(v)
                .ok_or_else(|| ApiError::invalid_value("name", "Name must be a non-empty string"))
        })
        .transpose()?;
    state.store.update_user(id, name).map(Json)
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_user(path_id(&id))?;
    Ok(StatusCode::NO_CONTENT)
}
