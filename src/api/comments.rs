//! `/api/comments`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use super::body::{JsonBody, as_integer, trimmed_string};
use super::params::{id_filter, path_id};
use crate::error::{ApiError, ApiResult};
use crate::types::{Comment, EntityKind, NewComment};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route(
            "/{id}",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "taskId")]
    task_id: Option<String>,
}

async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Comment>> {
    Json(state.store.list_comments(id_filter(query.task_id.as_deref())))
}

async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Comment>> {
    state.store.get_comment(path_id(&id)).map(Json)
}

fn required_id(body: &JsonBody, key: &str, message: &str) -> ApiResult<i64> {
    body.truthy(key)
        .and_then(as_integer)
        .ok_or_else(|| ApiError::missing_field(key, message))
}

/// Read a new comment, checking each reference as soon as it is parsed.
fn parse_new_comment(
    body: &JsonBody,
    exists: impl Fn(EntityKind, i64) -> ApiResult<()>,
) -> ApiResult<NewComment> {
    let task_id = required_id(body, "taskId", "taskId is required and must be an integer")?;
    exists(EntityKind::Task, task_id)?;
    let user_id = required_id(body, "userId", "userId is required and must be an integer")?;
    exists(EntityKind::User, user_id)?;
    let content = body
        .field("content")
        .and_then(trimmed_string)
        .ok_or_else(|| ApiError::missing_field("content", "Content is required"))?;
    Ok(NewComment {
        task_id,
        user_id,
        content,
    })
}

async fn create_comment(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let input = parse_new_comment(&body, |kind, id| state.store.ensure_exists(kind, id))?;
    let comment = state.store.create_comment(input)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<Comment>> {
    let id = path_id(&id);
    state.store.ensure_exists(EntityKind::Comment, id)?;
    let content = body
        .field("content")
        .map(|v| {
            trimmed_string(v).ok_or_else(|| {
                ApiError::invalid_value("content", "Content must be a non-empty string")
            })
        })
        .transpose()?;
    state.store.update_comment(id, content).map(Json)
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_comment(path_id(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_exist(_: EntityKind, _: i64) -> ApiResult<()> {
        Ok(())
    }

    #[test]
    fn test_shape_checks_in_order() {
        let err = parse_new_comment(&JsonBody(json!({"userId": 1, "content": "x"})), all_exist)
            .unwrap_err();
        assert_eq!(err.message, "taskId is required and must be an integer");

        let err = parse_new_comment(&JsonBody(json!({"taskId": 1, "content": "x"})), all_exist)
            .unwrap_err();
        assert_eq!(err.message, "userId is required and must be an integer");

        let err = parse_new_comment(
            &JsonBody(json!({"taskId": 1, "userId": 1, "content": " "})),
            all_exist,
        )
        .unwrap_err();
        assert_eq!(err.message, "Content is required");
    }

    #[test]
    fn test_references_checked_between_fields() {
        let missing = |kind: EntityKind, id: i64| {
            if id == 99 {
                Err(ApiError::not_found(kind))
            } else {
                Ok(())
            }
        };

        // Unknown task wins over the missing userId.
        let err = parse_new_comment(&JsonBody(json!({"taskId": 99})), missing).unwrap_err();
        assert_eq!(err.message, "Task not found");

        // Unknown user wins over the missing content.
        let err = parse_new_comment(&JsonBody(json!({"taskId": 1, "userId": 99})), missing)
            .unwrap_err();
        assert_eq!(err.message, "User not found");
    }

    #[test]
    fn test_content_is_trimmed() {
        let input = parse_new_comment(
            &JsonBody(json!({"taskId": 1, "userId": 2, "content": " hi "})),
            all_exist,
        )
        .unwrap();
        assert_eq!(input.content, "hi");
    }
}
