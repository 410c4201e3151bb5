//! `/api/tasks`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use super::body::{JsonBody, as_integer, trimmed_string};
use super::params::{id_filter, path_id, positive_or};
use crate::error::{ApiError, ApiResult};
use crate::pagination::{DEFAULT_LIMIT, Page};
use crate::types::{EntityKind, NewTask, Task, TaskFilter, TaskPatch, TaskStatus};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).patch(update_task).delete(delete_task))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
    status: Option<String>,
    #[serde(rename = "projectId")]
    project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailQuery {
    include: Option<String>,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Page<Task>> {
    let filter = TaskFilter {
        status: query.status.filter(|s| !s.is_empty()),
        project_id: id_filter(query.project_id.as_deref()),
    };
    let page = positive_or(query.page.as_deref(), 1);
    let limit = positive_or(query.limit.as_deref(), DEFAULT_LIMIT);
    Json(state.store.list_tasks(&filter, page, limit))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Response> {
    let id = path_id(&id);
    if query.include.as_deref() == Some("all") {
        Ok(Json(state.store.get_task_detail(id)?).into_response())
    } else {
        Ok(Json(state.store.get_task(id)?).into_response())
    }
}

const ASSIGNEE_ERROR: &str = "assigneeId must be an integer or null";

fn required_project_id(body: &JsonBody) -> ApiResult<i64> {
    body.truthy("projectId").and_then(as_integer).ok_or_else(|| {
        ApiError::missing_field("projectId", "projectId is required and must be an integer")
    })
}

/// Remaining fields of a new task, read once the project is known to exist.
fn parse_new_task(body: &JsonBody, project_id: i64) -> ApiResult<NewTask> {
    let title = body
        .field("title")
        .and_then(trimmed_string)
        .ok_or_else(|| ApiError::missing_field("title", "Title is required"))?;

    // Unknown or missing statuses fall back to todo.
    let status = body
        .field("status")
        .and_then(|v| v.as_str())
        .and_then(TaskStatus::parse)
        .unwrap_or_default();

    let assignee_id = match body.field("assigneeId").filter(|v| !v.is_null()) {
        Some(v) => {
            let id =
                as_integer(v).ok_or_else(|| ApiError::invalid_value("assigneeId", ASSIGNEE_ERROR))?;
            (id != 0).then_some(id)
        }
        None => None,
    };

    Ok(NewTask {
        project_id,
        title,
        status,
        assignee_id,
    })
}

fn parse_task_patch(body: &JsonBody) -> ApiResult<TaskPatch> {
    let title = body
        .field("title")
        .map(|v| {
            trimmed_string(v)
                .ok_or_else(|| ApiError::invalid_value("title", "Title must be a non-empty string"))
        })
        .transpose()?;

    let status = body
        .field("status")
        .map(|v| {
            v.as_str().and_then(TaskStatus::parse).ok_or_else(|| {
                ApiError::invalid_value(
                    "status",
                    format!("Status must be one of: {}", TaskStatus::valid_list()),
                )
            })
        })
        .transpose()?;

    let assignee_id = body
        .field("assigneeId")
        .map(|v| {
            if v.is_null() {
                Ok(None)
            } else {
                as_integer(v)
                    .map(Some)
                    .ok_or_else(|| ApiError::invalid_value("assigneeId", ASSIGNEE_ERROR))
            }
        })
        .transpose()?;

    let project_id = body
        .field("projectId")
        .map(|v| {
            as_integer(v)
                .ok_or_else(|| ApiError::invalid_value("projectId", "projectId must be an integer"))
        })
        .transpose()?;

    Ok(TaskPatch {
        title,
        status,
        assignee_id,
        project_id,
    })
}

async fn create_task(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let project_id = required_project_id(&body)?;
    state.store.ensure_exists(EntityKind::Project, project_id)?;
    let input = parse_new_task(&body, project_id)?;
    let task = state.store.create_task(input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<Task>> {
    let id = path_id(&id);
    state.store.ensure_exists(EntityKind::Task, id)?;
    let patch = parse_task_patch(&body)?;
    state.store.update_task(id, patch).map(Json)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_task(path_id(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_task_defaults() {
        let input = parse_new_task(&JsonBody(json!({"projectId": 1, "title": " Write docs "})), 1).unwrap();
        assert_eq!(input.project_id, 1);
        assert_eq!(input.title, "Write docs");
        assert_eq!(input.status, TaskStatus::Todo);
        assert_eq!(input.assignee_id, None);
    }

    #[test]
    fn test_new_task_unknown_status_is_todo() {
        let input = parse_new_task(&JsonBody(json!({"title": "x", "status": "done"})), 1).unwrap();
        assert_eq!(input.status, TaskStatus::Todo);
    }

    #[test]
    fn test_new_task_project_id_rules() {
        for project_id in [json!(0), json!("1"), json!(1.5), json!(null)] {
            let err = required_project_id(&JsonBody(json!({"projectId": project_id, "title": "x"})))
                .unwrap_err();
            assert_eq!(err.message, "projectId is required and must be an integer");
        }
    }

    #[test]
    fn test_new_task_assignee_rules() {
        let input =
            parse_new_task(&JsonBody(json!({"title": "x", "assigneeId": 0})), 1).unwrap();
        assert_eq!(input.assignee_id, None);

        let err =
            parse_new_task(&JsonBody(json!({"title": "x", "assigneeId": "2"})), 1).unwrap_err();
        assert_eq!(err.message, ASSIGNEE_ERROR);
    }

    #[test]
    fn test_patch_status_message_lists_statuses() {
        let err = parse_task_patch(&JsonBody(json!({"status": "done"}))).unwrap_err();
        assert_eq!(
            err.message,
            "Status must be one of: todo, in-progress, completed, blocked"
        );
    }

    #[test]
    fn test_patch_null_assignee_clears() {
        let patch = parse_task_patch(&JsonBody(json!({"assigneeId": null}))).unwrap();
        assert_eq!(patch.assignee_id, Some(None));

        let patch = parse_task_patch(&JsonBody(json!({}))).unwrap();
        assert_eq!(patch.assignee_id, None);
    }

    #[test]
    fn test_patch_rejects_bad_project_id() {
        let err = parse_task_patch(&JsonBody(json!({"projectId": "2"}))).unwrap_err();
        assert_eq!(err.message, "projectId must be an integer");
    }
}
