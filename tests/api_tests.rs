//! Router-level tests.
//!
//! Requests are driven through the full router with `tower::ServiceExt`, with
//! latency and fault injection switched off so every response comes from the
//! handlers.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_task_api::api::{AppState, build_router};
use mock_task_api::store::Store;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper to build a router over a fresh fixture store.
fn setup_app() -> Router {
    build_router(AppState::without_faults(Store::seeded()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

mod general_tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let app = setup_app();
        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn unknown_route() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/nothing-here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Route not found"}));
    }

    #[tokio::test]
    async fn malformed_json_body() {
        let app = setup_app();
        let (status, body) = send_raw(&app, "POST", "/api/users", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn cors_headers_present() {
        let app = setup_app();
        let request = Request::builder()
            .uri("/api/users")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn serves_over_tcp() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let state = AppState::without_faults(Store::seeded());
        let handle = mock_task_api::api::start_server(state, "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();

        let mut stream = tokio::net::TcpStream::connect(handle.addr()).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#""status":"ok""#));

        handle.shutdown().await;
    }
}

mod user_tests {
    use super::*;

    #[tokio::test]
    async fn crud_cycle() {
        let app = setup_app();

        let (status, created) = send(&app, "POST", "/api/users", Some(json!({"name": "  Dana "}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created, json!({"id": 4, "name": "Dana"}));

        let (status, updated) =
            send(&app, "PATCH", "/api/users/4", Some(json!({"name": "Dana S."}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Dana S.");

        let (status, body) = send(&app, "DELETE", "/api/users/4", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = get(&app, "/api/users/4").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "User not found"}));
    }

    #[tokio::test]
    async fn lenient_path_ids() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/users/2abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Bob Smith");

        let (status, _) = get(&app, "/api/users/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn name_validation() {
        let app = setup_app();
        let (status, body) = send(&app, "POST", "/api/users", Some(json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Name is required"}));

        let (status, body) = send(&app, "POST", "/api/users", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name is required");

        let (status, body) = send(&app, "PATCH", "/api/users/1", Some(json!({"name": 7}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name must be a non-empty string");
    }

    #[tokio::test]
    async fn patch_missing_user_is_not_found() {
        let app = setup_app();
        let (status, body) = send(&app, "PATCH", "/api/users/99", Some(json!({"name": 7}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }
}

mod project_tests {
    use super::*;

    #[tokio::test]
    async fn include_task_count_flag() {
        let app = setup_app();
        let (_, body) = get(&app, "/api/projects?includeTaskCount=true").await;
        assert_eq!(body[0]["taskCount"], 3);
        assert_eq!(body[0]["ownerId"], 1);

        let (_, body) = get(&app, "/api/projects?includeTaskCount=yes").await;
        assert!(body[0].get("taskCount").is_none());
    }

    #[tokio::test]
    async fn projects_by_owner() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/projects/users/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = get(&app, "/api/projects/users/0").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");

        // Existence of the owner is not checked.
        let (status, body) = get(&app, "/api/projects/users/99").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_project_shapes() {
        let app = setup_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/projects",
            Some(json!({"name": "Apollo", "ownerId": 0, "description": null})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"id": 4, "name": "Apollo", "description": "", "ownerId": null})
        );

        let (status, body) = send(
            &app,
            "POST",
            "/api/projects",
            Some(json!({"name": "Apollo", "ownerId": "3"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ownerId must be an integer");

        let (_, activity) = get(&app, "/api/activity?limit=1").await;
        assert_eq!(activity["data"][0]["type"], "project_created");
    }

    #[tokio::test]
    async fn delete_cascades() {
        let app = setup_app();
        let (status, _) = send(&app, "DELETE", "/api/projects/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = get(&app, "/api/projects/1/tasks").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project not found");

        let (status, _) = get(&app, "/api/tasks/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get(&app, "/api/comments/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn page_tasks() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/projects/1/page-tasks?page=2&limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        let (_, body) = get(&app, "/api/projects/1/page-tasks?page=5&limit=2").await;
        assert_eq!(body["items"], json!([]));

        let (_, body) = get(&app, "/api/projects/1/page-tasks?page=0&limit=x").await;
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["items"].as_array().unwrap().len(), 3);

        let (status, body) = get(&app, "/api/projects/1/page-tasks?page=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Page and limit must be positive numbers");
    }

    #[tokio::test]
    async fn patch_owner_must_be_integer() {
        let app = setup_app();
        let (status, body) =
            send(&app, "PATCH", "/api/projects/1", Some(json!({"ownerId": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ownerId must be an integer");

        let (status, body) =
            send(&app, "PATCH", "/api/projects/1", Some(json!({"ownerId": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ownerId"], 3);
    }

    #[tokio::test]
    async fn patch_missing_project_is_not_found() {
        let app = setup_app();
        let (status, body) =
            send(&app, "PATCH", "/api/projects/99", Some(json!({"ownerId": null}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project not found");
    }
}

mod task_tests {
    use super::*;

    #[tokio::test]
    async fn create_task_defaults() {
        let app = setup_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"projectId": 1, "title": "Draft release notes"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "id": 7,
                "projectId": 1,
                "title": "Draft release notes",
                "status": "todo",
                "assigneeId": null
            })
        );

        let (_, activity) = get(&app, "/api/activity?limit=1").await;
        assert_eq!(activity["data"][0]["type"], "task_created");
        assert_eq!(activity["data"][0]["message"], "Task 'Draft release notes' was created");
    }

    #[tokio::test]
    async fn create_task_validation_order() {
        let app = setup_app();
        let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({"title": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "projectId is required and must be an integer");

        // The project is looked up before the title is read.
        let (status, body) =
            send(&app, "POST", "/api/tasks", Some(json!({"projectId": 42}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project not found");

        let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({"projectId": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title is required");

        let (status, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"projectId": 1, "title": "x", "assigneeId": "2"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "assigneeId must be an integer or null");
    }

    #[tokio::test]
    async fn patch_missing_task_is_not_found_before_body_checks() {
        let app = setup_app();
        let (status, body) =
            send(&app, "PATCH", "/api/tasks/999", Some(json!({"status": "bogus"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }

    #[tokio::test]
    async fn list_filters_and_pagination() {
        let app = setup_app();
        let (_, body) = get(&app, "/api/tasks?status=completed&projectId=2").await;
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4]);

        let (_, body) = get(&app, "/api/tasks?page=2&limit=4").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["pagination"],
            json!({
                "page": 2,
                "limit": 4,
                "total": 6,
                "totalPages": 2,
                "hasNext": false,
                "hasPrev": true
            })
        );

        let (_, body) = get(&app, "/api/tasks?page=0&limit=-3&projectId=0&status=").await;
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["total"], 6);
    }

    #[tokio::test]
    async fn include_all() {
        let app = setup_app();
        let (_, body) = get(&app, "/api/tasks/3?include=all").await;
        assert_eq!(body["project"]["name"], "E-commerce Platform");
        assert_eq!(body["assignee"], Value::Null);
        assert_eq!(body["comments"], json!([]));

        let (_, body) = get(&app, "/api/tasks/1?include=all").await;
        assert_eq!(body["assignee"]["id"], 1);
        assert_eq!(body["comments"].as_array().unwrap().len(), 2);

        let (_, body) = get(&app, "/api/tasks/1").await;
        assert!(body.get("comments").is_none());
    }

    #[tokio::test]
    async fn patch_status_change_and_validation() {
        let app = setup_app();
        let (status, body) =
            send(&app, "PATCH", "/api/tasks/2", Some(json!({"status": "blocked"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "blocked");

        let (_, activity) = get(&app, "/api/activity?limit=1").await;
        assert_eq!(
            activity["data"][0]["message"],
            "Task 'Implement shopping cart' status changed from todo to blocked"
        );

        let (status, body) =
            send(&app, "PATCH", "/api/tasks/2", Some(json!({"status": "done"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Status must be one of: todo, in-progress, completed, blocked"
        );

        let (status, body) =
            send(&app, "PATCH", "/api/tasks/2", Some(json!({"projectId": 9}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project not found");
    }

    #[tokio::test]
    async fn delete_task_then_fetch() {
        let app = setup_app();
        let (status, _) = send(&app, "DELETE", "/api/tasks/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = get(&app, "/api/tasks/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
        let (_, comments) = get(&app, "/api/comments?taskId=1").await;
        assert_eq!(comments, json!([]));
    }
}

mod comment_tests {
    use super::*;

    #[tokio::test]
    async fn create_and_list() {
        let app = setup_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({"taskId": 3, "userId": 2, "content": " On it "})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
        assert_eq!(body["content"], "On it");
        assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));

        let (_, list) = get(&app, "/api/comments").await;
        assert_eq!(list[0]["id"], 5);

        let (_, list) = get(&app, "/api/comments?taskId=3").await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_references() {
        let app = setup_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({"taskId": 99, "userId": 1, "content": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");

        let (status, body) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({"taskId": 1, "userId": 99, "content": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn references_resolved_between_field_checks() {
        let app = setup_app();
        let (status, body) = send(&app, "POST", "/api/comments", Some(json!({"taskId": 999}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");

        let (status, body) = send(&app, "POST", "/api/comments", Some(json!({"taskId": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId is required and must be an integer");

        let (status, body) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({"taskId": 1, "userId": 99})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");

        let (status, body) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({"taskId": 1, "userId": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required");
    }

    #[tokio::test]
    async fn patch_missing_comment_is_not_found() {
        let app = setup_app();
        let (status, body) =
            send(&app, "PATCH", "/api/comments/999", Some(json!({"content": ""}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Comment not found");
    }

    #[tokio::test]
    async fn patch_content() {
        let app = setup_app();
        let (status, body) =
            send(&app, "PATCH", "/api/comments/1", Some(json!({"content": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content must be a non-empty string");

        let (status, body) =
            send(&app, "PATCH", "/api/comments/1", Some(json!({"content": "Edited"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Edited");
    }
}

mod activity_tests {
    use super::*;

    #[tokio::test]
    async fn offset_then_cursor() {
        let app = setup_app();
        let (_, first) = get(&app, "/api/activity?page=1&limit=3").await;
        assert_eq!(first["pagination"]["total"], 7);
        assert_eq!(first["pagination"]["hasNext"], true);
        let last_id = first["data"][2]["id"].as_i64().unwrap();

        let (_, next) = get(&app, &format!("/api/activity?cursor={last_id}&limit=3&page=9")).await;
        assert_eq!(next["data"].as_array().unwrap().len(), 3);
        assert_eq!(next["hasMore"], true);
        assert!(next["nextCursor"].is_i64());
        assert!(next.get("pagination").is_none());
    }

    #[tokio::test]
    async fn unknown_cursor() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/activity?cursor=999999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": [], "nextCursor": null, "hasMore": false}));

        let (_, body) = get(&app, "/api/activity?cursor=abc").await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn entry_by_id() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/activity/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "project_created");

        let (status, body) = get(&app, "/api/activity/500").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Activity not found");
    }
}

mod metric_tests {
    use super::*;

    #[tokio::test]
    async fn live_vs_stored() {
        let app = setup_app();
        send(
            &app,
            "PATCH",
            "/api/tasks/2",
            Some(json!({"status": "completed"})),
        )
        .await;

        let (_, live) = get(&app, "/api/metrics").await;
        assert_eq!(live[1], json!({"id": 2, "name": "completed_tasks", "value": 2}));

        let (_, stored) = get(&app, "/api/metrics/completed_tasks").await;
        assert_eq!(stored["value"], 1);

        let (status, body) = get(&app, "/api/metrics/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Metric not found");
    }
}

mod search_tests {
    use super::*;

    #[tokio::test]
    async fn finds_cart() {
        let app = setup_app();
        let (status, body) = get(&app, "/api/search?q=%20CART%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "cart");
        assert_eq!(body["total"], 1);
        assert_eq!(body["results"]["tasks"][0]["title"], "Implement shopping cart");
    }

    #[tokio::test]
    async fn type_restricts_collections() {
        let app = setup_app();
        let (_, body) = get(&app, "/api/search?q=o&type=users").await;
        assert_eq!(body["results"]["tasks"], json!([]));
        assert_eq!(body["results"]["users"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn blank_query_rejected() {
        let app = setup_app();
        for uri in ["/api/search", "/api/search?q=%20%20"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Search query (q) is required"}));
        }
    }
}
