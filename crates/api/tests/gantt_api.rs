//! Integration tests for the Gantt layout endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use bizdash_backend::{Collection, StaticBackend};
use common::{body_json, build_test_app, empty_app, get, post_json};
use serde_json::json;

fn may_request(tasks: serde_json::Value) -> serde_json::Value {
    json!({
        "tasks": tasks,
        "windowStart": "2026-05-01",
        "windowEnd": "2026-05-31",
        "today": "2026-05-15"
    })
}

// ---------------------------------------------------------------------------
// Test: POST /gantt/layout positions supplied tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tasks_inside_the_window_get_bars() {
    let app = empty_app();
    let tasks = json!([
        { "id": "t1", "title": "Maquettes", "startDate": "2026-05-04", "dueDate": "2026-05-08",
          "createdAt": "2026-04-20", "status": "in_progress", "priority": "high" },
        { "id": "t2", "title": "Ancien", "startDate": "2026-01-04", "dueDate": "2026-01-08",
          "createdAt": "2026-01-01", "status": "done", "priority": "low" }
    ]);
    let response = post_json(&app, "/api/v1/gantt/layout", may_request(tasks)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let layout = &json["data"];
    assert_eq!(layout["totalDays"], 31);

    let rows = layout["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["task"]["id"], "t1");

    let left = rows[0]["bar"]["left"].as_f64().unwrap();
    let width = rows[0]["bar"]["width"].as_f64().unwrap();
    assert!(left >= 0.0 && left + width <= 100.0);

    let today = layout["today"].as_f64().unwrap();
    assert!(today > 0.0 && today < 100.0);
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let app = empty_app();
    let body = json!({ "tasks": [], "windowStart": "2026-05-31", "windowEnd": "2026-05-01" });
    let response = post_json(&app, "/api/v1/gantt/layout", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn today_outside_window_has_no_marker() {
    let app = empty_app();
    let body = json!({
        "tasks": [], "windowStart": "2026-05-01", "windowEnd": "2026-05-31", "today": "2026-07-01"
    });
    let json = body_json(post_json(&app, "/api/v1/gantt/layout", body).await).await;

    assert!(json["data"]["today"].is_null());
    assert_eq!(json["data"]["rows"], json!([]));
}

// ---------------------------------------------------------------------------
// Test: GET /gantt/projects/{id} reads the backend
// ---------------------------------------------------------------------------

fn project_backend() -> Arc<StaticBackend> {
    Arc::new(
        StaticBackend::new()
            .with(
                Collection::Projects,
                json!([
                    { "id": 5, "name": "Site web", "status": "active", "end_date": "2026-05-29",
                      "created_at": "2026-04-01T08:00:00Z" }
                ]),
            )
            .with(
                Collection::ProjectTasks,
                json!([
                    { "id": 1, "project_id": 5, "title": "Maquettes", "status": "todo",
                      "start_date": "2026-05-04", "due_date": "2026-05-08",
                      "created_at": "2026-04-02T08:00:00Z" },
                    { "id": 2, "project_id": 6, "title": "Autre projet", "status": "todo",
                      "start_date": "2026-05-04", "due_date": "2026-05-08",
                      "created_at": "2026-04-02T08:00:00Z" }
                ]),
            ),
    )
}

#[tokio::test]
async fn project_chart_includes_its_tasks_and_deadline() {
    let app = build_test_app(project_backend());
    let response = get(
        &app,
        "/api/v1/gantt/projects/5?start=2026-05-01&end=2026-05-31&today=2026-05-15",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["task"]["id"], "1");
    assert_eq!(rows[1]["task"]["id"], "deadline-5");
    assert_eq!(rows[1]["task"]["kind"], "deadline");
}

#[tokio::test]
async fn missing_project_returns_404() {
    let app = build_test_app(project_backend());
    let response = get(&app, "/api/v1/gantt/projects/99").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn backend_failure_returns_502() {
    let backend = project_backend();
    backend.fail(Collection::ProjectTasks);
    let app = build_test_app(backend);
    let response = get(&app, "/api/v1/gantt/projects/5").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn half_open_window_is_rejected() {
    let app = build_test_app(project_backend());
    let response = get(&app, "/api/v1/gantt/projects/5?start=2026-05-01").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_weeks_are_rejected() {
    let app = build_test_app(project_backend());
    for weeks in ["0", "53", "4294967295"] {
        let uri = format!("/api/v1/gantt/projects/5?weeks={weeks}&today=2026-05-15");
        let response = get(&app, &uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "weeks={weeks}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn year_long_window_is_accepted() {
    let app = build_test_app(project_backend());
    let response = get(&app, "/api/v1/gantt/projects/5?weeks=52&today=2026-05-15").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["totalDays"], 364);
}

#[tokio::test]
async fn oversized_estimate_still_gets_a_bar() {
    let app = empty_app();
    let tasks = json!([
        { "id": "t1", "title": "Refonte", "dueDate": "2026-05-20", "createdAt": "2026-05-02",
          "estimatedHours": 1.0e12, "status": "todo", "priority": "medium" }
    ]);
    let response = post_json(&app, "/api/v1/gantt/layout", may_request(tasks)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["rows"].as_array().unwrap().len(), 1);
}
