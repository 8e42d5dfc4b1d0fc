//! Integration tests for the per-viewer layout endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, empty_app, get, get_as, get_as_viewer, post_json, put_json};
use serde_json::json;

const MAIN_LAYOUT: &str = "/api/v1/dashboards/main/layout";

fn two_counters() -> serde_json::Value {
    json!([
        { "id": "a", "x": 0, "y": 0, "w": 3, "h": 2, "type": "kpi-custom", "config": { "metric": "clients" } },
        { "id": "b", "x": 3, "y": 0, "w": 3, "h": 2, "type": "employees-count" }
    ])
}

// ---------------------------------------------------------------------------
// Test: Viewer header and page validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn layout_requires_viewer_header() {
    let app = empty_app();
    let response = get(&app, MAIN_LAYOUT).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_page_returns_404() {
    let app = empty_app();
    let response = get_as(&app, "/api/v1/dashboards/sales/layout").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Defaults, save/load round trip, reset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_viewer_gets_default_layout() {
    let app = empty_app();
    let response = get_as(&app, MAIN_LAYOUT).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 8);
    assert_eq!(items[0]["id"], "stats");
    assert_eq!(items[0]["type"], "stats");
}

#[tokio::test]
async fn saved_layout_round_trips() {
    let app = empty_app();
    let saved = put_json(&app, MAIN_LAYOUT, two_counters()).await;
    assert_eq!(saved.status(), StatusCode::OK);

    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(json["data"], two_counters());
}

#[tokio::test]
async fn emptied_layout_stays_empty() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, json!([])).await;

    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn duplicate_ids_are_rejected() {
    let app = empty_app();
    let layout = json!([
        { "id": "a", "x": 0, "y": 0, "w": 3, "h": 2, "type": "stats" },
        { "id": "a", "x": 3, "y": 0, "w": 3, "h": 2, "type": "tasks" }
    ]);
    let response = put_json(&app, MAIN_LAYOUT, layout).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Nothing was stored.
    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn reset_restores_default_layout() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, two_counters()).await;

    let response = delete(&app, MAIN_LAYOUT).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reset = body_json(response).await;
    assert_eq!(reset["data"].as_array().unwrap().len(), 8);

    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(json["data"], reset["data"]);
}

#[tokio::test]
async fn layouts_are_scoped_by_viewer_and_page() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, two_counters()).await;

    let other_viewer = body_json(get_as_viewer(&app, MAIN_LAYOUT, "u2").await).await;
    assert_eq!(other_viewer["data"].as_array().unwrap().len(), 8);

    let other_page = body_json(get_as(&app, "/api/v1/dashboards/finance/layout").await).await;
    assert_eq!(other_page["data"][0]["id"], "performance");
}

// ---------------------------------------------------------------------------
// Test: Edit gestures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gestures_outside_edit_mode_are_forbidden() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, two_counters()).await;

    let edit = json!({ "editable": false, "edit": { "op": "move", "id": "a", "x": 9, "y": 0 } });
    let response = post_json(&app, "/api/v1/dashboards/main/layout/edits", edit).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(json["data"], two_counters());
}

#[tokio::test]
async fn move_gesture_is_persisted() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, two_counters()).await;

    let edit = json!({ "editable": true, "edit": { "op": "move", "id": "a", "x": 9, "y": 0 } });
    let response = post_json(&app, "/api/v1/dashboards/main/layout/edits", edit).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(json["data"][0]["id"], "a");
    assert_eq!(json["data"][0]["x"], 9);
    assert_eq!(json["data"][0]["y"], 0);
}

#[tokio::test]
async fn editing_a_missing_widget_returns_404() {
    let app = empty_app();
    let edit = json!({ "editable": true, "edit": { "op": "resize", "id": "nope", "w": 4, "h": 4 } });
    let response = post_json(&app, "/api/v1/dashboards/main/layout/edits", edit).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Adding and removing widgets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn added_widget_lands_below_existing_ones() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, two_counters()).await;

    let response = post_json(
        &app,
        "/api/v1/dashboards/main/layout/widgets",
        json!({ "type": "cash-flow", "config": { "months": 6 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let widget = &json["data"]["widget"];
    assert_eq!(widget["type"], "cash-flow");
    assert_eq!(widget["y"], 2);
    assert_eq!(widget["config"]["months"], 6);
    assert!(widget["id"].as_str().unwrap().starts_with("cash-flow-"));

    let stored = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(stored["data"].as_array().unwrap().len(), 3);
    assert_eq!(stored["data"][2], *widget);
}

#[tokio::test]
async fn unknown_widget_type_is_rejected() {
    let app = empty_app();
    let response = post_json(
        &app,
        "/api/v1/dashboards/main/layout/widgets",
        json!({ "type": "weather" }),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn removed_widget_is_gone() {
    let app = empty_app();
    put_json(&app, MAIN_LAYOUT, two_counters()).await;

    let response = delete(&app, "/api/v1/dashboards/main/layout/widgets/a").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "b");

    let missing = delete(&app, "/api/v1/dashboards/main/layout/widgets/a").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adding_to_a_full_dashboard_conflicts() {
    let app = empty_app();
    let full: Vec<serde_json::Value> = (0..64)
        .map(|i| json!({ "id": format!("w{i}"), "x": 0, "y": i, "w": 12, "h": 1, "type": "tasks" }))
        .collect();
    let saved = put_json(&app, MAIN_LAYOUT, json!(full)).await;
    assert_eq!(saved.status(), StatusCode::OK);

    let response = post_json(
        &app,
        "/api/v1/dashboards/main/layout/widgets",
        json!({ "type": "cash-flow" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    let stored = body_json(get_as(&app, MAIN_LAYOUT).await).await;
    assert_eq!(stored["data"].as_array().unwrap().len(), 64);
}
