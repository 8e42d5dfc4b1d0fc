use axum::routing::{get, post};
use axum::Router;

use crate::handlers::gantt;
use crate::state::AppState;

/// Gantt routes mounted at `/gantt`.
///
/// ```text
/// POST /layout          -> layout
/// GET  /projects/{id}   -> project_layout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/layout", post(gantt::layout))
        .route("/projects/{id}", get(gantt::project_layout))
}
