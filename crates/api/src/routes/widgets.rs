use axum::routing::get;
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// Widget data routes mounted at `/widgets`.
///
/// ```text
/// GET  /types    -> list_types
/// GET  /{type}   -> get_widget
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/types", get(widgets::list_types))
        .route("/{type}", get(widgets::get_widget))
}
