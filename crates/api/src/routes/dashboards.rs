//! Route definitions for dashboard pages and their layouts.
//!
//! Every route requires the `x-viewer-id` header.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{dashboards, layouts};
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboards`.
///
/// ```text
/// GET    /{page}                          -> get_dashboard
/// GET    /{page}/layout                   -> get_layout
/// PUT    /{page}/layout                   -> save_layout
/// DELETE /{page}/layout                   -> reset_layout
/// POST   /{page}/layout/edits             -> edit_layout
/// POST   /{page}/layout/widgets           -> add_widget
/// DELETE /{page}/layout/widgets/{id}      -> remove_widget
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{page}", get(dashboards::get_dashboard))
        .route(
            "/{page}/layout",
            get(layouts::get_layout)
                .put(layouts::save_layout)
                .delete(layouts::reset_layout),
        )
        .route("/{page}/layout/edits", post(layouts::edit_layout))
        .route("/{page}/layout/widgets", post(layouts::add_widget))
        .route("/{page}/layout/widgets/{id}", delete(layouts::remove_widget))
}
