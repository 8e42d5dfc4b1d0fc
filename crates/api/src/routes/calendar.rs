use axum::routing::get;
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Calendar routes mounted at `/calendar`.
///
/// ```text
/// GET  /{year}   -> get_calendar
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{year}", get(calendar::get_calendar))
}
