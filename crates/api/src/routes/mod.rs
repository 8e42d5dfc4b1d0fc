pub mod calendar;
pub mod dashboards;
pub mod finance;
pub mod gantt;
pub mod health;
pub mod widgets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboards/{page}                          rendered page (placement + data)
/// /dashboards/{page}/layout                   get, replace, reset
/// /dashboards/{page}/layout/edits             move / resize gesture
/// /dashboards/{page}/layout/widgets           add widget
/// /dashboards/{page}/layout/widgets/{id}      remove widget
///
/// /widgets/types                              widget catalogue
/// /widgets/{type}                             single widget data
///
/// /gantt/layout                               position supplied tasks
/// /gantt/projects/{id}                        position a project's tasks
///
/// /calendar/{year}                            merged calendar events
///
/// /finance/bank-accounts                      formatted balances
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboards", dashboards::router())
        .nest("/widgets", widgets::router())
        .nest("/gantt", gantt::router())
        .nest("/calendar", calendar::router())
        .nest("/finance", finance::router())
}
