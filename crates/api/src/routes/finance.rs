use axum::routing::get;
use axum::Router;

use crate::handlers::finance;
use crate::state::AppState;

/// Finance routes mounted at `/finance`.
///
/// ```text
/// GET  /bank-accounts   -> bank_accounts
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/bank-accounts", get(finance::bank_accounts))
}
