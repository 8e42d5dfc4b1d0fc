//! Viewer identity extractor for Axum handlers.
//!
//! Authentication happens upstream of this service; the gateway forwards
//! the authenticated user's id in the `x-viewer-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bizdash_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the viewer id.
pub const VIEWER_HEADER: &str = "x-viewer-id";

/// Longest accepted viewer id.
const MAX_VIEWER_LEN: usize = 128;

/// The viewer a request acts for. Layouts are scoped by this id.
///
/// ```ignore
/// async fn my_handler(viewer: Viewer) -> AppResult<Json<()>> {
///     tracing::info!(viewer = %viewer.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(VIEWER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {VIEWER_HEADER} header"
                )))
            })?;

        if raw.len() > MAX_VIEWER_LEN {
            return Err(AppError::BadRequest(format!(
                "{VIEWER_HEADER} must be at most {MAX_VIEWER_LEN} characters"
            )));
        }

        Ok(Viewer { id: raw.to_string() })
    }
}
