pub mod calendar;
pub mod dashboards;
pub mod finance;
pub mod gantt;
pub mod layouts;
pub mod widgets;

use crate::error::{AppError, AppResult};

/// Run layout-store work on the blocking pool so file I/O never stalls the
/// async workers.
pub(crate) async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Blocking task failed: {e}")))?
}
