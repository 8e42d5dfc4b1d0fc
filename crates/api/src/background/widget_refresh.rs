//! Periodic refresh of cached widget data.
//!
//! Re-resolves every widget query the cache holds for the current local
//! date, so dashboards opened after the interval get data no older than one
//! period. Queries for earlier dates are dropped on the first tick after
//! midnight. Runs on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use bizdash_widgets::QueryCache;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::query::local_today;

/// Run the widget refresh loop until `cancel` is triggered.
///
/// The first tick fires one full `period` after start; the cache is empty
/// at boot so there is nothing to refresh earlier.
pub async fn run(cache: Arc<QueryCache>, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = period.as_secs(),
        "Widget refresh job started"
    );

    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Widget refresh job stopping");
                break;
            }
            _ = interval.tick() => {
                let applied = cache.refresh_all(local_today()).await;
                if applied > 0 {
                    tracing::info!(applied, "Widget refresh: cached queries updated");
                } else {
                    tracing::debug!("Widget refresh: nothing to update");
                }
            }
        }
    }
}
