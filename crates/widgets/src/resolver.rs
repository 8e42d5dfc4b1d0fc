//! Fetch with one retry, then fall back.

use std::sync::Arc;
use std::time::Duration;

use bizdash_backend::BackendApi;
use bizdash_core::types::Timestamp;
use bizdash_core::widget::WidgetType;
use serde::Serialize;

use crate::context::WidgetContext;
use crate::data::WidgetData;
use crate::registry::WidgetRegistry;

/// Pause between the first failed attempt and the retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Where a resolved payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

/// Outcome of resolving one widget. Always renderable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub source: DataSource,
    pub data: WidgetData,
    /// Fetch attempts made (1 or 2).
    pub attempts: u8,
    pub resolved_at: Timestamp,
}

impl Resolved {
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Resolves widget data against the backend.
///
/// Cheap to clone; clones share the backend and the registry.
#[derive(Clone)]
pub struct WidgetResolver {
    backend: Arc<dyn BackendApi>,
    registry: Arc<WidgetRegistry>,
    retry_delay: Duration,
}

impl WidgetResolver {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self {
            backend,
            registry: Arc::new(WidgetRegistry::new()),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Resolve one widget. Never fails: after a failed attempt and a failed
    /// retry the type's fallback is returned.
    pub async fn resolve(&self, widget_type: WidgetType, ctx: &WidgetContext) -> Resolved {
        let entry = self.registry.get(widget_type);

        let mut attempt: u8 = 1;
        loop {
            match (entry.fetch)(self.backend.as_ref(), ctx).await {
                Ok(data) => {
                    tracing::debug!(widget_type = %widget_type, attempt, "Widget resolved");
                    return Resolved {
                        widget_type,
                        source: DataSource::Live,
                        data,
                        attempts: attempt,
                        resolved_at: chrono::Utc::now(),
                    };
                }
                Err(e) if attempt == 1 => {
                    tracing::debug!(
                        widget_type = %widget_type,
                        transient = e.is_transient(),
                        error = %e,
                        "Widget fetch failed, retrying",
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        widget_type = %widget_type,
                        attempt,
                        error = %e,
                        "Widget fetch failed, using fallback",
                    );
                    return Resolved {
                        widget_type,
                        source: DataSource::Fallback,
                        data: (entry.fallback)(widget_type),
                        attempts: attempt,
                        resolved_at: chrono::Utc::now(),
                    };
                }
            }
        }
    }

    /// Resolve many widgets concurrently; results keep the input order.
    pub async fn resolve_all(&self, widgets: &[(WidgetType, WidgetContext)]) -> Vec<Resolved> {
        let pending = widgets.iter().map(|(t, ctx)| self.resolve(*t, ctx));
        futures::future::join_all(pending).await
    }
}

#[cfg(test)]
mod tests {
    use bizdash_backend::{Collection, StaticBackend};
    use bizdash_core::widget::{GoalConfig, WidgetConfig};
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::context::GlobalFilters;
    use crate::data::ClientsCountData;

    fn ctx() -> WidgetContext {
        WidgetContext::new(
            WidgetConfig::default(),
            GlobalFilters::default(),
            NaiveDate::from_ymd_opt(2026, 5, 14).unwrap(),
        )
    }

    fn resolver(backend: Arc<StaticBackend>) -> WidgetResolver {
        WidgetResolver::new(backend).with_retry_delay(Duration::ZERO)
    }

    fn client_stats() -> serde_json::Value {
        json!({
            "count": 120,
            "previous_count": 100,
            "new_this_month": 20,
            "active_count": 90,
            "previous_active_count": 0
        })
    }

    #[tokio::test]
    async fn live_data_is_returned_on_first_success() {
        let backend = Arc::new(StaticBackend::new().with(Collection::ClientStats, client_stats()));
        let resolved = resolver(backend.clone())
            .resolve(WidgetType::ClientsCount, &ctx())
            .await;

        assert_eq!(resolved.source, DataSource::Live);
        assert_eq!(resolved.attempts, 1);
        assert_eq!(
            resolved.data,
            WidgetData::ClientsCount(ClientsCountData {
                count: 120,
                growth: 20.0,
                previous_count: 100,
                new_this_month: 20,
                active_count: 90,
                active_growth: 0.0,
                previous_active_count: 0,
            })
        );
        assert_eq!(backend.calls(Collection::ClientStats), 1);
    }

    #[tokio::test]
    async fn a_single_failure_is_retried() {
        let backend = Arc::new(StaticBackend::new().with(Collection::ClientStats, client_stats()));
        backend.fail_times(Collection::ClientStats, 1);
        let resolved = resolver(backend.clone())
            .resolve(WidgetType::ClientsCount, &ctx())
            .await;

        assert_eq!(resolved.source, DataSource::Live);
        assert_eq!(resolved.attempts, 2);
        assert_eq!(backend.calls(Collection::ClientStats), 2);
    }

    #[tokio::test]
    async fn two_failures_yield_the_fallback() {
        let backend = Arc::new(StaticBackend::new().failing(Collection::ClientStats));
        let resolved = resolver(backend.clone())
            .resolve(WidgetType::ClientsCount, &ctx())
            .await;

        assert!(resolved.is_fallback());
        assert_eq!(resolved.data, WidgetData::fallback(WidgetType::ClientsCount));
        assert_eq!(backend.calls(Collection::ClientStats), 2);
    }

    #[tokio::test]
    async fn every_type_falls_back_when_the_backend_is_down() {
        let backend = StaticBackend::new();
        for collection in Collection::ALL {
            backend.fail(collection);
        }
        let resolver = resolver(Arc::new(backend));
        let config = WidgetConfig {
            goals: vec![GoalConfig {
                label: "Revenu".into(),
                metric: "revenue".into(),
                target: 50_000.0,
            }],
            ..WidgetConfig::default()
        };
        let ctx = WidgetContext::new(config, GlobalFilters::default(), ctx().today);

        for t in WidgetType::ALL {
            let resolved = resolver.resolve(t, &ctx).await;
            assert!(resolved.is_fallback(), "{t} did not fall back");
            assert_eq!(resolved.data, WidgetData::fallback(t), "{t} fallback shape");
            assert_eq!(resolved.attempts, 2);
        }
    }

    #[tokio::test]
    async fn unknown_kpi_metric_falls_back() {
        let resolver = resolver(Arc::new(StaticBackend::new()));
        let config = WidgetConfig {
            metric: Some("weather".into()),
            ..WidgetConfig::default()
        };
        let ctx = WidgetContext::new(config, GlobalFilters::default(), ctx().today);
        let resolved = resolver.resolve(WidgetType::KpiCustom, &ctx).await;
        assert!(resolved.is_fallback());
    }

    #[tokio::test]
    async fn resolve_all_keeps_input_order_and_isolates_failures() {
        let backend = Arc::new(
            StaticBackend::new()
                .with(Collection::ClientStats, client_stats())
                .failing(Collection::Projects),
        );
        let widgets = vec![
            (WidgetType::ProjectsStatus, ctx()),
            (WidgetType::ClientsCount, ctx()),
            (WidgetType::Tasks, ctx()),
        ];
        let resolved = resolver(backend).resolve_all(&widgets).await;

        let types: Vec<WidgetType> = resolved.iter().map(|r| r.widget_type).collect();
        assert_eq!(
            types,
            vec![WidgetType::ProjectsStatus, WidgetType::ClientsCount, WidgetType::Tasks]
        );
        assert!(resolved[0].is_fallback());
        assert_eq!(resolved[1].source, DataSource::Live);
        assert_eq!(resolved[2].source, DataSource::Live);
    }
}
