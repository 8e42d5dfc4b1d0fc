//! Per-widget query lifecycle and the shared query cache.
//!
//! A query moves `idle -> loading -> ready`; a refresh or a context change
//! re-enters `loading`. Every dispatch takes a generation token and a
//! completion is applied only when its token is newer than the last applied
//! one, so a slow stale response can never overwrite fresher data.

use std::collections::HashMap;
use std::time::Duration;

use bizdash_core::types::{Date, Timestamp};
use bizdash_core::widget::WidgetType;
use chrono::{TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::context::WidgetContext;
use crate::resolver::{Resolved, WidgetResolver};

/// Monotonic dispatch counter, per query.
pub type Generation = u64;

/// Upper bound on cached queries; the least recently resolved is evicted.
const MAX_QUERIES: usize = 512;

/// Age after which cached live data is resolved again on request.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryPhase {
    Idle,
    Loading,
    Ready,
}

// ---------------------------------------------------------------------------
// Single query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WidgetQuery {
    widget_type: WidgetType,
    ctx: WidgetContext,
    /// Last generation handed out.
    latest: Generation,
    /// Generation of the data currently held.
    applied: Generation,
    /// Completions older than this belong to a previous context.
    floor: Generation,
    data: Option<Resolved>,
}

impl WidgetQuery {
    pub fn new(widget_type: WidgetType, ctx: WidgetContext) -> Self {
        Self {
            widget_type,
            ctx,
            latest: 0,
            applied: 0,
            floor: 0,
            data: None,
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    pub fn context(&self) -> &WidgetContext {
        &self.ctx
    }

    pub fn data(&self) -> Option<&Resolved> {
        self.data.as_ref()
    }

    pub fn phase(&self) -> QueryPhase {
        if self.latest == 0 {
            QueryPhase::Idle
        } else if self.applied < self.latest {
            QueryPhase::Loading
        } else {
            QueryPhase::Ready
        }
    }

    /// Start a fetch and return its token.
    pub fn dispatch(&mut self) -> Generation {
        self.latest += 1;
        self.latest
    }

    /// Switch to a new context (filters or config) and start a fetch.
    /// In-flight fetches for the old context are discarded on completion.
    pub fn set_context(&mut self, ctx: WidgetContext) -> Generation {
        self.ctx = ctx;
        let generation = self.dispatch();
        self.floor = generation;
        generation
    }

    /// Apply a finished fetch. Returns `false` when the result is stale.
    pub fn complete(&mut self, generation: Generation, resolved: Resolved) -> bool {
        if generation <= self.applied || generation < self.floor || generation > self.latest {
            tracing::debug!(
                widget_type = %self.widget_type,
                generation,
                applied = self.applied,
                "Discarding stale widget result"
            );
            return false;
        }
        self.applied = generation;
        self.data = Some(resolved);
        true
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Identity of a widget query: its type, config, filters and reference date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(widget_type: WidgetType, ctx: &WidgetContext) -> Self {
        let params =
            serde_json::to_string(&(&ctx.config, &ctx.filters, &ctx.today)).unwrap_or_default();
        Self(format!("{widget_type}:{params}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared widget queries, reused across dashboard requests and refreshed
/// in the background.
pub struct QueryCache {
    resolver: WidgetResolver,
    queries: RwLock<HashMap<QueryKey, WidgetQuery>>,
    max_age: TimeDelta,
}

impl QueryCache {
    pub fn new(resolver: WidgetResolver) -> Self {
        Self {
            resolver,
            queries: RwLock::new(HashMap::new()),
            max_age: TimeDelta::from_std(DEFAULT_MAX_AGE).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Serve cached live data for at most `max_age`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX);
        self
    }

    fn is_fresh(&self, resolved_at: Timestamp) -> bool {
        Utc::now().signed_duration_since(resolved_at) < self.max_age
    }

    pub fn resolver(&self) -> &WidgetResolver {
        &self.resolver
    }

    pub async fn len(&self) -> usize {
        self.queries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn phase(&self, key: &QueryKey) -> QueryPhase {
        self.queries
            .read()
            .await
            .get(key)
            .map(WidgetQuery::phase)
            .unwrap_or(QueryPhase::Idle)
    }

    /// Cached live data for the query, or a fresh resolution. Fallback
    /// results and results older than the max age are never served from
    /// cache.
    pub async fn get_or_resolve(&self, widget_type: WidgetType, ctx: WidgetContext) -> Resolved {
        let key = QueryKey::new(widget_type, &ctx);
        let cached = self
            .queries
            .read()
            .await
            .get(&key)
            .and_then(|q| {
                q.data()
                    .filter(|r| !r.is_fallback() && self.is_fresh(r.resolved_at))
                    .cloned()
            });
        match cached {
            Some(resolved) => resolved,
            None => self.resolve_now(key, widget_type, ctx).await,
        }
    }

    /// Resolve now, bypassing cached data.
    pub async fn refresh(&self, widget_type: WidgetType, ctx: WidgetContext) -> Resolved {
        let key = QueryKey::new(widget_type, &ctx);
        self.resolve_now(key, widget_type, ctx).await
    }

    /// Resolve a batch concurrently; results keep the input order.
    pub async fn resolve_many(
        &self,
        widgets: Vec<(WidgetType, WidgetContext)>,
        force: bool,
    ) -> Vec<Resolved> {
        let pending = widgets.into_iter().map(|(t, ctx)| async move {
            if force {
                self.refresh(t, ctx).await
            } else {
                self.get_or_resolve(t, ctx).await
            }
        });
        futures::future::join_all(pending).await
    }

    async fn resolve_now(&self, key: QueryKey, widget_type: WidgetType, ctx: WidgetContext) -> Resolved {
        let generation = {
            let mut queries = self.queries.write().await;
            if !queries.contains_key(&key) && queries.len() >= MAX_QUERIES {
                evict_oldest(&mut queries);
            }
            queries
                .entry(key.clone())
                .or_insert_with(|| WidgetQuery::new(widget_type, ctx.clone()))
                .dispatch()
        };

        let resolved = self.resolver.resolve(widget_type, &ctx).await;

        if let Some(query) = self.queries.write().await.get_mut(&key) {
            query.complete(generation, resolved.clone());
        }
        resolved
    }

    /// Re-resolve every cached query dated `today`. Queries for any other
    /// date are dropped; a later request for them resolves afresh.
    /// Returns how many results were applied.
    pub async fn refresh_all(&self, today: Date) -> usize {
        let jobs: Vec<(QueryKey, Generation, WidgetType, WidgetContext)> = {
            let mut queries = self.queries.write().await;
            let before = queries.len();
            queries.retain(|_, query| query.context().today == today);
            let dropped = before - queries.len();
            if dropped > 0 {
                tracing::debug!(dropped, %today, "Dropped widget queries for other dates");
            }
            queries
                .iter_mut()
                .map(|(key, query)| {
                    let generation = query.dispatch();
                    (key.clone(), generation, query.widget_type(), query.context().clone())
                })
                .collect()
        };
        if jobs.is_empty() {
            return 0;
        }

        let results = futures::future::join_all(
            jobs.iter()
                .map(|(_, _, widget_type, ctx)| self.resolver.resolve(*widget_type, ctx)),
        )
        .await;

        let mut queries = self.queries.write().await;
        jobs.into_iter()
            .zip(results)
            .filter(|((key, generation, _, _), resolved)| {
                queries
                    .get_mut(key)
                    .is_some_and(|q| q.complete(*generation, resolved.clone()))
            })
            .count()
    }
}

fn evict_oldest(queries: &mut HashMap<QueryKey, WidgetQuery>) {
    let oldest = queries
        .iter()
        .min_by_key(|(_, q)| q.data().map(|r| r.resolved_at))
        .map(|(k, _)| k.clone());
    if let Some(key) = oldest {
        queries.remove(&key);
    }
}
