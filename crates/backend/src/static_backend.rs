//! In-memory [`BackendApi`] with failure injection.
//!
//! Serves canned JSON per collection. Unset list collections answer with an
//! empty array; unset aggregates answer 404. A collection can be made to
//! fail permanently or for its next `n` calls, which is how the resolver's
//! retry and fallback paths are exercised.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::BackendApi;
use crate::collection::{Collection, ListQuery};
use crate::error::BackendError;

#[derive(Debug, Clone, Copy)]
enum Failure {
    Always,
    Times(usize),
}

#[derive(Debug, Default)]
struct State {
    data: HashMap<Collection, Value>,
    failures: HashMap<Collection, Failure>,
    calls: HashMap<Collection, usize>,
}

#[derive(Debug, Default)]
pub struct StaticBackend {
    state: Mutex<State>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StaticBackend::set`].
    pub fn with(self, collection: Collection, body: Value) -> Self {
        self.set(collection, body);
        self
    }

    /// Builder form of [`StaticBackend::fail`].
    pub fn failing(self, collection: Collection) -> Self {
        self.fail(collection);
        self
    }

    /// Replace the body served for `collection`.
    pub fn set(&self, collection: Collection, body: Value) {
        self.lock().data.insert(collection, body);
    }

    /// Make every call to `collection` fail.
    pub fn fail(&self, collection: Collection) {
        self.lock().failures.insert(collection, Failure::Always);
    }

    /// Make the next `times` calls to `collection` fail.
    pub fn fail_times(&self, collection: Collection, times: usize) {
        self.lock()
            .failures
            .insert(collection, Failure::Times(times));
    }

    /// Stop injecting failures for `collection`.
    pub fn recover(&self, collection: Collection) {
        self.lock().failures.remove(&collection);
    }

    /// How many calls `collection` has received, failed ones included.
    pub fn calls(&self, collection: Collection) -> usize {
        self.lock().calls.get(&collection).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind, so the
        // poisoned guard is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call, then apply any injected failure.
    fn enter(&self, collection: Collection) -> Result<Option<Value>, BackendError> {
        let mut state = self.lock();
        *state.calls.entry(collection).or_insert(0) += 1;

        match state.failures.get(&collection).copied() {
            Some(Failure::Always) => {
                return Err(BackendError::Unavailable(format!("{collection} is failing")));
            }
            Some(Failure::Times(n)) if n > 0 => {
                state.failures.insert(collection, Failure::Times(n - 1));
                return Err(BackendError::Unavailable(format!("{collection} is failing")));
            }
            _ => {}
        }
        Ok(state.data.get(&collection).cloned())
    }
}

fn not_found(what: String) -> BackendError {
    BackendError::Api {
        status: 404,
        body: format!("{what} not found"),
    }
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

#[async_trait]
impl BackendApi for StaticBackend {
    async fn list_raw(
        &self,
        collection: Collection,
        _query: &ListQuery,
    ) -> Result<Value, BackendError> {
        match self.enter(collection)? {
            Some(body) => Ok(body),
            None if collection.is_aggregate() => Err(not_found(collection.to_string())),
            None => Ok(Value::Array(Vec::new())),
        }
    }

    async fn get_raw(&self, collection: Collection, id: &str) -> Result<Value, BackendError> {
        let body = self
            .enter(collection)?
            .ok_or_else(|| not_found(format!("{collection}/{id}")))?;
        let records = match body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        match records {
            Value::Array(items) => items
                .into_iter()
                .find(|r| id_matches(r, id))
                .ok_or_else(|| not_found(format!("{collection}/{id}"))),
            _ => Err(not_found(format!("{collection}/{id}"))),
        }
    }
}
