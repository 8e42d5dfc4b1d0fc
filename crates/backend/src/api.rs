//! The backend seam the widget resolver reads through.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::collection::{Collection, ListQuery};
use crate::error::BackendError;

/// Read access to the business REST backend.
///
/// Implementations return raw JSON; the typed helpers ([`list`], [`get`],
/// [`fetch_one`]) unwrap `{ "data": ... }` envelopes and decode records.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET {collection}?{query}`
    async fn list_raw(&self, collection: Collection, query: &ListQuery)
        -> Result<Value, BackendError>;

    /// `GET {collection}/{id}`
    async fn get_raw(&self, collection: Collection, id: &str) -> Result<Value, BackendError>;
}

/// Strip the `{ "data": ... }` (or paginated `{ "results": ... }`) envelope
/// when present.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        Value::Object(mut map) if map.contains_key("results") => {
            map.remove("results").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// List a collection and decode every record.
pub async fn list<T: DeserializeOwned>(
    api: &dyn BackendApi,
    collection: Collection,
    query: &ListQuery,
) -> Result<Vec<T>, BackendError> {
    let raw = api.list_raw(collection, query).await?;
    match unwrap_envelope(raw) {
        array @ Value::Array(_) => Ok(serde_json::from_value(array)?),
        // A null body means an empty collection.
        Value::Null => Ok(Vec::new()),
        other => Err(BackendError::Unavailable(format!(
            "{collection} returned a {} instead of a list",
            kind_of(&other)
        ))),
    }
}

/// Fetch one record by id.
pub async fn get<T: DeserializeOwned>(
    api: &dyn BackendApi,
    collection: Collection,
    id: &str,
) -> Result<T, BackendError> {
    let raw = api.get_raw(collection, id).await?;
    Ok(serde_json::from_value(unwrap_envelope(raw))?)
}

/// Read an aggregate endpoint that answers with a single object.
pub async fn fetch_one<T: DeserializeOwned>(
    api: &dyn BackendApi,
    collection: Collection,
    query: &ListQuery,
) -> Result<T, BackendError> {
    let raw = api.list_raw(collection, query).await?;
    Ok(serde_json::from_value(unwrap_envelope(raw))?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::static_backend::StaticBackend;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn bare_arrays_and_envelopes_both_decode() {
        let backend = StaticBackend::new()
            .with(Collection::Contacts, json!([{ "id": 1 }, { "id": 2 }]))
            .with(Collection::Companies, json!({ "data": [{ "id": 3 }] }))
            .with(Collection::Clients, json!({ "count": 1, "results": [{ "id": 4 }] }));
        let q = ListQuery::new();

        let rows: Vec<Row> = list(&backend, Collection::Contacts, &q).await.unwrap();
        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 2 }]);
        let rows: Vec<Row> = list(&backend, Collection::Companies, &q).await.unwrap();
        assert_eq!(rows, vec![Row { id: 3 }]);
        let rows: Vec<Row> = list(&backend, Collection::Clients, &q).await.unwrap();
        assert_eq!(rows, vec![Row { id: 4 }]);
    }

    #[tokio::test]
    async fn an_object_where_a_list_is_expected_is_an_error() {
        let backend = StaticBackend::new().with(Collection::Quotes, json!({ "id": 1 }));
        let result: Result<Vec<Row>, _> = list(&backend, Collection::Quotes, &ListQuery::new()).await;
        assert_matches!(result, Err(BackendError::Unavailable(_)));
    }

    #[tokio::test]
    async fn malformed_records_are_decode_errors() {
        let backend = StaticBackend::new().with(Collection::Quotes, json!([{ "id": "nope" }]));
        let result: Result<Vec<Row>, _> = list(&backend, Collection::Quotes, &ListQuery::new()).await;
        assert_matches!(result, Err(BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn aggregates_unwrap_the_envelope() {
        #[derive(Deserialize)]
        struct Stats {
            count: u32,
        }
        let backend =
            StaticBackend::new().with(Collection::ClientStats, json!({ "data": { "count": 9 } }));
        let stats: Stats = fetch_one(&backend, Collection::ClientStats, &ListQuery::new())
            .await
            .unwrap();
        assert_eq!(stats.count, 9);
    }

    #[tokio::test]
    async fn get_finds_a_record_by_id() {
        let backend =
            StaticBackend::new().with(Collection::Projects, json!([{ "id": 1 }, { "id": 2 }]));
        let row: Row = get(&backend, Collection::Projects, "2").await.unwrap();
        assert_eq!(row, Row { id: 2 });
        let missing: Result<Row, _> = get(&backend, Collection::Projects, "9").await;
        assert_matches!(missing, Err(BackendError::Api { status: 404, .. }));
    }
}
