//! [`BackendApi`] over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::BackendApi;
use crate::collection::{Collection, ListQuery};
use crate::error::BackendError;

/// HTTP client for the business REST backend.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Create a client for `base_url` (e.g. `http://localhost:8000/api`)
    /// whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Send `Authorization: Bearer {token}` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.path())
    }

    fn request(&self, url: String) -> reqwest::RequestBuilder {
        let builder = self.client.get(url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or a
    /// [`BackendError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body.
    ///
    /// The body is read as bytes first so a malformed payload surfaces as
    /// [`BackendError::Decode`] rather than a transport error.
    async fn parse_response(response: reqwest::Response) -> Result<Value, BackendError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn list_raw(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> Result<Value, BackendError> {
        let response = self
            .request(self.url(collection))
            .query(&query.to_pairs())
            .send()
            .await?;
        tracing::debug!(collection = %collection, status = %response.status(), "Backend list");
        Self::parse_response(response).await
    }

    async fn get_raw(&self, collection: Collection, id: &str) -> Result<Value, BackendError> {
        let response = self
            .request(format!("{}/{}", self.url(collection), id))
            .send()
            .await?;
        tracing::debug!(collection = %collection, id, status = %response.status(), "Backend get");
        Self::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let backend = HttpBackend::with_client(reqwest::Client::new(), "http://api.local/v1/");
        assert_eq!(backend.base_url(), "http://api.local/v1");
        assert_eq!(
            backend.url(Collection::RevenueStats),
            "http://api.local/v1/dashboard/revenue"
        );
    }

    #[test]
    fn empty_tokens_are_ignored() {
        let backend = HttpBackend::with_client(reqwest::Client::new(), "http://api.local")
            .with_token(Some(String::new()));
        assert!(backend.token.is_none());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_request_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = backend
            .list_raw(Collection::Contacts, &ListQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Request(_)));
        assert!(err.is_transient());
    }
}
