/// Errors from the REST backend layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was valid JSON but not the expected shape.
    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The collection is unreachable for a reason other than HTTP.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Whether a second attempt could plausibly succeed.
    ///
    /// Client errors (4xx) and malformed bodies are deterministic; everything
    /// else is worth one retry.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Request(_) | BackendError::Unavailable(_) => true,
            BackendError::Api { status, .. } => *status >= 500 || *status == 429,
            BackendError::Decode(_) => false,
        }
    }

    /// The backend answered 404 for the requested record or collection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = BackendError::Api {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
        assert!(BackendError::Unavailable("down".into()).is_transient());
    }

    #[test]
    fn client_errors_and_bad_bodies_are_not() {
        let err = BackendError::Api {
            status: 404,
            body: "missing".into(),
        };
        assert!(!err.is_transient());
        assert!(err.is_not_found());
        let decode = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert!(!BackendError::Decode(decode).is_transient());
    }
}
