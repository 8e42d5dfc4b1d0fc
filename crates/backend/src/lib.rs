//! Client for the business REST backend.
//!
//! Provides the [`BackendApi`] trait the widget resolver reads through, an
//! HTTP implementation on top of [`reqwest`], an in-memory implementation
//! used by tests and demos, and the record models the backend returns.

pub mod api;
pub mod collection;
pub mod error;
pub mod http;
pub mod models;
pub mod static_backend;

pub use api::{fetch_one, get, list, BackendApi};
pub use collection::{Collection, ListQuery};
pub use error::BackendError;
pub use http::HttpBackend;
pub use static_backend::StaticBackend;
