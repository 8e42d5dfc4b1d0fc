use std::sync::Arc;

use bizdash_backend::BackendApi;
use bizdash_store::LayoutStore;
use bizdash_widgets::QueryCache;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-viewer dashboard layouts.
    pub layouts: LayoutStore,
    /// Business REST backend, read directly by the non-widget endpoints.
    pub backend: Arc<dyn BackendApi>,
    /// Widget query cache in front of the resolver.
    pub widgets: Arc<QueryCache>,
}
