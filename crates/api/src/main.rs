use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bizdash_api::background;
use bizdash_api::config::ServerConfig;
use bizdash_api::router::build_app_router;
use bizdash_api::state::AppState;
use bizdash_backend::{BackendApi, HttpBackend};
use bizdash_store::{FileStore, KeyValueStore, LayoutStore, MemoryStore};
use bizdash_widgets::{QueryCache, WidgetResolver};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizdash_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Business backend ---
    let backend: Arc<dyn BackendApi> = Arc::new(
        HttpBackend::new(
            config.backend_url.clone(),
            Duration::from_secs(config.backend_timeout_secs),
        )
        .expect("Failed to build backend HTTP client")
        .with_token(config.backend_token.clone()),
    );
    tracing::info!(backend_url = %config.backend_url, "Backend client created");

    // --- Layout store ---
    let kv: Arc<dyn KeyValueStore> = match &config.layout_store_dir {
        Some(dir) => {
            let store = FileStore::open(dir).expect("Failed to open layout store directory");
            tracing::info!(dir = %dir.display(), "Using file-backed layout store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("LAYOUT_STORE_DIR not set, layouts are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Widget cache ---
    let resolver = WidgetResolver::new(Arc::clone(&backend))
        .with_retry_delay(Duration::from_millis(config.widget_retry_delay_ms));
    let widgets = Arc::new(
        QueryCache::new(resolver).with_max_age(Duration::from_secs(config.widget_max_age_secs)),
    );

    // Spawn the widget refresh job.
    let refresh_cancel = CancellationToken::new();
    let refresh_handle = if config.widget_refresh_secs > 0 {
        Some(tokio::spawn(background::widget_refresh::run(
            Arc::clone(&widgets),
            Duration::from_secs(config.widget_refresh_secs),
            refresh_cancel.clone(),
        )))
    } else {
        tracing::info!("Widget refresh job disabled");
        None
    };

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        layouts: LayoutStore::new(kv),
        backend,
        widgets,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    refresh_cancel.cancel();
    if let Some(handle) = refresh_handle {
        let timeout = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(timeout, handle).await.is_err() {
            tracing::warn!("Widget refresh job did not stop in time");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
