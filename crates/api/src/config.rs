use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the business REST backend.
    pub backend_url: String,
    /// Bearer token sent to the backend, if any.
    pub backend_token: Option<String>,
    /// Backend request timeout in seconds (default: `15`).
    pub backend_timeout_secs: u64,
    /// Directory of the file-backed layout store. `None` keeps layouts in memory.
    pub layout_store_dir: Option<PathBuf>,
    /// Interval of the cached-widget refresh job in seconds (default: `300`).
    /// `0` disables the job.
    pub widget_refresh_secs: u64,
    /// Longest time cached widget data is served, in seconds (default: `300`).
    /// Applies whether or not the refresh job runs.
    pub widget_max_age_secs: u64,
    /// Delay before the single fetch retry in milliseconds (default: `500`).
    pub widget_retry_delay_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                     |
    /// |-------------------------|-----------------------------|
    /// | `HOST`                  | `0.0.0.0`                   |
    /// | `PORT`                  | `3000`                      |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                        |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `5`                         |
    /// | `BACKEND_URL`           | `http://localhost:8000/api` |
    /// | `BACKEND_TOKEN`         | unset                       |
    /// | `BACKEND_TIMEOUT_SECS`  | `15`                        |
    /// | `LAYOUT_STORE_DIR`      | unset (in-memory)           |
    /// | `WIDGET_REFRESH_SECS`   | `300`                       |
    /// | `WIDGET_MAX_AGE_SECS`   | `300`                       |
    /// | `WIDGET_RETRY_DELAY_MS` | `500`                       |
    ///
    /// Unparseable numeric values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000/api".into());

        Self {
            host,
            port: parse_var("PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: parse_var("SHUTDOWN_TIMEOUT_SECS", 5),
            backend_url,
            backend_token: non_empty_var("BACKEND_TOKEN"),
            backend_timeout_secs: parse_var("BACKEND_TIMEOUT_SECS", 15),
            layout_store_dir: non_empty_var("LAYOUT_STORE_DIR").map(PathBuf::from),
            widget_refresh_secs: parse_var("WIDGET_REFRESH_SECS", 300),
            widget_max_age_secs: parse_var("WIDGET_MAX_AGE_SECS", 300),
            widget_retry_delay_ms: parse_var("WIDGET_RETRY_DELAY_MS", 500),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match non_empty_var(name) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}
