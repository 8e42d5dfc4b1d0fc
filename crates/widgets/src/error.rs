use bizdash_backend::BackendError;

/// Why a widget fetch did not produce data.
///
/// Never leaves the resolver: it is logged and replaced by the fallback.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The widget's configuration cannot be evaluated.
    #[error("Invalid widget configuration: {0}")]
    Config(String),
}

impl WidgetError {
    pub fn is_transient(&self) -> bool {
        match self {
            WidgetError::Backend(e) => e.is_transient(),
            WidgetError::Config(_) => false,
        }
    }
}
