//! Per-viewer, per-page widget layout persistence.

use std::sync::Arc;

use bizdash_core::layout::{validate_layout, DashboardPage, WidgetLayout};

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Loads, saves and resets dashboard layouts on top of a [`KeyValueStore`].
///
/// Each `(page, viewer)` pair owns one key holding the JSON-serialized
/// layout array. Reads never fail: a missing, unreadable or malformed value
/// yields the page's default layout.
#[derive(Clone)]
pub struct LayoutStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LayoutStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The viewer's layout for `page`, or the default set.
    pub fn load(&self, viewer: &str, page: DashboardPage) -> Vec<WidgetLayout> {
        let key = page.storage_key(viewer);
        let raw = match self.kv.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return page.default_layout(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Layout read failed, using defaults");
                return page.default_layout();
            }
        };

        match serde_json::from_str::<Vec<WidgetLayout>>(&raw) {
            Ok(layout) if validate_layout(&layout).is_ok() => layout,
            Ok(_) => {
                tracing::warn!(key = %key, "Stored layout is invalid, using defaults");
                page.default_layout()
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored layout is malformed, using defaults");
                page.default_layout()
            }
        }
    }

    /// Replace the viewer's whole layout for `page`.
    pub fn save(
        &self,
        viewer: &str,
        page: DashboardPage,
        layout: &[WidgetLayout],
    ) -> Result<(), StoreError> {
        validate_layout(layout)?;
        let key = page.storage_key(viewer);
        let value = serde_json::to_string(layout)?;
        self.kv.set(&key, &value)?;
        tracing::debug!(key = %key, widgets = layout.len(), "Layout saved");
        Ok(())
    }

    /// Forget the viewer's customization and return the default layout.
    pub fn reset(&self, viewer: &str, page: DashboardPage) -> Result<Vec<WidgetLayout>, StoreError> {
        let key = page.storage_key(viewer);
        self.kv.remove(&key)?;
        tracing::debug!(key = %key, "Layout reset to defaults");
        Ok(page.default_layout())
    }
}
