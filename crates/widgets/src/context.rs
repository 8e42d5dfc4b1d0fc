//! Inputs shared by every widget fetch.

use bizdash_backend::ListQuery;
use bizdash_core::types::Date;
use bizdash_core::widget::WidgetConfig;
use serde::{Deserialize, Serialize};

/// Dashboard-wide filters applied to every widget on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalFilters {
    #[serde(default)]
    pub from: Option<Date>,
    #[serde(default)]
    pub to: Option<Date>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl GlobalFilters {
    /// Backend list query carrying these filters.
    pub fn to_query(&self) -> ListQuery {
        ListQuery::new()
            .between(self.from, self.to)
            .owner(self.owner_id.clone())
    }
}

/// Everything a fetch routine may read besides the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetContext {
    pub config: WidgetConfig,
    pub filters: GlobalFilters,
    /// Reference date for "this month", "overdue" and similar.
    pub today: Date,
}

impl WidgetContext {
    pub fn new(config: WidgetConfig, filters: GlobalFilters, today: Date) -> Self {
        Self {
            config,
            filters,
            today,
        }
    }

    pub fn query(&self) -> ListQuery {
        self.filters.to_query()
    }
}
