//! Dashboard layouts: widget slots, dashboard pages and their default sets.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::grid::MAX_COLS;
use crate::widget::{WidgetConfig, WidgetType};

/// Widgets allowed on one dashboard page.
pub const MAX_WIDGETS: usize = 64;

/// Tallest widget, in rows.
pub const MAX_HEIGHT: u32 = 48;

/// Lowest row a widget may start on. A full page of the tallest widgets
/// stacked in one column still fits.
pub const MAX_ROW: u32 = MAX_WIDGETS as u32 * MAX_HEIGHT;

// ---------------------------------------------------------------------------
// Widget slot
// ---------------------------------------------------------------------------

/// Position and size of one widget on the grid, in cell units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WidgetLayout {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(range(max = 11))]
    pub x: u32,
    #[validate(range(max = 3072))]
    pub y: u32,
    #[validate(range(min = 1, max = 12))]
    pub w: u32,
    #[validate(range(min = 1, max = 48))]
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "WidgetConfig::is_empty")]
    pub config: WidgetConfig,
}

impl WidgetLayout {
    /// Build a slot at `(x, y)` with the type's default footprint.
    pub fn new(id: impl Into<String>, widget_type: WidgetType, x: u32, y: u32) -> Self {
        let size = widget_type.default_size();
        Self {
            id: id.into(),
            x,
            y,
            w: size.w,
            h: size.h,
            min_w: Some(size.min_w),
            min_h: Some(size.min_h),
            widget_type,
            config: WidgetConfig::default(),
        }
    }

    /// Same slot with an explicit size.
    pub fn sized(mut self, w: u32, h: u32) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Bottom edge (exclusive row index).
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Right edge (exclusive column index).
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Whether two slots share at least one column.
    pub fn overlaps_columns(&self, other: &WidgetLayout) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    /// Whether two slots share at least one cell.
    pub fn collides(&self, other: &WidgetLayout) -> bool {
        self.overlaps_columns(other) && self.y < other.bottom() && other.y < self.bottom()
    }
}

/// Validate a full layout set: every slot well-formed and ids unique.
///
/// Slots must also fit inside the 12-column grid and a page holds at most
/// [`MAX_WIDGETS`] widgets.
pub fn validate_layout(layout: &[WidgetLayout]) -> Result<(), CoreError> {
    if layout.len() > MAX_WIDGETS {
        return Err(CoreError::Validation(format!(
            "A dashboard holds at most {MAX_WIDGETS} widgets"
        )));
    }
    let mut seen = HashSet::with_capacity(layout.len());
    for item in layout {
        item.validate()
            .map_err(|e| CoreError::Validation(format!("Widget '{}': {e}", item.id)))?;
        if item.right() > MAX_COLS {
            return Err(CoreError::Validation(format!(
                "Widget '{}' extends past column {MAX_COLS}",
                item.id
            )));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate widget id: {}",
                item.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Dashboard pages
// ---------------------------------------------------------------------------

/// Dashboard pages that carry their own customizable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPage {
    Main,
    Commercial,
    Finance,
    Projects,
}

impl DashboardPage {
    pub const ALL: [DashboardPage; 4] = [
        DashboardPage::Main,
        DashboardPage::Commercial,
        DashboardPage::Finance,
        DashboardPage::Projects,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DashboardPage::Main => "main",
            DashboardPage::Commercial => "commercial",
            DashboardPage::Finance => "finance",
            DashboardPage::Projects => "projects",
        }
    }

    /// Storage key holding one viewer's layout for this page.
    pub fn storage_key(self, viewer: &str) -> String {
        format!("dashboard-layout:{}:{viewer}", self.as_str())
    }

    /// The layout a viewer gets before customizing anything.
    pub fn default_layout(self) -> Vec<WidgetLayout> {
        match self {
            DashboardPage::Main => vec![
                WidgetLayout::new("stats", WidgetType::Stats, 0, 0),
                WidgetLayout::new("clients-count", WidgetType::ClientsCount, 6, 0),
                WidgetLayout::new("projects-active", WidgetType::ProjectsActive, 9, 0),
                WidgetLayout::new("revenue-chart", WidgetType::RevenueChart, 0, 2),
                WidgetLayout::new("tasks", WidgetType::Tasks, 6, 2).sized(6, 4),
                WidgetLayout::new("events", WidgetType::Events, 0, 6),
                WidgetLayout::new("activity", WidgetType::Activity, 4, 6),
                WidgetLayout::new("opportunities-list", WidgetType::OpportunitiesList, 8, 6),
            ],
            DashboardPage::Commercial => vec![
                WidgetLayout::new("commercial-stats", WidgetType::CommercialStats, 0, 0),
                WidgetLayout::new("clients-growth", WidgetType::ClientsGrowth, 6, 0),
                WidgetLayout::new(
                    "opportunities-pipeline",
                    WidgetType::OpportunitiesPipeline,
                    0,
                    4,
                ),
                WidgetLayout::new(
                    "opportunities-needing-action",
                    WidgetType::OpportunitiesNeedingAction,
                    0,
                    8,
                ),
                WidgetLayout::new("quotes-list", WidgetType::QuotesList, 4, 8),
                WidgetLayout::new("submissions-list", WidgetType::SubmissionsList, 8, 8),
                WidgetLayout::new(
                    "testimonials-carousel",
                    WidgetType::TestimonialsCarousel,
                    0,
                    12,
                ),
            ],
            DashboardPage::Finance => vec![
                WidgetLayout::new("performance", WidgetType::Performance, 0, 0),
                WidgetLayout::new("kpi-custom", WidgetType::KpiCustom, 6, 0),
                WidgetLayout::new("employees-count", WidgetType::EmployeesCount, 9, 0),
                WidgetLayout::new("cash-flow", WidgetType::CashFlow, 0, 2),
                WidgetLayout::new("growth-chart", WidgetType::GrowthChart, 6, 2),
                WidgetLayout::new("goals-progress", WidgetType::GoalsProgress, 0, 6),
            ],
            DashboardPage::Projects => vec![
                WidgetLayout::new("projects-active", WidgetType::ProjectsActive, 0, 0),
                WidgetLayout::new("projects-status", WidgetType::ProjectsStatus, 3, 0),
                WidgetLayout::new("workload-chart", WidgetType::WorkloadChart, 7, 0)
                    .sized(5, 4),
                WidgetLayout::new("tasks-kanban", WidgetType::TasksKanban, 0, 4),
            ],
        }
    }
}

impl fmt::Display for DashboardPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardPage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DashboardPage::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::NotFound {
                entity: "DashboardPage",
                id: s.to_string(),
            })
    }
}
