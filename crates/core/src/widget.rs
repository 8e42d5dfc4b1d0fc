//! Widget catalogue: the closed set of widget types and their per-widget
//! configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Widget types
// ---------------------------------------------------------------------------

/// Every kind of tile a dashboard can hold.
///
/// The set is closed: each variant has exactly one fetch routine and one
/// fallback shape in the widgets crate, enforced by exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    Stats,
    Tasks,
    Events,
    Activity,
    Performance,
    OpportunitiesList,
    ClientsCount,
    ProjectsActive,
    RevenueChart,
    KpiCustom,
    QuotesList,
    SubmissionsList,
    TestimonialsCarousel,
    OpportunitiesPipeline,
    OpportunitiesNeedingAction,
    ClientsGrowth,
    ProjectsStatus,
    TasksKanban,
    CashFlow,
    EmployeesCount,
    CommercialStats,
    GoalsProgress,
    GrowthChart,
    WorkloadChart,
}

/// Default grid footprint of a freshly added widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSize {
    pub w: u32,
    pub h: u32,
    pub min_w: u32,
    pub min_h: u32,
}

impl WidgetType {
    /// All widget types, in catalogue order.
    pub const ALL: [WidgetType; 24] = [
        WidgetType::Stats,
        WidgetType::Tasks,
        WidgetType::Events,
        WidgetType::Activity,
        WidgetType::Performance,
        WidgetType::OpportunitiesList,
        WidgetType::ClientsCount,
        WidgetType::ProjectsActive,
        WidgetType::RevenueChart,
        WidgetType::KpiCustom,
        WidgetType::QuotesList,
        WidgetType::SubmissionsList,
        WidgetType::TestimonialsCarousel,
        WidgetType::OpportunitiesPipeline,
        WidgetType::OpportunitiesNeedingAction,
        WidgetType::ClientsGrowth,
        WidgetType::ProjectsStatus,
        WidgetType::TasksKanban,
        WidgetType::CashFlow,
        WidgetType::EmployeesCount,
        WidgetType::CommercialStats,
        WidgetType::GoalsProgress,
        WidgetType::GrowthChart,
        WidgetType::WorkloadChart,
    ];

    /// Wire name, e.g. `"clients-count"`.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Stats => "stats",
            WidgetType::Tasks => "tasks",
            WidgetType::Events => "events",
            WidgetType::Activity => "activity",
            WidgetType::Performance => "performance",
            WidgetType::OpportunitiesList => "opportunities-list",
            WidgetType::ClientsCount => "clients-count",
            WidgetType::ProjectsActive => "projects-active",
            WidgetType::RevenueChart => "revenue-chart",
            WidgetType::KpiCustom => "kpi-custom",
            WidgetType::QuotesList => "quotes-list",
            WidgetType::SubmissionsList => "submissions-list",
            WidgetType::TestimonialsCarousel => "testimonials-carousel",
            WidgetType::OpportunitiesPipeline => "opportunities-pipeline",
            WidgetType::OpportunitiesNeedingAction => "opportunities-needing-action",
            WidgetType::ClientsGrowth => "clients-growth",
            WidgetType::ProjectsStatus => "projects-status",
            WidgetType::TasksKanban => "tasks-kanban",
            WidgetType::CashFlow => "cash-flow",
            WidgetType::EmployeesCount => "employees-count",
            WidgetType::CommercialStats => "commercial-stats",
            WidgetType::GoalsProgress => "goals-progress",
            WidgetType::GrowthChart => "growth-chart",
            WidgetType::WorkloadChart => "workload-chart",
        }
    }

    /// Footprint used when the widget is added to a layout.
    ///
    /// Counters are small tiles, lists and charts are wider and taller.
    pub fn default_size(self) -> WidgetSize {
        let (w, h, min_w, min_h) = match self {
            WidgetType::ClientsCount
            | WidgetType::ProjectsActive
            | WidgetType::EmployeesCount
            | WidgetType::KpiCustom => (3, 2, 2, 2),
            WidgetType::Stats | WidgetType::CommercialStats | WidgetType::Performance => {
                (6, 2, 3, 2)
            }
            WidgetType::RevenueChart
            | WidgetType::ClientsGrowth
            | WidgetType::GrowthChart
            | WidgetType::CashFlow
            | WidgetType::WorkloadChart => (6, 4, 4, 3),
            WidgetType::TasksKanban | WidgetType::OpportunitiesPipeline => (12, 4, 6, 3),
            WidgetType::Tasks
            | WidgetType::Events
            | WidgetType::Activity
            | WidgetType::OpportunitiesList
            | WidgetType::OpportunitiesNeedingAction
            | WidgetType::QuotesList
            | WidgetType::SubmissionsList
            | WidgetType::ProjectsStatus
            | WidgetType::GoalsProgress => (4, 4, 3, 3),
            WidgetType::TestimonialsCarousel => (4, 3, 3, 2),
        };
        WidgetSize { w, h, min_w, min_h }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown widget type: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Per-widget configuration
// ---------------------------------------------------------------------------

/// A target tracked by the `goals-progress` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub label: String,
    /// One of `revenue`, `clients`, `opportunities-won`, `projects-completed`.
    pub metric: String,
    pub target: f64,
}

/// Optional settings attached to a widget slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Maximum number of list rows to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Metric key for `kpi-custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Number of months covered by chart widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<GoalConfig>,
}

impl WidgetConfig {
    pub fn is_empty(&self) -> bool {
        self == &WidgetConfig::default()
    }

    /// Row limit, falling back to `default` when unset or zero.
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit.filter(|l| *l > 0).unwrap_or(default)
    }

    /// Chart span in months, clamped to 1..=24.
    pub fn months_or(&self, default: u32) -> u32 {
        self.months.unwrap_or(default).clamp(1, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for t in WidgetType::ALL {
            assert_eq!(t.as_str().parse::<WidgetType>().unwrap(), t);
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&WidgetType::OpportunitiesNeedingAction).unwrap();
        assert_eq!(json, "\"opportunities-needing-action\"");
        let parsed: WidgetType = serde_json::from_str("\"cash-flow\"").unwrap();
        assert_eq!(parsed, WidgetType::CashFlow);
    }

    #[test]
    fn unknown_type_is_a_validation_error() {
        let err = "pie-chart".parse::<WidgetType>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn default_sizes_respect_minimums() {
        for t in WidgetType::ALL {
            let size = t.default_size();
            assert!(size.w >= size.min_w, "{t}");
            assert!(size.h >= size.min_h, "{t}");
            assert!(size.w <= 12, "{t}");
        }
    }

    #[test]
    fn empty_config_is_detected() {
        assert!(WidgetConfig::default().is_empty());
        let cfg = WidgetConfig {
            limit: Some(3),
            ..Default::default()
        };
        assert!(!cfg.is_empty());
        assert_eq!(cfg.limit_or(10), 3);
    }

    #[test]
    fn months_are_clamped() {
        let cfg = WidgetConfig {
            months: Some(60),
            ..Default::default()
        };
        assert_eq!(cfg.months_or(6), 24);
        assert_eq!(WidgetConfig::default().months_or(6), 6);
    }
}
