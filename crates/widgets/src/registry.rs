//! The widget table: one fetch routine and one fallback per type.

use bizdash_backend::BackendApi;
use bizdash_core::widget::WidgetType;
use futures::future::BoxFuture;

use crate::context::WidgetContext;
use crate::data::WidgetData;
use crate::error::WidgetError;
use crate::sources::{commercial, finance, overview, projects};

/// Type-erased fetch routine.
pub type FetchFn =
    for<'a> fn(&'a dyn BackendApi, &'a WidgetContext) -> BoxFuture<'a, Result<WidgetData, WidgetError>>;

/// Registry row for one widget type.
#[derive(Clone, Copy)]
pub struct WidgetEntry {
    pub widget_type: WidgetType,
    pub fetch: FetchFn,
    pub fallback: fn(WidgetType) -> WidgetData,
}

/// Wrap a typed source routine into a [`FetchFn`].
macro_rules! fetcher {
    ($name:ident => $source:path, $variant:ident) => {
        fn $name<'a>(
            api: &'a dyn BackendApi,
            ctx: &'a WidgetContext,
        ) -> BoxFuture<'a, Result<WidgetData, WidgetError>> {
            Box::pin(async move { $source(api, ctx).await.map(WidgetData::$variant) })
        }
    };
}

fetcher!(fetch_stats => overview::stats, Stats);
fetcher!(fetch_tasks => overview::tasks, Tasks);
fetcher!(fetch_events => overview::events, Events);
fetcher!(fetch_activity => overview::activity, Activity);
fetcher!(fetch_performance => overview::performance, Performance);
fetcher!(fetch_opportunities_list => commercial::opportunities_list, OpportunitiesList);
fetcher!(fetch_clients_count => commercial::clients_count, ClientsCount);
fetcher!(fetch_projects_active => projects::projects_active, ProjectsActive);
fetcher!(fetch_revenue_chart => finance::revenue_chart, RevenueChart);
fetcher!(fetch_kpi_custom => overview::kpi_custom, KpiCustom);
fetcher!(fetch_quotes_list => commercial::quotes_list, QuotesList);
fetcher!(fetch_submissions_list => commercial::submissions_list, SubmissionsList);
fetcher!(fetch_testimonials => commercial::testimonials, TestimonialsCarousel);
fetcher!(fetch_pipeline => commercial::pipeline, OpportunitiesPipeline);
fetcher!(fetch_needing_action => commercial::needing_action, OpportunitiesNeedingAction);
fetcher!(fetch_clients_growth => commercial::clients_growth, ClientsGrowth);
fetcher!(fetch_projects_status => projects::projects_status, ProjectsStatus);
fetcher!(fetch_tasks_kanban => projects::tasks_kanban, TasksKanban);
fetcher!(fetch_cash_flow => finance::cash_flow, CashFlow);
fetcher!(fetch_employees_count => projects::employees_count, EmployeesCount);
fetcher!(fetch_commercial_stats => commercial::commercial_stats, CommercialStats);
fetcher!(fetch_goals_progress => overview::goals_progress, GoalsProgress);
fetcher!(fetch_growth_chart => overview::growth_chart, GrowthChart);
fetcher!(fetch_workload => projects::workload, WorkloadChart);

/// The registry row for `widget_type`. Adding a variant to [`WidgetType`]
/// does not compile until it has a row here.
fn entry_for(widget_type: WidgetType) -> WidgetEntry {
    let fetch: FetchFn = match widget_type {
        WidgetType::Stats => fetch_stats,
        WidgetType::Tasks => fetch_tasks,
        WidgetType::Events => fetch_events,
        WidgetType::Activity => fetch_activity,
        WidgetType::Performance => fetch_performance,
        WidgetType::OpportunitiesList => fetch_opportunities_list,
        WidgetType::ClientsCount => fetch_clients_count,
        WidgetType::ProjectsActive => fetch_projects_active,
        WidgetType::RevenueChart => fetch_revenue_chart,
        WidgetType::KpiCustom => fetch_kpi_custom,
        WidgetType::QuotesList => fetch_quotes_list,
        WidgetType::SubmissionsList => fetch_submissions_list,
        WidgetType::TestimonialsCarousel => fetch_testimonials,
        WidgetType::OpportunitiesPipeline => fetch_pipeline,
        WidgetType::OpportunitiesNeedingAction => fetch_needing_action,
        WidgetType::ClientsGrowth => fetch_clients_growth,
        WidgetType::ProjectsStatus => fetch_projects_status,
        WidgetType::TasksKanban => fetch_tasks_kanban,
        WidgetType::CashFlow => fetch_cash_flow,
        WidgetType::EmployeesCount => fetch_employees_count,
        WidgetType::CommercialStats => fetch_commercial_stats,
        WidgetType::GoalsProgress => fetch_goals_progress,
        WidgetType::GrowthChart => fetch_growth_chart,
        WidgetType::WorkloadChart => fetch_workload,
    };
    WidgetEntry {
        widget_type,
        fetch,
        fallback: WidgetData::fallback,
    }
}

/// Table of every widget type, built once and shared.
pub struct WidgetRegistry {
    /// Indexed by the variant's position in [`WidgetType::ALL`].
    entries: [WidgetEntry; 24],
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            entries: WidgetType::ALL.map(entry_for),
        }
    }

    pub fn get(&self, widget_type: WidgetType) -> &WidgetEntry {
        &self.entries[widget_type as usize]
    }

    pub fn entries(&self) -> impl Iterator<Item = &WidgetEntry> {
        self.entries.iter()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_its_own_row() {
        let registry = WidgetRegistry::new();
        assert_eq!(registry.entries().count(), WidgetType::ALL.len());
        for t in WidgetType::ALL {
            let entry = registry.get(t);
            assert_eq!(entry.widget_type, t);
            assert_eq!((entry.fallback)(t).widget_type(), t);
        }
    }
}
