//! Data shapes returned for each widget type.
//!
//! Every shape's [`Default`] is that type's fallback: numbers zero, lists
//! empty, formatted amounts rendered as zero dollars. Top-level fields are
//! never optional, so a fallback serializes with every field present.

use bizdash_core::currency::format_dashboard_amount;
use bizdash_core::types::{Date, RecordId, Timestamp};
use bizdash_core::widget::WidgetType;
use serde::Serialize;

fn zero_amount() -> String {
    format_dashboard_amount(0.0)
}

// ---------------------------------------------------------------------------
// Shared rows
// ---------------------------------------------------------------------------

/// One bucket of a monthly series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthPoint {
    /// `YYYY-MM`
    pub month: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskItem {
    pub id: RecordId,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<Date>,
    pub assignee: Option<String>,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsData {
    pub contacts: u64,
    pub companies: u64,
    pub open_opportunities: u64,
    pub active_projects: u64,
    pub monthly_revenue: f64,
    pub monthly_revenue_formatted: String,
    pub revenue_growth: f64,
}

impl Default for StatsData {
    fn default() -> Self {
        Self {
            contacts: 0,
            companies: 0,
            open_opportunities: 0,
            active_projects: 0,
            monthly_revenue: 0.0,
            monthly_revenue_formatted: zero_amount(),
            revenue_growth: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TasksData {
    pub items: Vec<TaskItem>,
    pub open: u64,
    pub overdue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventItem {
    pub id: String,
    pub title: String,
    pub date: Date,
    #[serde(rename = "type")]
    pub event_type: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventsData {
    pub items: Vec<EventItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub id: RecordId,
    pub kind: String,
    pub description: String,
    pub actor: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityData {
    pub items: Vec<ActivityItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceData {
    pub won_count: u64,
    pub lost_count: u64,
    pub win_rate: f64,
    pub won_amount: f64,
    pub average_deal: f64,
    pub months: Vec<MonthPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCustomData {
    pub metric: String,
    pub value: f64,
    pub previous: f64,
    pub change: f64,
    pub formatted: String,
}

impl Default for KpiCustomData {
    fn default() -> Self {
        Self {
            metric: String::new(),
            value: 0.0,
            previous: 0.0,
            change: 0.0,
            formatted: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub label: String,
    pub metric: String,
    pub current: f64,
    pub target: f64,
    /// Share of the target reached, capped at 100.
    pub percent: f64,
    pub reached: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalsProgressData {
    pub goals: Vec<GoalProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub month: String,
    pub revenue: f64,
    pub new_clients: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrowthChartData {
    pub months: Vec<GrowthPoint>,
    pub revenue_growth: f64,
    pub clients_growth: f64,
}

// ---------------------------------------------------------------------------
// Commercial
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityItem {
    pub id: RecordId,
    pub title: String,
    pub client_name: Option<String>,
    pub stage: String,
    pub amount: f64,
    pub expected_close_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpportunitiesListData {
    pub items: Vec<OpportunityItem>,
    pub total: u64,
    pub total_amount: f64,
}

/// `clients-count`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientsCountData {
    pub count: u64,
    pub growth: f64,
    pub previous_count: u64,
    pub new_this_month: u64,
    pub active_count: u64,
    pub active_growth: f64,
    pub previous_active_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteItem {
    pub id: RecordId,
    pub number: String,
    pub client_name: Option<String>,
    pub amount: f64,
    pub status: String,
    pub issued_at: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuotesListData {
    pub items: Vec<QuoteItem>,
    pub pending: u64,
    pub pending_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionItem {
    pub id: RecordId,
    pub title: String,
    pub client_name: Option<String>,
    pub amount: f64,
    pub status: String,
    pub submitted_at: Date,
    pub deadline: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubmissionsListData {
    pub items: Vec<SubmissionItem>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestimonialItem {
    pub id: RecordId,
    pub author: String,
    pub company: Option<String>,
    pub content: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestimonialsData {
    pub items: Vec<TestimonialItem>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStage {
    pub stage: String,
    pub count: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineData {
    pub stages: Vec<PipelineStage>,
    pub total_amount: f64,
    /// Open amounts weighted by win probability.
    pub weighted_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub id: RecordId,
    pub title: String,
    pub client_name: Option<String>,
    pub stage: String,
    pub next_action_date: Option<Date>,
    /// `overdue-action` or `stale`.
    pub reason: String,
    pub days_late: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NeedingActionData {
    pub items: Vec<ActionItem>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientGrowthPoint {
    pub month: String,
    pub new_clients: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientsGrowthData {
    pub months: Vec<ClientGrowthPoint>,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommercialStatsData {
    pub open_opportunities: u64,
    pub pipeline_amount: f64,
    pub pipeline_amount_formatted: String,
    pub won_this_month: u64,
    pub won_amount_this_month: f64,
    pub quotes_sent: u64,
    pub quote_acceptance_rate: f64,
    pub conversion_rate: f64,
}

impl Default for CommercialStatsData {
    fn default() -> Self {
        Self {
            open_opportunities: 0,
            pipeline_amount: 0.0,
            pipeline_amount_formatted: zero_amount(),
            won_this_month: 0,
            won_amount_this_month: 0.0,
            quotes_sent: 0,
            quote_acceptance_rate: 0.0,
            conversion_rate: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects and people
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectItem {
    pub id: RecordId,
    pub name: String,
    pub client_name: Option<String>,
    pub progress: f64,
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectsActiveData {
    pub count: u64,
    pub total: u64,
    pub completed_this_month: u64,
    pub overdue: u64,
    pub items: Vec<ProjectItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectsStatusData {
    pub statuses: Vec<StatusCount>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanColumn {
    pub status: String,
    pub count: u64,
    pub tasks: Vec<TaskItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TasksKanbanData {
    pub columns: Vec<KanbanColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeesCountData {
    pub count: u64,
    pub active: u64,
    pub new_this_month: u64,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadItem {
    pub employee_id: RecordId,
    pub name: String,
    pub hours: f64,
    pub capacity: f64,
    /// Logged hours over capacity, in percent (may exceed 100).
    pub utilization: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkloadData {
    /// Length of the measured period in days.
    pub period_days: i64,
    pub employees: Vec<WorkloadItem>,
    pub total_hours: f64,
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueChartData {
    pub months: Vec<RevenuePoint>,
    pub total_revenue: f64,
    pub total_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowData {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub income_formatted: String,
    pub expenses_formatted: String,
    pub net_formatted: String,
    /// Net change against the previous month, in percent.
    pub change: f64,
    pub top_expenses: Vec<CategoryAmount>,
}

impl Default for CashFlowData {
    fn default() -> Self {
        Self {
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
            income_formatted: zero_amount(),
            expenses_formatted: zero_amount(),
            net_formatted: zero_amount(),
            change: 0.0,
            top_expenses: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Union
// ---------------------------------------------------------------------------

/// Resolved payload of any widget; serializes as the inner shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetData {
    Stats(StatsData),
    Tasks(TasksData),
    Events(EventsData),
    Activity(ActivityData),
    Performance(PerformanceData),
    OpportunitiesList(OpportunitiesListData),
    ClientsCount(ClientsCountData),
    ProjectsActive(ProjectsActiveData),
    RevenueChart(RevenueChartData),
    KpiCustom(KpiCustomData),
    QuotesList(QuotesListData),
    SubmissionsList(SubmissionsListData),
    TestimonialsCarousel(TestimonialsData),
    OpportunitiesPipeline(PipelineData),
    OpportunitiesNeedingAction(NeedingActionData),
    ClientsGrowth(ClientsGrowthData),
    ProjectsStatus(ProjectsStatusData),
    TasksKanban(TasksKanbanData),
    CashFlow(CashFlowData),
    EmployeesCount(EmployeesCountData),
    CommercialStats(CommercialStatsData),
    GoalsProgress(GoalsProgressData),
    GrowthChart(GrowthChartData),
    WorkloadChart(WorkloadData),
}

impl WidgetData {
    /// The documented fallback for `widget_type`.
    pub fn fallback(widget_type: WidgetType) -> Self {
        match widget_type {
            WidgetType::Stats => WidgetData::Stats(Default::default()),
            WidgetType::Tasks => WidgetData::Tasks(Default::default()),
            WidgetType::Events => WidgetData::Events(Default::default()),
            WidgetType::Activity => WidgetData::Activity(Default::default()),
            WidgetType::Performance => WidgetData::Performance(Default::default()),
            WidgetType::OpportunitiesList => WidgetData::OpportunitiesList(Default::default()),
            WidgetType::ClientsCount => WidgetData::ClientsCount(Default::default()),
            WidgetType::ProjectsActive => WidgetData::ProjectsActive(Default::default()),
            WidgetType::RevenueChart => WidgetData::RevenueChart(Default::default()),
            WidgetType::KpiCustom => WidgetData::KpiCustom(Default::default()),
            WidgetType::QuotesList => WidgetData::QuotesList(Default::default()),
            WidgetType::SubmissionsList => WidgetData::SubmissionsList(Default::default()),
            WidgetType::TestimonialsCarousel => {
                WidgetData::TestimonialsCarousel(Default::default())
            }
            WidgetType::OpportunitiesPipeline => {
                WidgetData::OpportunitiesPipeline(Default::default())
            }
            WidgetType::OpportunitiesNeedingAction => {
                WidgetData::OpportunitiesNeedingAction(Default::default())
            }
            WidgetType::ClientsGrowth => WidgetData::ClientsGrowth(Default::default()),
            WidgetType::ProjectsStatus => WidgetData::ProjectsStatus(Default::default()),
            WidgetType::TasksKanban => WidgetData::TasksKanban(Default::default()),
            WidgetType::CashFlow => WidgetData::CashFlow(Default::default()),
            WidgetType::EmployeesCount => WidgetData::EmployeesCount(Default::default()),
            WidgetType::CommercialStats => WidgetData::CommercialStats(Default::default()),
            WidgetType::GoalsProgress => WidgetData::GoalsProgress(Default::default()),
            WidgetType::GrowthChart => WidgetData::GrowthChart(Default::default()),
            WidgetType::WorkloadChart => WidgetData::WorkloadChart(Default::default()),
        }
    }

    /// The widget type this payload belongs to.
    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetData::Stats(_) => WidgetType::Stats,
            WidgetData::Tasks(_) => WidgetType::Tasks,
            WidgetData::Events(_) => WidgetType::Events,
            WidgetData::Activity(_) => WidgetType::Activity,
            WidgetData::Performance(_) => WidgetType::Performance,
            WidgetData::OpportunitiesList(_) => WidgetType::OpportunitiesList,
            WidgetData::ClientsCount(_) => WidgetType::ClientsCount,
            WidgetData::ProjectsActive(_) => WidgetType::ProjectsActive,
            WidgetData::RevenueChart(_) => WidgetType::RevenueChart,
            WidgetData::KpiCustom(_) => WidgetType::KpiCustom,
            WidgetData::QuotesList(_) => WidgetType::QuotesList,
            WidgetData::SubmissionsList(_) => WidgetType::SubmissionsList,
            WidgetData::TestimonialsCarousel(_) => WidgetType::TestimonialsCarousel,
            WidgetData::OpportunitiesPipeline(_) => WidgetType::OpportunitiesPipeline,
            WidgetData::OpportunitiesNeedingAction(_) => WidgetType::OpportunitiesNeedingAction,
            WidgetData::ClientsGrowth(_) => WidgetType::ClientsGrowth,
            WidgetData::ProjectsStatus(_) => WidgetType::ProjectsStatus,
            WidgetData::TasksKanban(_) => WidgetType::TasksKanban,
            WidgetData::CashFlow(_) => WidgetType::CashFlow,
            WidgetData::EmployeesCount(_) => WidgetType::EmployeesCount,
            WidgetData::CommercialStats(_) => WidgetType::CommercialStats,
            WidgetData::GoalsProgress(_) => WidgetType::GoalsProgress,
            WidgetData::GrowthChart(_) => WidgetType::GrowthChart,
            WidgetData::WorkloadChart(_) => WidgetType::WorkloadChart,
        }
    }
}
