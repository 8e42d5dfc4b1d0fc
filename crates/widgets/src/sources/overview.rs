//! Main dashboard widgets.

use std::collections::HashSet;

use bizdash_backend::models::{
    Activity, AgendaEvent, Client, Company, Contact, Employee, Opportunity, OpportunityStage,
    Project, ProjectStatus, ProjectTask, RevenueStats, Transaction, TransactionKind,
    VacationRequest,
};
use bizdash_backend::{fetch_one, list, BackendApi, Collection};
use bizdash_core::calendar::{build_events, CalendarSources, EventType};
use bizdash_core::currency::format_dashboard_amount;
use bizdash_core::stats::{percentage_change, ratio_pct, round_to, sum_by_month, trailing_months};
use chrono::{Datelike, Duration};

use super::metrics::{self, DEFAULT_METRIC};
use super::{by_due_date, task_item};
use crate::context::WidgetContext;
use crate::data::{
    ActivityData, ActivityItem, EventItem, EventsData, GoalProgress, GoalsProgressData,
    GrowthChartData, GrowthPoint, KpiCustomData, MonthPoint, PerformanceData, StatsData, TasksData,
};
use crate::error::WidgetError;

/// How far ahead the events widget looks.
const EVENTS_HORIZON_DAYS: i64 = 30;

pub async fn stats(api: &dyn BackendApi, ctx: &WidgetContext) -> Result<StatsData, WidgetError> {
    let q = ctx.query();
    let (contacts, companies, opportunities, projects, revenue) = futures::try_join!(
        list::<Contact>(api, Collection::Contacts, &q),
        list::<Company>(api, Collection::Companies, &q),
        list::<Opportunity>(api, Collection::Opportunities, &q),
        list::<Project>(api, Collection::Projects, &q),
        fetch_one::<RevenueStats>(api, Collection::RevenueStats, &q),
    )?;

    Ok(StatsData {
        contacts: contacts.len() as u64,
        companies: companies.len() as u64,
        open_opportunities: opportunities.iter().filter(|o| o.stage.is_open()).count() as u64,
        active_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count() as u64,
        monthly_revenue: revenue.current_month,
        monthly_revenue_formatted: format_dashboard_amount(revenue.current_month),
        revenue_growth: round_to(
            percentage_change(revenue.current_month, revenue.previous_month),
            1,
        ),
    })
}

/// Open tasks, soonest due first.
pub async fn tasks(api: &dyn BackendApi, ctx: &WidgetContext) -> Result<TasksData, WidgetError> {
    let tasks: Vec<ProjectTask> = list(api, Collection::ProjectTasks, &ctx.query()).await?;
    let mut open: Vec<&ProjectTask> = tasks.iter().filter(|t| t.status.is_open()).collect();
    open.sort_by(|a, b| by_due_date(a, b));

    Ok(TasksData {
        open: open.len() as u64,
        overdue: open.iter().filter(|t| t.is_overdue(ctx.today)).count() as u64,
        items: open
            .into_iter()
            .take(ctx.config.limit_or(5))
            .map(|t| task_item(t, ctx.today))
            .collect(),
    })
}

/// Upcoming calendar events (holidays, vacations, agenda, anniversaries)
/// within the next thirty days. Summer-period days are left out.
pub async fn events(api: &dyn BackendApi, ctx: &WidgetContext) -> Result<EventsData, WidgetError> {
    let q = ctx.query();
    let (agenda, employees, vacations) = futures::try_join!(
        list::<AgendaEvent>(api, Collection::AgendaEvents, &q),
        list::<Employee>(api, Collection::Employees, &q),
        list::<VacationRequest>(api, Collection::VacationRequests, &q),
    )?;
    let sources = CalendarSources {
        vacations: vacations.iter().map(VacationRequest::to_span).collect(),
        agenda: agenda.iter().map(AgendaEvent::to_entry).collect(),
        employees: employees
            .iter()
            .filter(|e| e.is_active)
            .map(Employee::to_employee_dates)
            .collect(),
    };

    let horizon = ctx.today + Duration::days(EVENTS_HORIZON_DAYS);
    let mut years = vec![ctx.today.year()];
    if horizon.year() != ctx.today.year() {
        years.push(horizon.year());
    }

    let mut seen = HashSet::new();
    let mut upcoming: Vec<_> = years
        .into_iter()
        .flat_map(|year| build_events(year, ctx.today, &sources))
        .filter(|e| e.event_type != EventType::SummerVacation)
        .filter(|e| e.date >= ctx.today && e.date <= horizon)
        .filter(|e| seen.insert(e.id.clone()))
        .collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    Ok(EventsData {
        items: upcoming
            .into_iter()
            .take(ctx.config.limit_or(5))
            .map(|e| EventItem {
                id: e.id,
                title: e.title,
                date: e.date,
                event_type: e.event_type.as_str().to_string(),
                color: e.color,
            })
            .collect(),
    })
}

/// Most recent activity first.
pub async fn activity(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<ActivityData, WidgetError> {
    let mut entries: Vec<Activity> = list(api, Collection::Activities, &ctx.query()).await?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(ActivityData {
        items: entries
            .into_iter()
            .take(ctx.config.limit_or(10))
            .map(|a| ActivityItem {
                id: a.id,
                kind: a.kind,
                description: a.description,
                actor: a.actor_name,
                created_at: a.created_at,
            })
            .collect(),
    })
}

/// Won/lost ratio and won amounts per month.
pub async fn performance(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<PerformanceData, WidgetError> {
    let opportunities: Vec<Opportunity> =
        list(api, Collection::Opportunities, &ctx.query()).await?;
    let won: Vec<&Opportunity> = opportunities
        .iter()
        .filter(|o| o.stage == OpportunityStage::Won)
        .collect();
    let lost_count = opportunities
        .iter()
        .filter(|o| o.stage == OpportunityStage::Lost)
        .count() as u64;
    let won_count = won.len() as u64;
    let won_amount: f64 = won.iter().map(|o| o.amount).sum();

    let months = trailing_months(ctx.today, ctx.config.months_or(6));
    let totals = sum_by_month(
        &months,
        won.iter().map(|o| (o.updated_at.date_naive(), o.amount)),
    );

    Ok(PerformanceData {
        won_count,
        lost_count,
        win_rate: round_to(ratio_pct(won_count as f64, (won_count + lost_count) as f64), 1),
        won_amount,
        average_deal: if won_count > 0 {
            round_to(won_amount / won_count as f64, 2)
        } else {
            0.0
        },
        months: months
            .iter()
            .zip(totals)
            .map(|(m, value)| MonthPoint {
                month: m.key(),
                value,
            })
            .collect(),
    })
}

/// One configurable metric with its month-over-month change.
pub async fn kpi_custom(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<KpiCustomData, WidgetError> {
    let metric = ctx.config.metric.as_deref().unwrap_or(DEFAULT_METRIC);
    let value = metrics::evaluate(api, ctx, metric).await?;
    Ok(KpiCustomData {
        metric: metric.to_string(),
        value: value.current,
        previous: value.previous,
        change: round_to(percentage_change(value.current, value.previous), 1),
        formatted: value.formatted(),
    })
}

/// Progress toward each configured goal. No goals configured is an empty
/// list, not an error.
pub async fn goals_progress(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<GoalsProgressData, WidgetError> {
    let evaluations = ctx
        .config
        .goals
        .iter()
        .map(|goal| metrics::evaluate(api, ctx, &goal.metric));
    let values = futures::future::try_join_all(evaluations).await?;

    let goals = ctx
        .config
        .goals
        .iter()
        .zip(values)
        .map(|(goal, value)| {
            let percent = round_to(ratio_pct(value.current, goal.target).min(100.0), 1);
            GoalProgress {
                label: goal.label.clone(),
                metric: goal.metric.clone(),
                current: value.current,
                target: goal.target,
                percent,
                reached: goal.target > 0.0 && value.current >= goal.target,
            }
        })
        .collect();
    Ok(GoalsProgressData { goals })
}

/// Monthly revenue next to monthly client acquisition.
pub async fn growth_chart(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<GrowthChartData, WidgetError> {
    let q = ctx.query();
    let (transactions, clients) = futures::try_join!(
        list::<Transaction>(api, Collection::Transactions, &q),
        list::<Client>(api, Collection::Clients, &q),
    )?;

    let months = trailing_months(ctx.today, ctx.config.months_or(12));
    let revenue = sum_by_month(
        &months,
        transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| (t.date, t.amount)),
    );
    let new_clients = sum_by_month(&months, clients.iter().map(|c| (c.created_at.date_naive(), 1.0)));

    let last_two = |series: &[f64]| match series {
        [.., previous, current] => round_to(percentage_change(*current, *previous), 1),
        _ => 0.0,
    };

    Ok(GrowthChartData {
        revenue_growth: last_two(&revenue),
        clients_growth: last_two(&new_clients),
        months: months
            .iter()
            .zip(revenue.iter().zip(new_clients.iter()))
            .map(|(m, (revenue, clients))| GrowthPoint {
                month: m.key(),
                revenue: *revenue,
                new_clients: *clients as u64,
            })
            .collect(),
    })
}
