//! Project and staffing widgets.

use std::collections::HashMap;

use bizdash_backend::models::{Employee, Project, ProjectStats, ProjectStatus, ProjectTask, TimeEntry};
use bizdash_backend::{fetch_one, list, BackendApi, Collection};
use bizdash_core::gantt::TaskStatus;
use bizdash_core::stats::{count_by, percentage_change, ratio_pct, round_to, YearMonth};
use bizdash_core::types::Date;
use chrono::{Datelike, Duration};

use super::{by_due_date, task_item};
use crate::context::WidgetContext;
use crate::data::{
    EmployeesCountData, KanbanColumn, ProjectItem, ProjectsActiveData, ProjectsStatusData,
    StatusCount, TasksKanbanData, WorkloadData, WorkloadItem,
};
use crate::error::WidgetError;

/// Weekly capacity assumed for employees without one on file.
const DEFAULT_WEEKLY_HOURS: f64 = 40.0;

pub async fn projects_active(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<ProjectsActiveData, WidgetError> {
    let q = ctx.query();
    let (stats, projects) = futures::try_join!(
        fetch_one::<ProjectStats>(api, Collection::ProjectStats, &q),
        list::<Project>(api, Collection::Projects, &q),
    )?;

    let mut active: Vec<Project> = projects
        .into_iter()
        .filter(|p| p.status == ProjectStatus::Active)
        .collect();
    // Closest end date first; open-ended projects last.
    active.sort_by_key(|p| (p.end_date.is_none(), p.end_date, p.name.clone()));

    Ok(ProjectsActiveData {
        count: stats.active,
        total: stats.total,
        completed_this_month: stats.completed_this_month,
        overdue: stats.overdue,
        items: active
            .into_iter()
            .take(ctx.config.limit_or(5))
            .map(|p| ProjectItem {
                id: p.id,
                name: p.name,
                client_name: p.client_name,
                progress: p.progress.unwrap_or(0.0).clamp(0.0, 100.0),
                end_date: p.end_date,
            })
            .collect(),
    })
}

pub async fn projects_status(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<ProjectsStatusData, WidgetError> {
    let projects: Vec<Project> = list(api, Collection::Projects, &ctx.query()).await?;
    let statuses = count_by(&ProjectStatus::ALL, projects.iter().map(|p| p.status))
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.as_str().to_string(),
            count,
        })
        .collect();

    Ok(ProjectsStatusData {
        statuses,
        total: projects.len() as u64,
    })
}

/// Tasks grouped into one column per status; `limit` caps each column.
pub async fn tasks_kanban(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<TasksKanbanData, WidgetError> {
    let mut tasks: Vec<ProjectTask> = list(api, Collection::ProjectTasks, &ctx.query()).await?;
    tasks.sort_by(by_due_date);
    let per_column = ctx.config.limit_or(10);

    let columns = TaskStatus::ALL
        .iter()
        .filter(|status| **status != TaskStatus::Cancelled)
        .map(|status| {
            let in_column: Vec<&ProjectTask> =
                tasks.iter().filter(|t| t.status == *status).collect();
            KanbanColumn {
                status: status.as_str().to_string(),
                count: in_column.len() as u64,
                tasks: in_column
                    .into_iter()
                    .take(per_column)
                    .map(|t| task_item(t, ctx.today))
                    .collect(),
            }
        })
        .collect();
    Ok(TasksKanbanData { columns })
}

pub async fn employees_count(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<EmployeesCountData, WidgetError> {
    let employees: Vec<Employee> = list(api, Collection::Employees, &ctx.query()).await?;
    let this_month = YearMonth::of(ctx.today);
    let active: Vec<&Employee> = employees.iter().filter(|e| e.is_active).collect();
    let new_this_month = active
        .iter()
        .filter(|e| e.hire_date.is_some_and(|d| this_month.contains(d)))
        .count() as u64;
    let previous = active.len() as u64 - new_this_month;

    Ok(EmployeesCountData {
        count: employees.len() as u64,
        active: active.len() as u64,
        new_this_month,
        growth: round_to(percentage_change(active.len() as f64, previous as f64), 1),
    })
}

/// The period a workload chart covers: the filter range when both ends are
/// set, otherwise the Monday-to-Sunday week containing `today`.
fn workload_period(ctx: &WidgetContext) -> (Date, Date) {
    match (ctx.filters.from, ctx.filters.to) {
        (Some(from), Some(to)) if from <= to => (from, to),
        _ => {
            let monday =
                ctx.today - Duration::days(i64::from(ctx.today.weekday().num_days_from_monday()));
            (monday, monday + Duration::days(6))
        }
    }
}

/// Logged hours against capacity, busiest first.
pub async fn workload(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<WorkloadData, WidgetError> {
    let (from, to) = workload_period(ctx);
    let q = ctx.query().between(Some(from), Some(to));
    let (entries, employees) = futures::try_join!(
        list::<TimeEntry>(api, Collection::TimeEntries, &q),
        list::<Employee>(api, Collection::Employees, &q),
    )?;

    let period_days = (to - from).num_days() + 1;
    let mut rows: HashMap<String, WorkloadItem> = employees
        .iter()
        .filter(|e| e.is_active)
        .map(|e| {
            let weekly = e.weekly_hours.unwrap_or(DEFAULT_WEEKLY_HOURS);
            (
                e.id.clone(),
                WorkloadItem {
                    employee_id: e.id.clone(),
                    name: e.full_name(),
                    hours: 0.0,
                    capacity: round_to(weekly * period_days as f64 / 7.0, 1),
                    utilization: 0.0,
                },
            )
        })
        .collect();

    for entry in entries.iter().filter(|e| e.date >= from && e.date <= to) {
        rows.entry(entry.employee_id.clone())
            .or_insert_with(|| WorkloadItem {
                employee_id: entry.employee_id.clone(),
                name: entry.employee_name.clone(),
                hours: 0.0,
                capacity: round_to(DEFAULT_WEEKLY_HOURS * period_days as f64 / 7.0, 1),
                utilization: 0.0,
            })
            .hours += entry.hours;
    }

    let mut items: Vec<WorkloadItem> = rows
        .into_values()
        .map(|mut item| {
            item.hours = round_to(item.hours, 2);
            item.utilization = round_to(ratio_pct(item.hours, item.capacity), 1);
            item
        })
        .collect();
    items.sort_by(|a, b| {
        b.utilization
            .total_cmp(&a.utilization)
            .then_with(|| a.name.cmp(&b.name))
    });

    let total_hours = round_to(items.iter().map(|i| i.hours).sum(), 2);
    items.truncate(ctx.config.limit_or(10));
    Ok(WorkloadData {
        period_days,
        employees: items,
        total_hours,
    })
}
