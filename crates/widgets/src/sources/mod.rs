//! Fetch routines, one per widget type, grouped by dashboard area.
//!
//! Each routine reads backend collections and aggregates client-side. None
//! of them mutate what they fetched beyond sorting local copies.

pub mod commercial;
pub mod finance;
pub mod metrics;
pub mod overview;
pub mod projects;

use bizdash_backend::models::ProjectTask;
use bizdash_core::types::Date;

use crate::data::TaskItem;

pub(crate) fn task_item(task: &ProjectTask, today: Date) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        status: task.status.as_str().to_string(),
        priority: task.priority.as_str().to_string(),
        due_date: task.due_date,
        assignee: task.assignee_name.clone(),
        overdue: task.is_overdue(today),
    }
}

/// Earliest due date first, undated tasks last, urgent before low on ties.
pub(crate) fn by_due_date(a: &ProjectTask, b: &ProjectTask) -> std::cmp::Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| b.priority.cmp(&a.priority))
    .then_with(|| a.title.cmp(&b.title))
}
