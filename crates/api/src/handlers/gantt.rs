//! Handlers for Gantt chart layout.
//!
//! `POST /gantt/layout` positions caller-supplied tasks; the project variant
//! reads a project and its tasks from the backend first and adds the
//! project's end date as a deadline marker.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use bizdash_backend::models::{Project, ProjectStatus, ProjectTask};
use bizdash_backend::{BackendError, Collection, ListQuery};
use bizdash_core::error::CoreError;
use bizdash_core::gantt::{
    self, DateWindow, TaskDates, TaskPriority, TaskStatus, MAX_WINDOW_WEEKS,
};
use bizdash_core::types::Date;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::local_today;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /gantt/layout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttLayoutRequest {
    pub tasks: Vec<TaskDates>,
    pub window_start: Date,
    pub window_end: Date,
    /// Date of the "today" marker. Defaults to the server's local date.
    pub today: Option<Date>,
}

/// Window selection for `GET /gantt/projects/{id}`.
///
/// An explicit `start`/`end` pair wins, then `weeks` from the current week,
/// then the current month.
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub weeks: Option<u32>,
    pub today: Option<Date>,
}

impl WindowParams {
    fn window(&self, today: Date) -> Result<DateWindow, CoreError> {
        match (self.start, self.end, self.weeks) {
            (Some(start), Some(end), _) => DateWindow::new(start, end),
            (None, None, Some(weeks)) if (1..=MAX_WINDOW_WEEKS).contains(&weeks) => {
                Ok(DateWindow::weeks_from(today, weeks))
            }
            (None, None, Some(_)) => Err(CoreError::Validation(format!(
                "weeks must be between 1 and {MAX_WINDOW_WEEKS}"
            ))),
            (None, None, None) => Ok(DateWindow::month_of(today)),
            _ => Err(CoreError::Validation(
                "start and end must be given together".to_string(),
            )),
        }
    }
}

/// POST /api/v1/gantt/layout
pub async fn layout(Json(input): Json<GanttLayoutRequest>) -> AppResult<impl IntoResponse> {
    let window = DateWindow::new(input.window_start, input.window_end)?;
    let today = input.today.unwrap_or_else(local_today);
    let layout = gantt::layout_rows(&input.tasks, &window, today);

    tracing::debug!(
        tasks = input.tasks.len(),
        rows = layout.rows.len(),
        "Gantt layout computed",
    );

    Ok(Json(DataResponse { data: layout }))
}

/// GET /api/v1/gantt/projects/{id}
pub async fn project_layout(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<WindowParams>,
) -> AppResult<impl IntoResponse> {
    let today = params.today.unwrap_or_else(local_today);
    let window = params.window(today)?;

    let task_query = ListQuery::new().filter("project_id", project_id.clone());
    let (project, tasks) = tokio::try_join!(
        bizdash_backend::get::<Project>(state.backend.as_ref(), Collection::Projects, &project_id),
        bizdash_backend::list::<ProjectTask>(
            state.backend.as_ref(),
            Collection::ProjectTasks,
            &task_query
        ),
    )
    .map_err(|e| not_found_or_upstream(e, &project_id))?;

    let mut dates: Vec<TaskDates> = tasks
        .iter()
        .filter(|task| task.project_id == project.id)
        .map(ProjectTask::to_task_dates)
        .collect();
    dates.extend(deadline_marker(&project));

    let layout = gantt::layout_rows(&dates, &window, today);

    tracing::debug!(
        project_id = %project.id,
        tasks = dates.len(),
        rows = layout.rows.len(),
        "Project Gantt layout computed",
    );

    Ok(Json(DataResponse { data: layout }))
}

/// The project's end date as a single-day marker.
fn deadline_marker(project: &Project) -> Option<TaskDates> {
    let end = project.end_date?;
    let status = match project.status {
        ProjectStatus::Completed => TaskStatus::Done,
        ProjectStatus::Cancelled => TaskStatus::Cancelled,
        _ => TaskStatus::Todo,
    };
    Some(TaskDates {
        id: format!("deadline-{}", project.id),
        title: format!("Échéance : {}", project.name),
        start_date: None,
        due_date: Some(end),
        created_at: project.created_at.date_naive(),
        completed_at: None,
        estimated_hours: None,
        status,
        priority: TaskPriority::High,
        assignee: None,
        progress: None,
        is_deadline: true,
    })
}

fn not_found_or_upstream(err: BackendError, project_id: &str) -> AppError {
    if err.is_not_found() {
        AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id.to_string(),
        })
    } else {
        AppError::Backend(err)
    }
}
