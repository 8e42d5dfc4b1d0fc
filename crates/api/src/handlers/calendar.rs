//! Handler for the company calendar.
//!
//! Holidays and the summer period are computed locally; vacations, agenda
//! events and employee anniversaries come from the backend. A backend
//! collection that cannot be read is left out of the calendar instead of
//! failing the whole request.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use bizdash_backend::models::{AgendaEvent, Employee, VacationRequest};
use bizdash_backend::{BackendApi, Collection, ListQuery};
use bizdash_core::calendar::{self, CalendarEvent, CalendarSources, EventType};
use bizdash_core::error::CoreError;
use bizdash_core::types::Date;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::query::local_today;
use crate::response::DataResponse;
use crate::state::AppState;

/// Years the calendar can be built for.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

/// Query params for `GET /calendar/{year}`.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    /// Comma-separated event types; empty selects all.
    pub types: Option<String>,
    pub today: Option<Date>,
}

/// Legend entry for one event type.
#[derive(Debug, Serialize)]
pub struct EventTypeInfo {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub year: i32,
    pub events: Vec<CalendarEvent>,
    pub legend: Vec<EventTypeInfo>,
}

/// GET /api/v1/calendar/{year}
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Query(params): Query<CalendarParams>,
) -> AppResult<impl IntoResponse> {
    if !YEAR_RANGE.contains(&year) {
        return Err(CoreError::Validation(format!(
            "Year must be between {} and {}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        ))
        .into());
    }
    let active = calendar::parse_filter(params.types.as_deref())?;
    let today = params.today.unwrap_or_else(local_today);

    let api = state.backend.as_ref();
    let span = year_query(year);
    let all = ListQuery::new();
    let (vacations, agenda, employees) = tokio::join!(
        list_or_empty::<VacationRequest>(api, Collection::VacationRequests, &span),
        list_or_empty::<AgendaEvent>(api, Collection::AgendaEvents, &span),
        list_or_empty::<Employee>(api, Collection::Employees, &all),
    );

    let sources = CalendarSources {
        vacations: vacations.iter().map(VacationRequest::to_span).collect(),
        agenda: agenda.iter().map(AgendaEvent::to_entry).collect(),
        employees: employees
            .iter()
            .filter(|e| e.is_active)
            .map(Employee::to_employee_dates)
            .collect(),
    };

    let events = calendar::filter_events(&calendar::build_events(year, today, &sources), &active);
    let legend = EventType::ALL
        .into_iter()
        .filter(|t| active.contains(t))
        .map(|event_type| EventTypeInfo {
            event_type,
            color: event_type.color(),
            count: events.iter().filter(|e| e.event_type == event_type).count(),
        })
        .collect();

    tracing::debug!(year, events = events.len(), "Calendar built");

    Ok(Json(DataResponse {
        data: CalendarView {
            year,
            events,
            legend,
        },
    }))
}

fn year_query(year: i32) -> ListQuery {
    ListQuery::new().between(
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    )
}

async fn list_or_empty<T: DeserializeOwned>(
    api: &dyn BackendApi,
    collection: Collection,
    query: &ListQuery,
) -> Vec<T> {
    match bizdash_backend::list(api, collection, query).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                collection = %collection,
                error = %e,
                "Calendar source unavailable, leaving it out",
            );
            Vec::new()
        }
    }
}
