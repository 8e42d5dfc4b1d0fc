//! Company calendar: Quebec statutory holidays, the summer vacation period,
//! approved vacations, agenda events and employee anniversaries, merged
//! into one flat event list.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Event model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Holiday,
    SummerVacation,
    Vacation,
    Agenda,
    Birthday,
    HireAnniversary,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Holiday,
        EventType::SummerVacation,
        EventType::Vacation,
        EventType::Agenda,
        EventType::Birthday,
        EventType::HireAnniversary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Holiday => "holiday",
            EventType::SummerVacation => "summer-vacation",
            EventType::Vacation => "vacation",
            EventType::Agenda => "agenda",
            EventType::Birthday => "birthday",
            EventType::HireAnniversary => "hire-anniversary",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EventType::Holiday => "#ef4444",
            EventType::SummerVacation => "#fbbf24",
            EventType::Vacation => "#10b981",
            EventType::Agenda => "#3b82f6",
            EventType::Birthday => "#ec4899",
            EventType::HireAnniversary => "#8b5cf6",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown event type: {s}")))
    }
}

/// One day-granular calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub color: String,
}

impl CalendarEvent {
    fn new(id: String, title: String, date: NaiveDate, event_type: EventType) -> Self {
        Self {
            id,
            title,
            date,
            event_type,
            color: event_type.color().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A vacation request with its approval state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacationSpan {
    pub id: String,
    pub employee_name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub approved: bool,
}

/// An event from the external agenda, passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub color: Option<String>,
}

/// The dates of an employee the calendar cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDates {
    pub id: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
}

/// Collections merged into the calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarSources {
    pub vacations: Vec<VacationSpan>,
    pub agenda: Vec<AgendaEntry>,
    pub employees: Vec<EmployeeDates>,
}

// ---------------------------------------------------------------------------
// Holidays
// ---------------------------------------------------------------------------

/// Gregorian Easter Sunday (anonymous Gregorian / Gauss algorithm, integer
/// arithmetic only).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Good Friday: two days before Easter Sunday.
pub fn good_friday(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|easter| easter - Duration::days(2))
}

/// The `n`-th (1-based) `weekday` of a month.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// Last Monday strictly before May 25 (Journée nationale des patriotes).
fn patriots_day(year: i32) -> Option<NaiveDate> {
    let mut date = NaiveDate::from_ymd_opt(year, 5, 24)?;
    while date.weekday() != Weekday::Mon {
        date = date.pred_opt()?;
    }
    Some(date)
}

/// Quebec statutory holidays of `year` as `(slug, title, date)`.
pub fn quebec_holidays(year: i32) -> Vec<(&'static str, &'static str, NaiveDate)> {
    let easter = easter_sunday(year);
    let candidates = [
        ("new-year", "Jour de l'An", NaiveDate::from_ymd_opt(year, 1, 1)),
        ("good-friday", "Vendredi saint", good_friday(year)),
        (
            "easter-monday",
            "Lundi de Pâques",
            easter.map(|e| e + Duration::days(1)),
        ),
        (
            "patriots-day",
            "Journée nationale des patriotes",
            patriots_day(year),
        ),
        (
            "fete-nationale",
            "Fête nationale du Québec",
            NaiveDate::from_ymd_opt(year, 6, 24),
        ),
        ("canada-day", "Fête du Canada", NaiveDate::from_ymd_opt(year, 7, 1)),
        (
            "labour-day",
            "Fête du Travail",
            nth_weekday(year, 9, Weekday::Mon, 1),
        ),
        (
            "thanksgiving",
            "Action de grâce",
            nth_weekday(year, 10, Weekday::Mon, 2),
        ),
        ("christmas", "Noël", NaiveDate::from_ymd_opt(year, 12, 25)),
    ];
    candidates
        .into_iter()
        .filter_map(|(slug, title, date)| date.map(|d| (slug, title, d)))
        .collect()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Every day from `start` to `end`, inclusive. Empty when `end < start`.
fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Month/day of `date` in `year`; Feb 29 rolls over to Mar 1 in common years.
fn anniversary_in(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).or_else(|| {
        NaiveDate::from_ymd_opt(year, date.month(), 1)
            .and_then(|first| first.checked_add_signed(Duration::days(i64::from(date.day()) - 1)))
    })
}

fn holiday_events(year: i32) -> impl Iterator<Item = CalendarEvent> {
    quebec_holidays(year).into_iter().map(move |(slug, title, date)| {
        CalendarEvent::new(
            format!("holiday-{year}-{slug}"),
            title.to_string(),
            date,
            EventType::Holiday,
        )
    })
}

fn summer_events(year: i32) -> Vec<CalendarEvent> {
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 7, 1),
        NaiveDate::from_ymd_opt(year, 8, 31),
    ) else {
        return Vec::new();
    };
    days_between(start, end)
        .map(|date| {
            CalendarEvent::new(
                format!("summer-{date}"),
                "Vacances d'été".to_string(),
                date,
                EventType::SummerVacation,
            )
        })
        .collect()
}

fn vacation_events(vacations: &[VacationSpan]) -> Vec<CalendarEvent> {
    vacations
        .iter()
        .filter(|v| v.approved)
        .flat_map(|v| {
            days_between(v.start, v.end).map(move |date| {
                CalendarEvent::new(
                    format!("vacation-{}-{date}", v.id),
                    format!("Vacances : {}", v.employee_name),
                    date,
                    EventType::Vacation,
                )
            })
        })
        .collect()
}

fn agenda_events(agenda: &[AgendaEntry]) -> impl Iterator<Item = CalendarEvent> + '_ {
    agenda.iter().map(|entry| {
        let mut event = CalendarEvent::new(
            format!("agenda-{}", entry.id),
            entry.title.clone(),
            entry.date,
            EventType::Agenda,
        );
        if let Some(color) = &entry.color {
            event.color = color.clone();
        }
        event
    })
}

/// Birthdays in the current and the next year, for every employee with a
/// birthday on file.
fn birthday_events(employees: &[EmployeeDates], current_year: i32) -> Vec<CalendarEvent> {
    employees
        .iter()
        .filter_map(|e| e.birthday.map(|b| (e, b)))
        .flat_map(|(employee, birthday)| {
            [current_year, current_year + 1]
                .into_iter()
                .filter_map(move |year| {
                    anniversary_in(birthday, year).map(|date| {
                        CalendarEvent::new(
                            format!("birthday-{}-{year}", employee.id),
                            format!("Anniversaire : {}", employee.name),
                            date,
                            EventType::Birthday,
                        )
                    })
                })
        })
        .collect()
}

/// Hire-date anniversaries in the current year only, skipping hires dated
/// in a later year.
fn hire_anniversary_events(employees: &[EmployeeDates], current_year: i32) -> Vec<CalendarEvent> {
    employees
        .iter()
        .filter_map(|e| e.hire_date.map(|h| (e, h)))
        .filter(|(_, hired)| hired.year() <= current_year)
        .filter_map(|(employee, hired)| {
            let years = current_year - hired.year();
            let title = if years == 0 {
                format!("Embauche : {}", employee.name)
            } else {
                format!("{} : {years} an(s) de service", employee.name)
            };
            anniversary_in(hired, current_year).map(|date| {
                CalendarEvent::new(
                    format!("hire-{}-{current_year}", employee.id),
                    title,
                    date,
                    EventType::HireAnniversary,
                )
            })
        })
        .collect()
}

/// Build the full, unfiltered calendar for `year`.
///
/// Holidays and the summer period follow `year`. Anniversaries follow the
/// current year (the year of `today`): birthdays for the current and the
/// next year, hire dates for the current year only. Events are sorted by
/// date, then id.
pub fn build_events(year: i32, today: NaiveDate, sources: &CalendarSources) -> Vec<CalendarEvent> {
    let current_year = today.year();

    let mut events: Vec<CalendarEvent> = holiday_events(year).collect();
    events.extend(summer_events(year));
    events.extend(vacation_events(&sources.vacations));
    events.extend(agenda_events(&sources.agenda));
    events.extend(birthday_events(&sources.employees, current_year));
    events.extend(hire_anniversary_events(&sources.employees, current_year));

    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    events
}

/// Keep the events whose type is in `active`.
pub fn filter_events(events: &[CalendarEvent], active: &HashSet<EventType>) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|e| active.contains(&e.event_type))
        .cloned()
        .collect()
}

/// Parse a comma-separated filter list; an empty list selects every type.
pub fn parse_filter(raw: Option<&str>) -> Result<HashSet<EventType>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(EventType::ALL.into_iter().collect());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EventType::from_str)
        .collect()
}
