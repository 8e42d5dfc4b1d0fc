//! Gantt chart date layout.
//!
//! Tasks arrive with partial date information; [`GanttTask::resolve`] fills
//! the gaps with a fixed fallback chain and [`position`] turns the result
//! into percentage offsets over a visible date window. All arithmetic is in
//! whole days so bars always align to day columns.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Working hours in one estimate day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Minimum rendered width of a deadline marker, in pixels.
pub const MARKER_MIN_WIDTH_PX: u32 = 12;

/// Minimum rendered width of a one-day bar, in pixels.
pub const BAR_MIN_WIDTH_PX: u32 = 4;

/// Longest window [`DateWindow::weeks_from`] builds.
pub const MAX_WINDOW_WEEKS: u32 = 52;

// ---------------------------------------------------------------------------
// Task input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
    Blocked,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
        TaskStatus::Blocked,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Bar color for the status.
    pub fn color(self) -> &'static str {
        match self {
            TaskStatus::Todo => "#9ca3af",
            TaskStatus::InProgress => "#3b82f6",
            TaskStatus::Review => "#f59e0b",
            TaskStatus::Done => "#22c55e",
            TaskStatus::Blocked => "#ef4444",
            TaskStatus::Cancelled => "#6b7280",
        }
    }

    pub fn is_open(self) -> bool {
        !matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Color of deadline markers.
pub const DEADLINE_COLOR: &str = "#dc2626";

/// A task as recorded by the backend, with whatever dates it has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDates {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub completed_at: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub progress: Option<u8>,
    /// Deadline pseudo-tasks render as a single-day marker.
    #[serde(default)]
    pub is_deadline: bool,
}

/// Estimate in whole days (8h per day, rounded up, at least one).
pub fn estimate_days(hours: Option<f64>) -> Option<u64> {
    match hours {
        Some(h) if h.is_finite() && h > 0.0 => Some(((h / HOURS_PER_DAY).ceil() as u64).max(1)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Resolved task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GanttKind {
    Bar,
    Deadline,
}

/// A task with every date the chart needs resolved. Recomputed on each
/// render; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttTask {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    /// `None` for deadline markers.
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub progress: u8,
    pub color: &'static str,
    pub kind: GanttKind,
}

impl GanttTask {
    /// Resolve the chart dates of a task.
    ///
    /// Start: explicit start, else due minus estimate, else creation date.
    /// End: completion, else due, else start plus estimate, else start plus
    /// one day. An end before the start is pulled up to the start.
    pub fn resolve(task: &TaskDates) -> Self {
        let estimate = estimate_days(task.estimated_hours);
        let progress = match (task.progress, task.status) {
            (_, TaskStatus::Done) => 100,
            (Some(p), _) => p.min(100),
            (None, _) => 0,
        };

        if task.is_deadline {
            let date = task.due_date.or(task.start_date).unwrap_or(task.created_at);
            return Self {
                id: task.id.clone(),
                title: task.title.clone(),
                start_date: date,
                end_date: None,
                due_date: Some(date),
                status: task.status,
                priority: task.priority,
                assignee: task.assignee.clone(),
                progress,
                color: DEADLINE_COLOR,
                kind: GanttKind::Deadline,
            };
        }

        // Estimates too large for the calendar fall through to the next link.
        let start = task
            .start_date
            .or_else(|| match (task.due_date, estimate) {
                (Some(due), Some(days)) => due.checked_sub_days(Days::new(days)),
                _ => None,
            })
            .unwrap_or(task.created_at);

        let end = task
            .completed_at
            .or(task.due_date)
            .or_else(|| estimate.and_then(|days| start.checked_add_days(Days::new(days))))
            .or_else(|| start.succ_opt())
            .unwrap_or(start)
            .max(start);

        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            start_date: start,
            end_date: Some(end),
            due_date: task.due_date,
            status: task.status,
            priority: task.priority,
            assignee: task.assignee.clone(),
            progress,
            color: task.status.color(),
            kind: GanttKind::Bar,
        }
    }

    /// Last day covered on the chart (the start day for markers).
    pub fn last_day(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }
}

// ---------------------------------------------------------------------------
// Visible window
// ---------------------------------------------------------------------------

/// Inclusive date range shown by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "Window end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        Self { start, end }
    }

    /// `weeks` full weeks starting on the Monday of `date`'s week, clamped
    /// to `1..=MAX_WINDOW_WEEKS`.
    pub fn weeks_from(date: NaiveDate, weeks: u32) -> Self {
        let monday = date.week(Weekday::Mon).first_day();
        let days = u64::from(weeks.clamp(1, MAX_WINDOW_WEEKS)) * 7 - 1;
        Self {
            start: monday,
            end: monday.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Number of day columns: `days(window) + 1`.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    fn offset_pct(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.total_days() as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Positioning
// ---------------------------------------------------------------------------

/// Horizontal placement of one task, in percent of the chart width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttBar {
    pub left: f64,
    pub width: f64,
    pub kind: GanttKind,
    pub min_width_px: u32,
    /// Whether the task starts before the window (left edge clipped).
    pub clipped_start: bool,
    /// Whether the task ends after the window (right edge clipped).
    pub clipped_end: bool,
}

/// Place a task over a window, or `None` when it is entirely outside.
pub fn position(task: &GanttTask, window: &DateWindow) -> Option<GanttBar> {
    let (start, end) = (task.start_date, task.last_day());
    if end < window.start || start > window.end {
        return None;
    }

    let clipped_start = start.max(window.start);
    let clipped_end = end.min(window.end);
    let left = window.offset_pct(clipped_start);

    let bar = match task.kind {
        GanttKind::Deadline => GanttBar {
            left,
            width: 0.0,
            kind: GanttKind::Deadline,
            min_width_px: MARKER_MIN_WIDTH_PX,
            clipped_start: false,
            clipped_end: false,
        },
        GanttKind::Bar => {
            let days = (clipped_end - clipped_start).num_days() + 1;
            GanttBar {
                left,
                width: days as f64 / window.total_days() as f64 * 100.0,
                kind: GanttKind::Bar,
                min_width_px: BAR_MIN_WIDTH_PX,
                clipped_start: start < window.start,
                clipped_end: end > window.end,
            }
        }
    };
    Some(bar)
}

/// Offset of the today line, or `None` when today is outside the window.
pub fn today_marker(today: NaiveDate, window: &DateWindow) -> Option<f64> {
    window.contains(today).then(|| window.offset_pct(today))
}

/// One visible row of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttRow {
    pub task: GanttTask,
    pub bar: GanttBar,
}

/// Everything needed to draw the chart for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttLayout {
    pub window: DateWindow,
    pub total_days: i64,
    pub rows: Vec<GanttRow>,
    pub today: Option<f64>,
}

/// Resolve and position every task, skipping those outside the window.
/// Rows are ordered by start date, then title.
pub fn layout_rows(tasks: &[TaskDates], window: &DateWindow, today: NaiveDate) -> GanttLayout {
    let mut rows: Vec<GanttRow> = tasks
        .iter()
        .map(GanttTask::resolve)
        .filter_map(|task| position(&task, window).map(|bar| GanttRow { task, bar }))
        .collect();
    rows.sort_by(|a, b| {
        a.task
            .start_date
            .cmp(&b.task.start_date)
            .then_with(|| a.task.title.cmp(&b.task.title))
    });

    GanttLayout {
        window: *window,
        total_days: window.total_days(),
        rows,
        today: today_marker(today, window),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn task(id: &str) -> TaskDates {
        TaskDates {
            id: id.to_string(),
            title: format!("Task {id}"),
            start_date: None,
            due_date: None,
            created_at: d(2026, 3, 1),
            completed_at: None,
            estimated_hours: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assignee: None,
            progress: None,
            is_deadline: false,
        }
    }

    fn window() -> DateWindow {
        DateWindow::new(d(2026, 3, 1), d(2026, 3, 10)).unwrap()
    }

    // -- Date resolution -----------------------------------------------------

    #[test]
    fn explicit_start_wins() {
        let mut t = task("1");
        t.start_date = Some(d(2026, 3, 5));
        t.due_date = Some(d(2026, 3, 9));
        let g = GanttTask::resolve(&t);
        assert_eq!(g.start_date, d(2026, 3, 5));
        assert_eq!(g.end_date, Some(d(2026, 3, 9)));
    }

    #[test]
    fn start_falls_back_to_due_minus_estimate() {
        let mut t = task("1");
        t.due_date = Some(d(2026, 3, 20));
        t.estimated_hours = Some(20.0);
        let g = GanttTask::resolve(&t);
        assert_eq!(g.start_date, d(2026, 3, 17));
    }

    #[test]
    fn start_falls_back_to_creation_date() {
        let mut t = task("1");
        t.due_date = Some(d(2026, 3, 20));
        let g = GanttTask::resolve(&t);
        assert_eq!(g.start_date, d(2026, 3, 1));
    }

    #[test]
    fn end_prefers_completion_over_due() {
        let mut t = task("1");
        t.due_date = Some(d(2026, 3, 20));
        t.completed_at = Some(d(2026, 3, 18));
        t.status = TaskStatus::Done;
        let g = GanttTask::resolve(&t);
        assert_eq!(g.end_date, Some(d(2026, 3, 18)));
        assert_eq!(g.progress, 100);
    }

    #[test]
    fn end_falls_back_to_start_plus_estimate_then_one_day() {
        let mut t = task("1");
        t.start_date = Some(d(2026, 3, 2));
        t.estimated_hours = Some(16.0);
        assert_eq!(GanttTask::resolve(&t).end_date, Some(d(2026, 3, 4)));

        t.estimated_hours = None;
        assert_eq!(GanttTask::resolve(&t).end_date, Some(d(2026, 3, 3)));
    }

    #[test]
    fn end_before_start_is_pulled_up() {
        let mut t = task("1");
        t.start_date = Some(d(2026, 3, 8));
        t.due_date = Some(d(2026, 3, 4));
        let g = GanttTask::resolve(&t);
        assert_eq!(g.end_date, Some(d(2026, 3, 8)));
    }

    #[test]
    fn estimate_days_rounds_up() {
        assert_eq!(estimate_days(Some(1.0)), Some(1));
        assert_eq!(estimate_days(Some(8.0)), Some(1));
        assert_eq!(estimate_days(Some(9.0)), Some(2));
        assert_eq!(estimate_days(Some(0.0)), None);
        assert_eq!(estimate_days(None), None);
    }

    #[test]
    fn oversized_estimate_falls_through_the_date_chain() {
        let mut t = task("huge");
        t.due_date = Some(d(2026, 3, 20));
        t.estimated_hours = Some(1e12);
        let resolved = GanttTask::resolve(&t);
        assert_eq!(resolved.start_date, d(2026, 3, 1));
        assert_eq!(resolved.end_date, Some(d(2026, 3, 20)));

        let mut open_ended = task("open");
        open_ended.estimated_hours = Some(f64::MAX);
        let resolved = GanttTask::resolve(&open_ended);
        assert_eq!(resolved.start_date, d(2026, 3, 1));
        assert_eq!(resolved.end_date, Some(d(2026, 3, 2)));
    }

    #[test]
    fn progress_is_clamped() {
        let mut t = task("1");
        t.progress = Some(250);
        assert_eq!(GanttTask::resolve(&t).progress, 100);
    }

    // -- Positioning ---------------------------------------------------------

    #[test]
    fn task_outside_window_is_skipped() {
        let mut before = task("1");
        before.start_date = Some(d(2026, 2, 1));
        before.due_date = Some(d(2026, 2, 28));
        assert!(position(&GanttTask::resolve(&before), &window()).is_none());

        let mut after = task("2");
        after.start_date = Some(d(2026, 3, 11));
        after.due_date = Some(d(2026, 3, 12));
        assert!(position(&GanttTask::resolve(&after), &window()).is_none());
    }

    #[test]
    fn bar_inside_window_uses_whole_days() {
        let mut t = task("1");
        t.start_date = Some(d(2026, 3, 3));
        t.due_date = Some(d(2026, 3, 4));
        let bar = position(&GanttTask::resolve(&t), &window()).unwrap();
        assert!((bar.left - 20.0).abs() < 1e-9);
        assert!((bar.width - 20.0).abs() < 1e-9);
        assert!(!bar.clipped_start && !bar.clipped_end);
    }

    #[test]
    fn bar_is_clipped_at_both_edges() {
        let mut t = task("1");
        t.start_date = Some(d(2026, 2, 20));
        t.due_date = Some(d(2026, 4, 2));
        let bar = position(&GanttTask::resolve(&t), &window()).unwrap();
        assert_eq!(bar.left, 0.0);
        assert!((bar.width - 100.0).abs() < 1e-9);
        assert!(bar.clipped_start && bar.clipped_end);
    }

    #[test]
    fn intersecting_bars_stay_within_bounds() {
        let w = window();
        for start_day in 1..=28 {
            for len in 0..20 {
                let mut t = task("x");
                let start = d(2026, 2, 20) + Duration::days(start_day);
                t.start_date = Some(start);
                t.due_date = Some(start + Duration::days(len));
                if let Some(bar) = position(&GanttTask::resolve(&t), &w) {
                    assert!(bar.left >= 0.0);
                    assert!(bar.left + bar.width <= 100.0 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn deadline_renders_as_marker() {
        let mut t = task("1");
        t.is_deadline = true;
        t.due_date = Some(d(2026, 3, 6));
        let g = GanttTask::resolve(&t);
        assert_eq!(g.kind, GanttKind::Deadline);
        assert_eq!(g.end_date, None);
        let bar = position(&g, &window()).unwrap();
        assert_eq!(bar.width, 0.0);
        assert_eq!(bar.min_width_px, MARKER_MIN_WIDTH_PX);
        assert!((bar.left - 50.0).abs() < 1e-9);
    }

    #[test]
    fn today_marker_only_inside_window() {
        let w = window();
        assert_eq!(today_marker(d(2026, 3, 1), &w), Some(0.0));
        assert!((today_marker(d(2026, 3, 6), &w).unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(today_marker(d(2026, 3, 11), &w), None);
    }

    // -- Windows -------------------------------------------------------------

    #[test]
    fn inverted_window_is_rejected() {
        assert!(DateWindow::new(d(2026, 3, 2), d(2026, 3, 1)).is_err());
    }

    #[test]
    fn month_window() {
        let w = DateWindow::month_of(d(2026, 2, 14));
        assert_eq!(w.start, d(2026, 2, 1));
        assert_eq!(w.end, d(2026, 2, 28));
        assert_eq!(w.total_days(), 28);

        let dec = DateWindow::month_of(d(2026, 12, 31));
        assert_eq!(dec.end, d(2026, 12, 31));
    }

    #[test]
    fn weeks_window_starts_on_monday() {
        // 2026-10-15 is a Thursday.
        let w = DateWindow::weeks_from(d(2026, 10, 15), 2);
        assert_eq!(w.start, d(2026, 10, 12));
        assert_eq!(w.end, d(2026, 10, 25));
        assert_eq!(w.total_days(), 14);
    }

    #[test]
    fn weeks_window_is_capped() {
        let w = DateWindow::weeks_from(d(2026, 3, 1), u32::MAX);
        assert_eq!(w.start, d(2026, 2, 23));
        assert_eq!(w.total_days(), i64::from(MAX_WINDOW_WEEKS) * 7);

        let zero = DateWindow::weeks_from(d(2026, 3, 1), 0);
        assert_eq!(zero.total_days(), 7);
    }

    #[test]
    fn layout_skips_invisible_rows_and_sorts_by_start() {
        let mut late = task("late");
        late.start_date = Some(d(2026, 3, 8));
        let mut early = task("early");
        early.start_date = Some(d(2026, 3, 2));
        let mut hidden = task("hidden");
        hidden.start_date = Some(d(2026, 5, 1));

        let layout = layout_rows(&[late, early, hidden], &window(), d(2026, 3, 4));
        let ids: Vec<_> = layout.rows.iter().map(|r| r.task.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert_eq!(layout.total_days, 10);
        assert!(layout.today.is_some());
    }
}
