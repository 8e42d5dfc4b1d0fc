//! Responsive dashboard grid: breakpoints, vertical compaction and
//! edit-mode gestures (move / resize / add / remove).
//!
//! All functions are pure: they take a layout and return a new one. The
//! caller decides whether to persist the result.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::layout::{WidgetLayout, MAX_HEIGHT, MAX_ROW, MAX_WIDGETS};
use crate::widget::WidgetType;

// ---------------------------------------------------------------------------
// Breakpoints
// ---------------------------------------------------------------------------

/// Viewport classes, widest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl Breakpoint {
    /// `(breakpoint, min width px, columns)`, widest first.
    pub const TABLE: [(Breakpoint, u32, u32); 5] = [
        (Breakpoint::Lg, 1200, 12),
        (Breakpoint::Md, 996, 10),
        (Breakpoint::Sm, 768, 6),
        (Breakpoint::Xs, 480, 4),
        (Breakpoint::Xxs, 0, 2),
    ];

    /// Breakpoint for a viewport width in pixels.
    pub fn for_width(width_px: u32) -> Self {
        Self::TABLE
            .iter()
            .find(|(_, min, _)| width_px >= *min)
            .map(|(bp, _, _)| *bp)
            .unwrap_or(Breakpoint::Xxs)
    }

    pub fn cols(self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(bp, _, _)| *bp == self)
            .map(|(_, _, cols)| *cols)
            .unwrap_or(2)
    }
}

/// Column count of the widest breakpoint; layouts are stored at this width.
pub const MAX_COLS: u32 = 12;

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// A drag or resize gesture made in edit mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GridEdit {
    Move { id: String, x: u32, y: u32 },
    Resize { id: String, w: u32, h: u32 },
}

impl GridEdit {
    pub fn target(&self) -> &str {
        match self {
            GridEdit::Move { id, .. } | GridEdit::Resize { id, .. } => id.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Compaction
// ---------------------------------------------------------------------------

/// Slide every widget upward to remove empty rows.
///
/// Widgets are settled in `(y, x)` order; each rises until it would hit an
/// already-settled widget or row 0. A widget that overlaps a settled one is
/// pushed down below it instead. The output keeps the input order.
pub fn compact(layout: &[WidgetLayout]) -> Vec<WidgetLayout> {
    let mut order: Vec<usize> = (0..layout.len()).collect();
    order.sort_by_key(|&i| (layout[i].y, layout[i].x));

    let mut settled: Vec<(usize, WidgetLayout)> = Vec::with_capacity(layout.len());
    for i in order {
        let mut item = layout[i].clone();

        // Each settled widget can block at most once: `y` only grows.
        while let Some(blocker) = settled.iter().find(|(_, s)| s.collides(&item)) {
            item.y = blocker.1.bottom();
        }
        // Rising stops on the lowest settled edge above the widget.
        item.y = settled
            .iter()
            .filter(|(_, s)| s.overlaps_columns(&item) && s.bottom() <= item.y)
            .map(|(_, s)| s.bottom())
            .max()
            .unwrap_or(0);

        settled.push((i, item));
    }

    settled.sort_by_key(|(i, _)| *i);
    settled.into_iter().map(|(_, item)| item).collect()
}

/// Fit a layout to `cols` columns: widths are clamped to the column count
/// and widgets are shifted left so they stay inside the grid.
pub fn fit_to_columns(layout: &[WidgetLayout], cols: u32) -> Vec<WidgetLayout> {
    let cols = cols.max(1);
    let fitted: Vec<WidgetLayout> = layout
        .iter()
        .map(|item| {
            let mut item = item.clone();
            item.w = item.w.clamp(1, cols);
            item.x = item.x.min(cols - item.w);
            item
        })
        .collect();
    compact(&fitted)
}

/// Placement of a layout for a viewport width.
pub fn place(layout: &[WidgetLayout], width_px: u32) -> (Breakpoint, Vec<WidgetLayout>) {
    let breakpoint = Breakpoint::for_width(width_px);
    (breakpoint, fit_to_columns(layout, breakpoint.cols()))
}

// ---------------------------------------------------------------------------
// Gestures
// ---------------------------------------------------------------------------

/// Apply a move or resize gesture and return the compacted layout.
///
/// Gestures are only accepted in edit mode. Widgets overlapping the edited
/// one after the gesture are pushed below it before compaction.
pub fn apply_edit(
    layout: &[WidgetLayout],
    edit: &GridEdit,
    editable: bool,
    cols: u32,
) -> Result<Vec<WidgetLayout>, CoreError> {
    if !editable {
        return Err(CoreError::Forbidden(
            "Layout changes require edit mode".to_string(),
        ));
    }

    let cols = cols.max(1);
    let mut next = layout.to_vec();
    let idx = next
        .iter()
        .position(|item| item.id == edit.target())
        .ok_or_else(|| CoreError::NotFound {
            entity: "Widget",
            id: edit.target().to_string(),
        })?;

    {
        let item = &mut next[idx];
        match edit {
            GridEdit::Move { x, y, .. } => {
                item.x = (*x).min(cols.saturating_sub(item.w));
                item.y = (*y).min(MAX_ROW);
            }
            GridEdit::Resize { w, h, .. } => {
                let min_w = item.min_w.unwrap_or(1).max(1);
                let min_h = item.min_h.unwrap_or(1).clamp(1, MAX_HEIGHT);
                item.w = (*w).max(min_w).min(cols - item.x.min(cols - 1));
                item.h = (*h).clamp(min_h, MAX_HEIGHT);
            }
        }
    }

    let edited = next[idx].clone();
    for (i, other) in next.iter_mut().enumerate() {
        if i != idx && other.collides(&edited) {
            other.y = edited.bottom();
        }
    }

    Ok(compact(&next))
}

/// Append a widget of `widget_type` below the existing ones.
///
/// Returns the new layout and the created slot (with its generated id).
/// A full dashboard is a conflict: a widget must be removed first.
pub fn add_widget(
    layout: &[WidgetLayout],
    widget_type: WidgetType,
    cols: u32,
) -> Result<(Vec<WidgetLayout>, WidgetLayout), CoreError> {
    if layout.len() >= MAX_WIDGETS {
        return Err(CoreError::Conflict(format!(
            "Dashboard already holds {MAX_WIDGETS} widgets"
        )));
    }
    let bottom = layout.iter().map(WidgetLayout::bottom).max().unwrap_or(0);
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let id = format!("{widget_type}-{}", &suffix[..8]);

    let mut slot = WidgetLayout::new(id, widget_type, 0, bottom);
    slot.w = slot.w.clamp(1, cols.max(1));

    let mut next = layout.to_vec();
    next.push(slot);
    let next = compact(&next);
    let created = next[next.len() - 1].clone();
    Ok((next, created))
}

/// Remove a widget by id and close the gap it leaves.
pub fn remove_widget(layout: &[WidgetLayout], id: &str) -> Result<Vec<WidgetLayout>, CoreError> {
    if !layout.iter().any(|item| item.id == id) {
        return Err(CoreError::NotFound {
            entity: "Widget",
            id: id.to_string(),
        });
    }
    let remaining: Vec<WidgetLayout> = layout
        .iter()
        .filter(|item| item.id != id)
        .cloned()
        .collect();
    Ok(compact(&remaining))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::layout::DashboardPage;

    fn slot(id: &str, x: u32, y: u32, w: u32, h: u32) -> WidgetLayout {
        WidgetLayout::new(id, WidgetType::Stats, x, y).sized(w, h)
    }

    fn no_overlaps(layout: &[WidgetLayout]) -> bool {
        layout
            .iter()
            .enumerate()
            .all(|(i, a)| layout[i + 1..].iter().all(|b| !a.collides(b)))
    }

    // -- Breakpoints ---------------------------------------------------------

    #[test]
    fn breakpoint_table() {
        assert_eq!(Breakpoint::for_width(1920), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(1200), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(1199), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(996), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(800), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(480), Breakpoint::Xs);
        assert_eq!(Breakpoint::for_width(320), Breakpoint::Xxs);
    }

    #[test]
    fn breakpoint_columns() {
        assert_eq!(Breakpoint::Lg.cols(), 12);
        assert_eq!(Breakpoint::Md.cols(), 10);
        assert_eq!(Breakpoint::Sm.cols(), 6);
        assert_eq!(Breakpoint::Xs.cols(), 4);
        assert_eq!(Breakpoint::Xxs.cols(), 2);
    }

    // -- Compaction ----------------------------------------------------------

    #[test]
    fn compaction_removes_empty_rows() {
        let layout = vec![slot("a", 0, 3, 4, 2), slot("b", 4, 10, 4, 2)];
        let compacted = compact(&layout);
        assert_eq!(compacted[0].y, 0);
        assert_eq!(compacted[1].y, 0);
    }

    #[test]
    fn compaction_stacks_under_blockers() {
        let layout = vec![slot("top", 0, 0, 6, 3), slot("below", 2, 8, 2, 2)];
        let compacted = compact(&layout);
        assert_eq!(compacted[1].y, 3);
    }

    #[test]
    fn compaction_keeps_input_order() {
        let layout = vec![slot("late", 0, 5, 2, 2), slot("early", 2, 0, 2, 2)];
        let ids: Vec<_> = compact(&layout).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn compaction_resolves_overlaps() {
        let layout = vec![slot("a", 0, 0, 4, 2), slot("b", 0, 1, 4, 2)];
        let compacted = compact(&layout);
        assert_eq!(compacted[1].y, 2);
        assert!(no_overlaps(&compacted));
    }

    #[test]
    fn default_layouts_are_already_compact() {
        for page in DashboardPage::ALL {
            let layout = page.default_layout();
            assert_eq!(compact(&layout), layout, "{page}");
        }
    }

    // -- Breakpoint fitting --------------------------------------------------

    #[test]
    fn fitting_to_two_columns_stacks_everything() {
        let layout = DashboardPage::Main.default_layout();
        let (bp, placed) = place(&layout, 375);
        assert_eq!(bp, Breakpoint::Xxs);
        assert!(placed.iter().all(|i| i.x + i.w <= 2));
        assert!(no_overlaps(&placed));
    }

    #[test]
    fn wide_viewport_keeps_stored_layout() {
        let layout = DashboardPage::Finance.default_layout();
        let (_, placed) = place(&layout, 1440);
        assert_eq!(placed, layout);
    }

    // -- Gestures ------------------------------------------------------------

    #[test]
    fn edits_are_refused_outside_edit_mode() {
        let layout = vec![slot("a", 0, 0, 4, 2)];
        let edit = GridEdit::Move {
            id: "a".into(),
            x: 2,
            y: 0,
        };
        assert_matches!(
            apply_edit(&layout, &edit, false, 12),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn unknown_widget_is_not_found() {
        let layout = vec![slot("a", 0, 0, 4, 2)];
        let edit = GridEdit::Resize {
            id: "zzz".into(),
            w: 2,
            h: 2,
        };
        assert_matches!(
            apply_edit(&layout, &edit, true, 12),
            Err(CoreError::NotFound { .. })
        );
    }

    #[test]
    fn moving_onto_a_widget_pushes_it_down() {
        let layout = vec![slot("a", 0, 0, 4, 2), slot("b", 4, 0, 4, 2)];
        let edit = GridEdit::Move {
            id: "b".into(),
            x: 0,
            y: 0,
        };
        let next = apply_edit(&layout, &edit, true, 12).unwrap();
        let a = next.iter().find(|i| i.id == "a").unwrap();
        let b = next.iter().find(|i| i.id == "b").unwrap();
        assert_eq!((b.x, b.y), (0, 0));
        assert_eq!(a.y, 2);
        assert!(no_overlaps(&next));
    }

    #[test]
    fn moves_are_clamped_to_the_grid() {
        let layout = vec![slot("a", 0, 0, 4, 2)];
        let edit = GridEdit::Move {
            id: "a".into(),
            x: 11,
            y: 0,
        };
        let next = apply_edit(&layout, &edit, true, 12).unwrap();
        assert_eq!(next[0].x, 8);
    }

    #[test]
    fn resize_honors_minimums_and_grid_width() {
        let layout = vec![slot("a", 8, 0, 4, 2)];
        let shrink = GridEdit::Resize {
            id: "a".into(),
            w: 1,
            h: 1,
        };
        let next = apply_edit(&layout, &shrink, true, 12).unwrap();
        assert_eq!((next[0].w, next[0].h), (3, 2));

        let grow = GridEdit::Resize {
            id: "a".into(),
            w: 10,
            h: 3,
        };
        let next = apply_edit(&layout, &grow, true, 12).unwrap();
        assert_eq!((next[0].w, next[0].h), (4, 3));
    }

    #[test]
    fn growing_taller_pushes_neighbours_below() {
        let layout = vec![slot("a", 0, 0, 6, 2), slot("b", 0, 2, 6, 2)];
        let edit = GridEdit::Resize {
            id: "a".into(),
            w: 6,
            h: 4,
        };
        let next = apply_edit(&layout, &edit, true, 12).unwrap();
        assert_eq!(next[1].y, 4);
    }

    #[test]
    fn compaction_settles_distant_widgets_in_one_step() {
        let layout = vec![
            slot("a", 0, MAX_ROW, 6, 48),
            slot("b", 0, MAX_ROW, 6, 48),
            slot("c", 6, MAX_ROW - 1, 6, 2),
        ];
        let compacted = compact(&layout);
        assert_eq!(compacted[0].y, 0);
        assert_eq!(compacted[1].y, 48);
        assert_eq!(compacted[2].y, 0);
        assert!(no_overlaps(&compacted));
    }

    #[test]
    fn compaction_stops_under_the_nearest_edge_above() {
        // `late` shares columns with both; it stops under `mid`.
        let layout = vec![
            slot("top", 0, 0, 12, 2),
            slot("mid", 0, 2, 4, 3),
            slot("late", 2, 9, 4, 1),
        ];
        let compacted = compact(&layout);
        assert_eq!(compacted[1].y, 2);
        assert_eq!(compacted[2].y, 5);
    }

    #[test]
    fn moves_far_down_are_clamped_to_the_last_row() {
        let layout = vec![slot("a", 0, 0, 4, 2), slot("b", 4, 0, 4, 2)];
        let edit = GridEdit::Move {
            id: "a".into(),
            x: 0,
            y: u32::MAX,
        };
        let next = apply_edit(&layout, &edit, true, 12).unwrap();
        assert_eq!(next[0].y, 0);
        assert!(crate::layout::validate_layout(&next).is_ok());
    }

    #[test]
    fn resize_height_is_capped() {
        let layout = vec![slot("a", 0, 0, 4, 2)];
        let edit = GridEdit::Resize {
            id: "a".into(),
            w: 4,
            h: u32::MAX,
        };
        let next = apply_edit(&layout, &edit, true, 12).unwrap();
        assert_eq!(next[0].h, MAX_HEIGHT);
    }

    #[test]
    fn out_of_range_slots_do_not_overflow_edits() {
        let layout = vec![slot("wide", u32::MAX, 0, 12, 2), slot("a", 0, 0, 4, 2)];
        let edit = GridEdit::Move {
            id: "a".into(),
            x: 2,
            y: 1,
        };
        let next = apply_edit(&layout, &edit, true, 12).unwrap();
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn grid_edit_wire_format() {
        let edit: GridEdit = serde_json::from_str(r#"{"op":"move","id":"a","x":1,"y":2}"#).unwrap();
        assert_eq!(
            edit,
            GridEdit::Move {
                id: "a".into(),
                x: 1,
                y: 2
            }
        );
    }

    #[test]
    fn added_widget_lands_at_the_bottom_with_unique_id() {
        let layout = DashboardPage::Projects.default_layout();
        let (next, created) = add_widget(&layout, WidgetType::CashFlow, 12).unwrap();
        assert_eq!(next.len(), layout.len() + 1);
        assert!(created.id.starts_with("cash-flow-"));
        assert!(layout.iter().all(|i| i.id != created.id));
        assert_eq!(created.y, layout.iter().map(WidgetLayout::bottom).max().unwrap());
    }

    #[test]
    fn adding_to_a_full_dashboard_conflicts() {
        let full: Vec<WidgetLayout> = (0..MAX_WIDGETS as u32)
            .map(|i| slot(&format!("w{i}"), 0, i, 12, 1))
            .collect();
        assert_matches!(
            add_widget(&full, WidgetType::Tasks, 12),
            Err(CoreError::Conflict(_))
        );

        let (next, _) = add_widget(&full[1..], WidgetType::Tasks, 12).unwrap();
        assert_eq!(next.len(), MAX_WIDGETS);
    }

    #[test]
    fn removing_a_widget_closes_the_gap() {
        let layout = vec![slot("a", 0, 0, 12, 2), slot("b", 0, 2, 12, 2)];
        let next = remove_widget(&layout, "a").unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].y, 0);
        assert!(remove_widget(&layout, "missing").is_err());
    }
}
