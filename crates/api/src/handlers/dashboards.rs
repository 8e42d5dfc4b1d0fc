//! Handler rendering a full dashboard page.
//!
//! Loads the viewer's layout, places it for the requested viewport width and
//! resolves every widget concurrently. A widget whose fetch fails carries its
//! fallback data; the page itself never fails because of a widget.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use bizdash_core::grid::{self, Breakpoint};
use bizdash_core::layout::{DashboardPage, WidgetLayout};
use bizdash_core::types::Date;
use bizdash_widgets::{GlobalFilters, Resolved, WidgetContext};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::blocking;
use crate::middleware::viewer::Viewer;
use crate::query::FilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Viewport width assumed when the client does not send one.
pub const DEFAULT_WIDTH: u32 = 1280;

/// Query params for `GET /dashboards/{page}` besides the global filters.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    /// Viewport width in pixels.
    pub width: Option<u32>,
    /// Bypass cached widget data.
    #[serde(default)]
    pub refresh: bool,
}

/// One placed widget with its data.
#[derive(Debug, Serialize)]
pub struct PlacedWidget {
    pub layout: WidgetLayout,
    pub result: Resolved,
}

/// A rendered dashboard page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub page: DashboardPage,
    pub breakpoint: Breakpoint,
    pub cols: u32,
    pub filters: GlobalFilters,
    pub today: Date,
    pub widgets: Vec<PlacedWidget>,
    /// Number of widgets showing fallback data.
    pub fallbacks: usize,
}

/// GET /api/v1/dashboards/{page}
pub async fn get_dashboard(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(page): Path<String>,
    Query(view): Query<ViewParams>,
    Query(params): Query<FilterParams>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let (filters, today) = params.resolve()?;

    let layout = {
        let (layouts, id) = (state.layouts.clone(), viewer.id.clone());
        blocking(move || Ok(layouts.load(&id, page))).await?
    };
    let (breakpoint, placed) = grid::place(&layout, view.width.unwrap_or(DEFAULT_WIDTH));

    let batch: Vec<_> = placed
        .iter()
        .map(|item| {
            (
                item.widget_type,
                WidgetContext::new(item.config.clone(), filters.clone(), today),
            )
        })
        .collect();
    let results = state.widgets.resolve_many(batch, view.refresh).await;

    let widgets: Vec<PlacedWidget> = placed
        .into_iter()
        .zip(results)
        .map(|(layout, result)| PlacedWidget { layout, result })
        .collect();
    let fallbacks = widgets.iter().filter(|w| w.result.is_fallback()).count();

    if fallbacks > 0 {
        tracing::warn!(
            viewer = %viewer.id,
            page = %page.as_str(),
            fallbacks,
            widgets = widgets.len(),
            "Dashboard rendered with fallback widgets",
        );
    } else {
        tracing::debug!(
            viewer = %viewer.id,
            page = %page.as_str(),
            widgets = widgets.len(),
            "Dashboard rendered",
        );
    }

    Ok(Json(DataResponse {
        data: DashboardView {
            page,
            breakpoint,
            cols: breakpoint.cols(),
            filters,
            today,
            widgets,
            fallbacks,
        },
    }))
}
