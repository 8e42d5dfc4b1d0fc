//! Handlers for per-viewer dashboard layouts.
//!
//! Every endpoint is scoped to the [`Viewer`] and a [`DashboardPage`]. Layouts
//! are stored in canonical 12-column coordinates; edits and additions are
//! applied on that grid and the whole result is persisted before responding.
//! Store access runs on the blocking pool.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizdash_core::grid::{self, GridEdit, MAX_COLS};
use bizdash_core::layout::{DashboardPage, WidgetLayout};
use bizdash_core::widget::{WidgetConfig, WidgetType};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::blocking;
use crate::middleware::viewer::Viewer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /dashboards/{page}/layout/edits`.
#[derive(Debug, Deserialize)]
pub struct EditLayoutRequest {
    /// Whether the dashboard is in edit mode. Gestures outside edit mode
    /// are rejected.
    pub editable: bool,
    pub edit: GridEdit,
}

/// Body of `POST /dashboards/{page}/layout/widgets`.
#[derive(Debug, Deserialize)]
pub struct AddWidgetRequest {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default)]
    pub config: WidgetConfig,
}

/// Result of adding a widget: the new layout and the created slot.
#[derive(Debug, Serialize)]
pub struct AddedWidget {
    pub layout: Vec<WidgetLayout>,
    pub widget: WidgetLayout,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboards/{page}/layout
///
/// The viewer's saved layout, or the page default.
pub async fn get_layout(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let layout = blocking(move || Ok(state.layouts.load(&viewer.id, page))).await?;

    Ok(Json(DataResponse { data: layout }))
}

/// PUT /api/v1/dashboards/{page}/layout
///
/// Replace the whole layout as given. An empty array is a valid layout.
pub async fn save_layout(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(page): Path<String>,
    Json(layout): Json<Vec<WidgetLayout>>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let layout = {
        let (layouts, id) = (state.layouts.clone(), viewer.id.clone());
        blocking(move || {
            layouts.save(&id, page, &layout)?;
            Ok(layout)
        })
        .await?
    };

    tracing::info!(
        viewer = %viewer.id,
        page = %page.as_str(),
        widgets = layout.len(),
        "Layout saved",
    );

    Ok(Json(DataResponse { data: layout }))
}

/// POST /api/v1/dashboards/{page}/layout/edits
///
/// Apply a move or resize gesture and persist the compacted result.
pub async fn edit_layout(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(page): Path<String>,
    Json(input): Json<EditLayoutRequest>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let target = input.edit.target().to_string();
    let layout = {
        let (layouts, id) = (state.layouts.clone(), viewer.id.clone());
        blocking(move || {
            let current = layouts.load(&id, page);
            let layout = grid::apply_edit(&current, &input.edit, input.editable, MAX_COLS)?;
            layouts.save(&id, page, &layout)?;
            Ok(layout)
        })
        .await?
    };

    tracing::debug!(
        viewer = %viewer.id,
        page = %page.as_str(),
        widget = %target,
        "Layout edited",
    );

    Ok(Json(DataResponse { data: layout }))
}

/// POST /api/v1/dashboards/{page}/layout/widgets
///
/// Append a widget below the existing ones. A full dashboard answers 409.
pub async fn add_widget(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(page): Path<String>,
    Json(input): Json<AddWidgetRequest>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let (layout, widget) = {
        let (layouts, id) = (state.layouts.clone(), viewer.id.clone());
        blocking(move || {
            let current = layouts.load(&id, page);
            let (mut layout, mut widget) = grid::add_widget(&current, input.widget_type, MAX_COLS)?;

            if !input.config.is_empty() {
                widget.config = input.config;
                if let Some(slot) = layout.iter_mut().find(|item| item.id == widget.id) {
                    slot.config = widget.config.clone();
                }
            }
            layouts.save(&id, page, &layout)?;
            Ok((layout, widget))
        })
        .await?
    };

    tracing::info!(
        viewer = %viewer.id,
        page = %page.as_str(),
        widget_id = %widget.id,
        widget_type = %widget.widget_type,
        "Widget added",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AddedWidget { layout, widget },
        }),
    ))
}

/// DELETE /api/v1/dashboards/{page}/layout/widgets/{id}
///
/// Remove one widget and close the gap it leaves.
pub async fn remove_widget(
    viewer: Viewer,
    State(state): State<AppState>,
    Path((page, widget_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let layout = {
        let (layouts, id, widget_id) = (state.layouts.clone(), viewer.id.clone(), widget_id.clone());
        blocking(move || {
            let current = layouts.load(&id, page);
            let layout = grid::remove_widget(&current, &widget_id)?;
            layouts.save(&id, page, &layout)?;
            Ok(layout)
        })
        .await?
    };

    tracing::info!(
        viewer = %viewer.id,
        page = %page.as_str(),
        widget_id = %widget_id,
        "Widget removed",
    );

    Ok(Json(DataResponse { data: layout }))
}

/// DELETE /api/v1/dashboards/{page}/layout
///
/// Drop the viewer's customization; responds with the default layout.
pub async fn reset_layout(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page: DashboardPage = page.parse()?;
    let layout = {
        let (layouts, id) = (state.layouts.clone(), viewer.id.clone());
        blocking(move || Ok(layouts.reset(&id, page)?)).await?
    };

    tracing::info!(viewer = %viewer.id, page = %page.as_str(), "Layout reset");

    Ok(Json(DataResponse { data: layout }))
}
