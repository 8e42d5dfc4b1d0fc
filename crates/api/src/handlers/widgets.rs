//! Handlers for standalone widget data.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use bizdash_core::widget::{WidgetConfig, WidgetType};
use bizdash_widgets::WidgetContext;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::query::FilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Per-widget settings accepted as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct WidgetParams {
    pub limit: Option<usize>,
    pub metric: Option<String>,
    pub months: Option<u32>,
    /// Bypass cached data.
    #[serde(default)]
    pub refresh: bool,
}

impl WidgetParams {
    fn config(&self) -> WidgetConfig {
        WidgetConfig {
            limit: self.limit,
            metric: self.metric.clone(),
            months: self.months,
            goals: Vec::new(),
        }
    }
}

/// Catalogue entry for one widget type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTypeInfo {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub w: u32,
    pub h: u32,
    pub min_w: u32,
    pub min_h: u32,
}

/// GET /api/v1/widgets/types
///
/// Every widget type with its default footprint.
pub async fn list_types() -> AppResult<impl IntoResponse> {
    let types: Vec<WidgetTypeInfo> = WidgetType::ALL
        .into_iter()
        .map(|widget_type| {
            let size = widget_type.default_size();
            WidgetTypeInfo {
                widget_type,
                w: size.w,
                h: size.h,
                min_w: size.min_w,
                min_h: size.min_h,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: types }))
}

/// GET /api/v1/widgets/{type}
///
/// Resolve one widget outside of any layout. Always succeeds for a known
/// type: failures yield the type's fallback data.
pub async fn get_widget(
    State(state): State<AppState>,
    Path(widget_type): Path<String>,
    Query(widget): Query<WidgetParams>,
    Query(params): Query<FilterParams>,
) -> AppResult<impl IntoResponse> {
    let widget_type: WidgetType = widget_type.parse()?;
    let (filters, today) = params.resolve()?;
    let ctx = WidgetContext::new(widget.config(), filters, today);

    let resolved = if widget.refresh {
        state.widgets.refresh(widget_type, ctx).await
    } else {
        state.widgets.get_or_resolve(widget_type, ctx).await
    };

    Ok(Json(DataResponse { data: resolved }))
}
