//! Named metrics shared by `kpi-custom` and `goals-progress`.

use bizdash_backend::models::{ClientStats, Opportunity, OpportunityStage, ProjectStats, RevenueStats};
use bizdash_backend::{fetch_one, list, BackendApi, Collection};
use bizdash_core::currency::format_dashboard_amount;
use bizdash_core::stats::YearMonth;

use crate::context::WidgetContext;
use crate::error::WidgetError;

pub const REVENUE: &str = "revenue";
pub const CLIENTS: &str = "clients";
pub const OPPORTUNITIES_WON: &str = "opportunities-won";
pub const PROJECTS_COMPLETED: &str = "projects-completed";

/// Metric evaluated when a `kpi-custom` widget names none.
pub const DEFAULT_METRIC: &str = REVENUE;

/// This month's value and last month's, for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValue {
    pub current: f64,
    pub previous: f64,
    pub is_currency: bool,
}

impl MetricValue {
    pub fn formatted(&self) -> String {
        if self.is_currency {
            format_dashboard_amount(self.current)
        } else {
            format!("{}", self.current.round() as i64)
        }
    }
}

pub async fn evaluate(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
    metric: &str,
) -> Result<MetricValue, WidgetError> {
    let query = ctx.query();
    match metric {
        REVENUE => {
            let stats: RevenueStats = fetch_one(api, Collection::RevenueStats, &query).await?;
            Ok(MetricValue {
                current: stats.current_month,
                previous: stats.previous_month,
                is_currency: true,
            })
        }
        CLIENTS => {
            let stats: ClientStats = fetch_one(api, Collection::ClientStats, &query).await?;
            Ok(MetricValue {
                current: stats.count as f64,
                previous: stats.previous_count as f64,
                is_currency: false,
            })
        }
        OPPORTUNITIES_WON => {
            let opportunities: Vec<Opportunity> =
                list(api, Collection::Opportunities, &query).await?;
            let this_month = YearMonth::of(ctx.today);
            let last_month = this_month.previous();
            let won_in = |month: YearMonth| {
                opportunities
                    .iter()
                    .filter(|o| o.stage == OpportunityStage::Won)
                    .filter(|o| month.contains(o.updated_at.date_naive()))
                    .count() as f64
            };
            Ok(MetricValue {
                current: won_in(this_month),
                previous: won_in(last_month),
                is_currency: false,
            })
        }
        PROJECTS_COMPLETED => {
            let stats: ProjectStats = fetch_one(api, Collection::ProjectStats, &query).await?;
            Ok(MetricValue {
                current: stats.completed_this_month as f64,
                previous: 0.0,
                is_currency: false,
            })
        }
        other => Err(WidgetError::Config(format!("Unknown metric: {other}"))),
    }
}
