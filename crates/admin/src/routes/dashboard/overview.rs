//! Store overview page: revenue, sales, stock and a monthly revenue chart.

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tower_sessions::Session;
use tracing::instrument;

use storeadmin_core::StoreId;

use super::{Layout, PageError, PagePath, render};
use crate::filters;
use crate::middleware::RequireOwner;
use crate::services::{MonthlyRevenue, StoreOverview};
use crate::state::AppState;

/// One bar in the revenue chart.
#[derive(Debug, Clone)]
pub struct RevenueBar {
    pub month: &'static str,
    pub total: Decimal,
    /// Height relative to the best month, 0-100.
    pub percent: u32,
}

fn bars(months: &[MonthlyRevenue]) -> Vec<RevenueBar> {
    let peak = months
        .iter()
        .map(|m| m.total)
        .max()
        .unwrap_or(Decimal::ZERO);
    months
        .iter()
        .map(|m| RevenueBar {
            month: m.month,
            total: m.total,
            percent: if peak > Decimal::ZERO {
                (m.total * Decimal::ONE_HUNDRED / peak)
                    .round()
                    .to_u32()
                    .unwrap_or(0)
            } else {
                0
            },
        })
        .collect()
}

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate {
    layout: Layout,
    overview: StoreOverview,
    bars: Vec<RevenueBar>,
}

/// GET /{store_id}
#[instrument(skip(state, session, owner))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
) -> Result<Response, PageError> {
    let overview = state.catalog().overview(Some(owner.id), store_id).await?;
    let template = OverviewTemplate {
        bars: bars(&overview.monthly_revenue),
        layout: Layout::load(
            &state,
            &session,
            &owner,
            Some(overview.store.clone()),
            format!("/{store_id}"),
        )
        .await?,
        overview,
    };
    Ok(render(&template).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_scale_to_best_month() {
        let months = vec![
            MonthlyRevenue {
                month: "Jan",
                total: Decimal::new(50, 0),
            },
            MonthlyRevenue {
                month: "Feb",
                total: Decimal::new(200, 0),
            },
            MonthlyRevenue {
                month: "Mar",
                total: Decimal::ZERO,
            },
        ];
        let bars = bars(&months);
        assert_eq!(bars[0].percent, 25);
        assert_eq!(bars[1].percent, 100);
        assert_eq!(bars[2].percent, 0);
    }

    #[test]
    fn test_bars_without_revenue_are_flat() {
        let months = vec![MonthlyRevenue {
            month: "Jan",
            total: Decimal::ZERO,
        }];
        assert_eq!(bars(&months)[0].percent, 0);
    }
}
