//! Monthly budget route.

use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::{Query, QueryRejection};
use chrono::NaiveDate;
use moneta_core::Clock;
use moneta_core::budget::BudgetSnapshot;
use moneta_core::dates::calendar::at_day_start;
use serde::Deserialize;

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/budgets", get(get_budget))
}

/// Query string of `GET /budgets`.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    /// Any day of the wanted month, `YYYY-MM-DD`. Defaults to today.
    pub date: Option<NaiveDate>,
}

/// GET /budgets
///
/// Days are interpreted in the configured default time zone.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Json<BudgetSnapshot>, ApiError> {
    let Query(query) = query?;
    let tz = state.default_timezone;

    let date = match query.date {
        Some(day) => at_day_start(&tz, day),
        None => state.clock.now().with_timezone(&tz),
    };

    let snapshot = state
        .budget_service
        .get_budget(auth.user_id(), date)
        .await?;

    Ok(Json(snapshot.fixed_offset()))
}
