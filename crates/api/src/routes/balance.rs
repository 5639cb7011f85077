//! Balance overview route.

use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::{Query, QueryRejection};
use chrono::{DateTime, FixedOffset};
use moneta_core::balance::BalanceSnapshot;
use moneta_core::ledger::TransactionFilter;
use moneta_core::{Clock, DateRange};
use moneta_shared::types::{CategoryId, InstitutionId, PaymentMethodId};
use serde::Deserialize;
use validator::Validate;

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the balance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/balance", get(get_balance))
}

/// Query string of `GET /balance`.
///
/// Id lists are passed as repeated keys: `category_ids=a&category_ids=b`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BalanceQuery {
    /// Start of the current window, RFC 3339. Omit it for all time.
    ///
    /// Read as an instant in `end_date`'s offset, so a start given in another offset
    /// may fall on a different calendar day (`2024-11-01T00:00+01:00` is Oct 31 at
    /// -03:00).
    pub start_date: Option<DateTime<FixedOffset>>,
    /// End of the current window, RFC 3339.
    pub end_date: Option<DateTime<FixedOffset>>,
    /// Description search.
    #[validate(length(max = 255))]
    pub search: Option<String>,
    /// Category filter.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    /// Institution filter; the only one that also narrows the balance.
    #[serde(default)]
    pub institution_ids: Vec<InstitutionId>,
    /// Payment method filter.
    #[serde(default)]
    pub payment_method_ids: Vec<PaymentMethodId>,
    /// Match on the "ignore in totals" flag.
    pub is_ignored: Option<bool>,
}

impl BalanceQuery {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            search: self.search.clone(),
            category_ids: self.category_ids.clone(),
            institution_ids: self.institution_ids.clone(),
            payment_method_ids: self.payment_method_ids.clone(),
            is_ignored: self.is_ignored,
            ..TransactionFilter::default()
        }
    }

    /// The offset the windows are evaluated in, taken from the supplied bounds.
    fn offset(&self) -> Option<FixedOffset> {
        self.end_date.or(self.start_date).map(|dt| *dt.offset())
    }
}

/// GET /balance
async fn get_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<BalanceSnapshot>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let filter = query.filter();
    let now = state.clock.now();

    let snapshot = if let Some(offset) = query.offset() {
        let range = DateRange::new(query.start_date, query.end_date);
        let (start, end) = range.resolve(now.with_timezone(&offset));
        state
            .balance_service
            .get_balance(auth.user_id(), filter, start, end)
            .await?
    } else {
        let (start, end) =
            DateRange::new(None, None).resolve(now.with_timezone(&state.default_timezone));
        state
            .balance_service
            .get_balance(auth.user_id(), filter, start, end)
            .await?
            .fixed_offset()
    };

    Ok(Json(snapshot))
}
