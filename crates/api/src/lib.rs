//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the balance overview and monthly budgets
//! - Authentication middleware
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono_tz::Tz;
use moneta_core::Clock;
use moneta_core::balance::BalanceService;
use moneta_core::budget::BudgetService;
use moneta_db::{AccountBalanceRepository, BudgetRepository, TransactionRepository};
use moneta_shared::JwtService;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Clock shared by every service in the process.
pub type SharedClock = Arc<dyn Clock>;

/// Balance service wired to the database repositories.
pub type AppBalanceService =
    BalanceService<TransactionRepository, AccountBalanceRepository, SharedClock>;

/// Budget service wired to the database repositories.
pub type AppBudgetService = BudgetService<BudgetRepository, TransactionRepository, SharedClock>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Balance overview aggregator.
    pub balance_service: Arc<AppBalanceService>,
    /// Budget consumption aggregator.
    pub budget_service: Arc<AppBudgetService>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Source of "now" for resolving omitted request bounds.
    pub clock: SharedClock,
    /// Zone used when a request carries no offset of its own.
    pub default_timezone: Tz,
}

impl AppState {
    /// Builds the services on top of one connection pool.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        jwt_service: JwtService,
        clock: SharedClock,
        default_timezone: Tz,
    ) -> Self {
        let transactions = Arc::new(TransactionRepository::new(db.clone()));
        let balances = Arc::new(AccountBalanceRepository::new(db.clone()));
        let budgets = Arc::new(BudgetRepository::new(db));

        Self {
            balance_service: Arc::new(BalanceService::new(
                Arc::clone(&transactions),
                balances,
                Arc::clone(&clock),
            )),
            budget_service: Arc::new(BudgetService::new(
                budgets,
                transactions,
                Arc::clone(&clock),
            )),
            jwt_service: Arc::new(jwt_service),
            clock,
            default_timezone,
        }
    }
}

/// Creates the main application router.
///
/// Requests running longer than `request_timeout` are dropped, which cancels their
/// in-flight queries.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
