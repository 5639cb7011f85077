//! `SeaORM` entity definitions.

pub mod account_balances;
pub mod accounts;
pub mod budget_categories;
pub mod budgets;
pub mod categories;
pub mod sea_orm_active_enums;
pub mod transactions;
