//! Database enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Checking or savings account.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Credit card account.
    #[sea_orm(string_value = "credit")]
    Credit,
}
