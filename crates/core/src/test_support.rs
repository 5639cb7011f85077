//! In-memory repositories for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use moneta_shared::types::{
    AccountId, BudgetCategoryId, BudgetId, CategoryId, InstitutionId, Money, PaymentMethodId,
    UserId,
};
use tokio::sync::Barrier;

use crate::budget::{Budget, BudgetCategory, BudgetCategoryWithMeta, BudgetReader, Category};
use crate::ledger::{BalanceReader, RepositoryError, TransactionFilter, TransactionReader};

/// A stored transaction.
#[derive(Debug, Clone)]
pub struct TxRow {
    pub user_id: UserId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub institution_id: InstitutionId,
    pub payment_method_id: Option<PaymentMethodId>,
    pub is_ignored: bool,
}

impl TxRow {
    pub fn new(user_id: UserId, amount: i64, date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            amount: Money::from_minor(amount),
            date,
            description: String::new(),
            category_id: None,
            institution_id: InstitutionId::default(),
            payment_method_id: None,
            is_ignored: false,
        }
    }

    pub fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn institution(mut self, id: InstitutionId) -> Self {
        self.institution_id = id;
        self
    }

    pub fn described(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    pub fn ignored(mut self) -> Self {
        self.is_ignored = true;
        self
    }

    fn matches(&self, user_id: UserId, filter: &TransactionFilter) -> bool {
        let in_list = |ids: &[CategoryId], id: Option<CategoryId>| {
            ids.is_empty() || id.is_some_and(|id| ids.contains(&id))
        };

        self.user_id == user_id
            && filter.start_date.is_none_or(|start| self.date >= start)
            && filter.end_date.is_none_or(|end| self.date <= end)
            && (filter.is_expense != Some(true) || self.amount.is_negative())
            && (filter.is_income != Some(true) || self.amount > Money::ZERO)
            && filter.is_ignored.is_none_or(|ignored| ignored == self.is_ignored)
            && in_list(&filter.category_ids, self.category_id)
            && (filter.institution_ids.is_empty()
                || filter.institution_ids.contains(&self.institution_id))
            && (filter.payment_method_ids.is_empty()
                || self
                    .payment_method_id
                    .is_some_and(|id| filter.payment_method_ids.contains(&id)))
            && (!filter.has_search()
                || filter.search.as_deref().is_some_and(|search| {
                    self.description
                        .to_lowercase()
                        .contains(&search.trim().to_lowercase())
                }))
    }
}

/// A stored balance record.
#[derive(Debug, Clone)]
pub struct BalanceRow {
    pub user_id: UserId,
    pub account_id: AccountId,
    pub institution_id: InstitutionId,
    pub date: DateTime<Utc>,
    pub balance: Money,
}

/// Ledger backed by vectors, recording every filter it is queried with.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    pub transactions: Vec<TxRow>,
    pub balances: Vec<BalanceRow>,
    pub queries: Mutex<Vec<TransactionFilter>>,
}

impl InMemoryLedger {
    pub fn with_transactions(transactions: Vec<TxRow>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<TransactionFilter> {
        self.queries.lock().unwrap().clone()
    }

    fn matching<'a>(
        &'a self,
        user_id: UserId,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a TxRow> {
        self.queries.lock().unwrap().push(filter.clone());
        self.transactions
            .iter()
            .filter(move |tx| tx.matches(user_id, filter))
    }
}

impl TransactionReader for InMemoryLedger {
    async fn sum_amount(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Money, RepositoryError> {
        Ok(self.matching(user_id, filter).map(|tx| tx.amount).sum())
    }

    async fn sum_amount_by_category(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<HashMap<Option<CategoryId>, Money>, RepositoryError> {
        let mut sums: HashMap<Option<CategoryId>, Money> = HashMap::new();
        for tx in self.matching(user_id, filter) {
            *sums.entry(tx.category_id).or_default() += tx.amount;
        }
        Ok(sums)
    }
}

impl BalanceReader for InMemoryLedger {
    async fn balance_as_of(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
        institution_ids: &[InstitutionId],
    ) -> Result<Money, RepositoryError> {
        let mut latest: HashMap<AccountId, &BalanceRow> = HashMap::new();
        for row in self.balances.iter().filter(|row| {
            row.user_id == user_id
                && row.date <= as_of
                && (institution_ids.is_empty() || institution_ids.contains(&row.institution_id))
        }) {
            latest
                .entry(row.account_id)
                .and_modify(|current| {
                    if row.date > current.date {
                        *current = row;
                    }
                })
                .or_insert(row);
        }
        Ok(latest.values().map(|row| row.balance).sum())
    }
}

/// Budget store backed by vectors.
#[derive(Debug, Default)]
pub struct InMemoryBudgets {
    pub budgets: Vec<Budget>,
    pub categories: Vec<BudgetCategoryWithMeta>,
}

impl InMemoryBudgets {
    pub fn with_budget(budget: Budget) -> Self {
        Self {
            budgets: vec![budget],
            categories: Vec::new(),
        }
    }

    pub fn plan(mut self, budget: &Budget, category: Category, amount: i64) -> Self {
        self.categories.push(BudgetCategoryWithMeta {
            budget_category: BudgetCategory {
                id: BudgetCategoryId::new(),
                budget_id: budget.id,
                category_id: category.id,
                amount: Money::from_minor(amount),
            },
            category,
        });
        self
    }
}

impl BudgetReader for InMemoryBudgets {
    async fn find_budget(
        &self,
        user_id: UserId,
        month_start: NaiveDate,
    ) -> Result<Option<Budget>, RepositoryError> {
        Ok(self
            .budgets
            .iter()
            .find(|b| b.user_id == user_id && b.date == month_start)
            .cloned())
    }

    async fn list_budget_categories(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetCategoryWithMeta>, RepositoryError> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.budget_category.budget_id == budget_id)
            .cloned()
            .collect())
    }
}

pub fn budget(user_id: UserId, date: NaiveDate, amount: i64) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id,
        amount: Money::from_minor(amount),
        date,
    }
}

pub fn category(name: &str) -> Category {
    Category {
        id: CategoryId::new(),
        name: name.to_string(),
        icon: None,
    }
}

#[derive(Debug)]
struct Boom;

impl std::fmt::Display for Boom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("connection reset")
    }
}

impl std::error::Error for Boom {}

/// Fails every query.
#[derive(Debug, Default)]
pub struct FailingRepo;

impl TransactionReader for FailingRepo {
    async fn sum_amount(
        &self,
        _user_id: UserId,
        _filter: &TransactionFilter,
    ) -> Result<Money, RepositoryError> {
        Err(RepositoryError::query(Boom))
    }

    async fn sum_amount_by_category(
        &self,
        _user_id: UserId,
        _filter: &TransactionFilter,
    ) -> Result<HashMap<Option<CategoryId>, Money>, RepositoryError> {
        Err(RepositoryError::query(Boom))
    }
}

impl BalanceReader for FailingRepo {
    async fn balance_as_of(
        &self,
        _user_id: UserId,
        _as_of: DateTime<Utc>,
        _institution_ids: &[InstitutionId],
    ) -> Result<Money, RepositoryError> {
        Err(RepositoryError::query(Boom))
    }
}

impl BudgetReader for FailingRepo {
    async fn find_budget(
        &self,
        _user_id: UserId,
        _month_start: NaiveDate,
    ) -> Result<Option<Budget>, RepositoryError> {
        Err(RepositoryError::query(Boom))
    }

    async fn list_budget_categories(
        &self,
        _budget_id: BudgetId,
    ) -> Result<Vec<BudgetCategoryWithMeta>, RepositoryError> {
        Err(RepositoryError::query(Boom))
    }
}

/// Increments a counter when dropped.
struct DropGuard(Arc<AtomicUsize>);

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Never completes; counts how many of its queries were dropped while pending.
#[derive(Debug, Default)]
pub struct PendingRepo {
    pub started: AtomicUsize,
    pub cancelled: Arc<AtomicUsize>,
}

impl PendingRepo {
    async fn hang<T>(&self) -> T {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _guard = DropGuard(Arc::clone(&self.cancelled));
        std::future::pending().await
    }
}

impl TransactionReader for PendingRepo {
    async fn sum_amount(
        &self,
        _user_id: UserId,
        _filter: &TransactionFilter,
    ) -> Result<Money, RepositoryError> {
        self.hang().await
    }

    async fn sum_amount_by_category(
        &self,
        _user_id: UserId,
        _filter: &TransactionFilter,
    ) -> Result<HashMap<Option<CategoryId>, Money>, RepositoryError> {
        self.hang().await
    }
}

impl BalanceReader for PendingRepo {
    async fn balance_as_of(
        &self,
        _user_id: UserId,
        _as_of: DateTime<Utc>,
        _institution_ids: &[InstitutionId],
    ) -> Result<Money, RepositoryError> {
        self.hang().await
    }
}

/// Every query waits until `n` queries are in flight at once.
#[derive(Debug)]
pub struct RendezvousRepo {
    barrier: Barrier,
}

impl RendezvousRepo {
    pub fn new(n: usize) -> Self {
        Self {
            barrier: Barrier::new(n),
        }
    }
}

impl TransactionReader for RendezvousRepo {
    async fn sum_amount(
        &self,
        _user_id: UserId,
        _filter: &TransactionFilter,
    ) -> Result<Money, RepositoryError> {
        self.barrier.wait().await;
        Ok(Money::ZERO)
    }

    async fn sum_amount_by_category(
        &self,
        _user_id: UserId,
        _filter: &TransactionFilter,
    ) -> Result<HashMap<Option<CategoryId>, Money>, RepositoryError> {
        self.barrier.wait().await;
        Ok(HashMap::new())
    }
}

impl BalanceReader for RendezvousRepo {
    async fn balance_as_of(
        &self,
        _user_id: UserId,
        _as_of: DateTime<Utc>,
        _institution_ids: &[InstitutionId],
    ) -> Result<Money, RepositoryError> {
        self.barrier.wait().await;
        Ok(Money::ZERO)
    }
}
