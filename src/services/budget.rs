//! Budget service
//!
//! Creates monthly budgets and derives the month-level statistics shown by
//! `budget show`, `budget stats` and `budget trend`.

use serde::Serialize;
use tracing::info;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::ledger::{BundleLedger, LedgerSnapshot};
use crate::models::{Budget, BudgetMonth, BundleKey, Money, Transaction, UserId};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Totals for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub month: BudgetMonth,
    pub income: Money,
    pub total_allocated: Money,
    /// Sum of every transaction amount, pending ones included
    pub total_spent: Money,
    pub total_remaining: Money,
    pub transaction_count: usize,
    pub pending_count: usize,
    /// Variable bundles with anything spent
    pub bundles_touched: usize,
}

/// Transaction totals for one bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleSpending {
    pub bundle: BundleKey,
    pub allocated: Money,
    pub remaining: Money,
    pub spent: Money,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingBreakdown {
    pub bundles: Vec<BundleSpending>,
    /// Pending payments not yet charged to any bundle
    pub uncategorized: Money,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Allocate `income` into bundles for a month
    ///
    /// Fails with `OverAllocation` (carrying the excess) when the allocations
    /// add up to more than the income, and refuses to replace an existing
    /// budget for the same month.
    pub fn create_budget(
        &self,
        user: &UserId,
        month: BudgetMonth,
        income: Money,
        allocations: Vec<(BundleKey, Money)>,
    ) -> BudgetResult<Budget> {
        let ledger = BundleLedger::create(income, allocations)?;

        self.storage.locks().with_lock(user, month, || {
            let store = self.storage.store();
            if store.load_budget(user, month)?.is_some() {
                return Err(BudgetError::Validation(format!(
                    "A budget for {} already exists",
                    month
                )));
            }

            let budget = ledger.into_budget();
            store.save_budget(user, month, &budget)?;

            info!(
                user = %user,
                month = %month,
                income = %budget.income,
                bundles = budget.bundles.len(),
                "budget created"
            );
            self.storage.audit(|| {
                AuditEntry::create(user, EntityType::Budget, format!("{}/{}", user, month), &budget)
                    .in_month(month)
                    .with_diff(format!(
                        "income {}, {} allocated across {} bundles",
                        budget.income,
                        budget.total_allocated(),
                        budget.bundles.len()
                    ))
            });

            Ok(budget)
        })
    }

    /// Load a month's budget
    pub fn budget(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<Budget> {
        self.storage
            .store()
            .load_budget(user, month)?
            .ok_or_else(|| BudgetError::budget_not_found(format!("{} ({})", month, user)))
    }

    /// Read-only ledger view of a month
    pub fn snapshot(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<LedgerSnapshot> {
        self.storage
            .locks()
            .with_lock(user, month, || self.budget(user, month).map(LedgerSnapshot::from))
    }

    /// Income, allocation, spending and remaining totals for a month
    pub fn monthly_stats(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<MonthlyStats> {
        let (budget, transactions) = self.storage.locks().with_lock(user, month, || {
            let budget = self.budget(user, month)?;
            let transactions = self.storage.store().list_transactions(user, month)?;
            Ok::<_, BudgetError>((budget, transactions))
        })?;

        Ok(stats_for(month, &budget, &transactions))
    }

    /// Per-bundle transaction totals
    pub fn spending_by_bundle(
        &self,
        user: &UserId,
        month: BudgetMonth,
    ) -> BudgetResult<SpendingBreakdown> {
        let (budget, transactions) = self.storage.locks().with_lock(user, month, || {
            let budget = self.budget(user, month)?;
            let transactions = self.storage.store().list_transactions(user, month)?;
            Ok::<_, BudgetError>((budget, transactions))
        })?;

        let bundles = budget
            .bundles
            .values()
            .map(|bundle| {
                let charged: Vec<&Transaction> = transactions
                    .iter()
                    .filter(|t| t.is_categorized_to(&bundle.key))
                    .collect();
                BundleSpending {
                    bundle: bundle.key.clone(),
                    allocated: bundle.allocated,
                    remaining: bundle.remaining,
                    spent: charged.iter().map(|t| t.amount).sum(),
                    transaction_count: charged.len(),
                }
            })
            .collect();

        let uncategorized = transactions
            .iter()
            .filter(|t| t.is_pending())
            .map(|t| t.amount)
            .sum();

        Ok(SpendingBreakdown {
            bundles,
            uncategorized,
        })
    }

    /// Stats for `month` and the `months - 1` months before it, oldest first
    ///
    /// Months without a budget are skipped.
    pub fn spending_trend(
        &self,
        user: &UserId,
        month: BudgetMonth,
        months: u32,
    ) -> BudgetResult<Vec<MonthlyStats>> {
        let mut trend = Vec::new();
        let mut current = month;

        for _ in 0..months.max(1) {
            match self.monthly_stats(user, current) {
                Ok(stats) => trend.push(stats),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
            current = current.prev();
        }

        trend.reverse();
        Ok(trend)
    }
}

fn stats_for(month: BudgetMonth, budget: &Budget, transactions: &[Transaction]) -> MonthlyStats {
    let bundles_touched = BundleKey::VARIABLE
        .iter()
        .filter_map(|k| BundleKey::new(k).ok())
        .filter_map(|k| budget.bundle(&k))
        .filter(|b| b.remaining < b.allocated)
        .count();

    MonthlyStats {
        month,
        income: budget.income,
        total_allocated: budget.total_allocated(),
        total_spent: transactions.iter().map(|t| t.amount).sum(),
        total_remaining: budget.total_remaining(),
        transaction_count: transactions.len(),
        pending_count: transactions.iter().filter(|t| t.is_pending()).count(),
        bundles_touched,
    }
}
