//! Payment processing
//!
//! Turns a payment intent into a validated ledger mutation plus a transaction
//! record. Immediate payments debit a chosen bundle; urgent payments are
//! recorded as pending against `uncategorized` and debited later, when they
//! are categorized.
//!
//! Every mutation for a (user, month) runs under that ledger's lock, and a
//! storage failure after the balance was written puts the previous balance
//! back before the error is returned.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::AuditEntry;
use crate::error::{BudgetError, BudgetResult};
use crate::ledger::{BundleLedger, LedgerSnapshot};
use crate::models::{Bundle, BudgetMonth, BundleKey, Money, Transaction, TransactionId, UserId};
use crate::storage::Storage;

/// Result of a committed payment or categorization
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub transaction: Transaction,
    /// Bundle balance after the debit; `None` for deferred payments
    pub new_remaining: Option<Money>,
}

/// How close a bundle is to running out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Less than 10% of the allocation left
    Warning,
    /// Less than 5% of the allocation left
    Critical,
}

impl std::fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowBalanceWarning {
    pub bundle: BundleKey,
    pub remaining: Money,
    pub allocated: Money,
    pub severity: WarningSeverity,
}

impl LowBalanceWarning {
    pub fn message(&self) -> String {
        match self.severity {
            WarningSeverity::Critical => {
                format!("Less than 5% left in {} ({} remaining)", self.bundle, self.remaining)
            }
            WarningSeverity::Warning => {
                format!("Less than 10% left in {} ({} remaining)", self.bundle, self.remaining)
            }
        }
    }
}

/// Safe spend per day for the rest of the month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBudget {
    pub bundle: BundleKey,
    pub total_remaining: Money,
    pub days_left: i64,
    pub daily_budget: Money,
}

/// Low-balance warnings for every unprotected bundle
///
/// Zero-allocation bundles never warn: nothing is below 10% of nothing.
pub fn low_balance_warnings(snapshot: &LedgerSnapshot) -> Vec<LowBalanceWarning> {
    snapshot
        .bundles()
        .filter(|b| !b.protected)
        .filter(|b| b.remaining_below(10))
        .map(|b: &Bundle| LowBalanceWarning {
            bundle: b.key.clone(),
            remaining: b.remaining,
            allocated: b.allocated,
            severity: if b.remaining_below(5) {
                WarningSeverity::Critical
            } else {
                WarningSeverity::Warning
            },
        })
        .collect()
}

/// Remaining balance spread over the days left in `month`
///
/// Days are counted from `today` (or the month's first day, for a month that
/// has not started) up to the first day of the next month, so the spread is
/// never longer than the month itself. A `today` past the month gives zero
/// days and a zero daily budget.
pub fn daily_budget(
    snapshot: &LedgerSnapshot,
    key: &BundleKey,
    month: BudgetMonth,
    today: NaiveDate,
) -> BudgetResult<DailyBudget> {
    let bundle = snapshot
        .bundle(key)
        .ok_or_else(|| BudgetError::bundle_not_found(key.to_string()))?;
    let days_left = month.days_left(today);

    Ok(DailyBudget {
        bundle: key.clone(),
        total_remaining: bundle.remaining,
        days_left,
        daily_budget: bundle.remaining.split_evenly(days_left),
    })
}

/// Service for payments and categorization
pub struct PaymentProcessor<'a> {
    storage: &'a Storage,
}

impl<'a> PaymentProcessor<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn load_ledger(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<BundleLedger> {
        let budget = self
            .storage
            .store()
            .load_budget(user, month)?
            .ok_or_else(|| BudgetError::budget_not_found(format!("{} ({})", month, user)))?;
        Ok(BundleLedger::from_budget(budget))
    }

    /// Read-only copy of the month's ledger
    pub fn snapshot(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<LedgerSnapshot> {
        self.storage
            .locks()
            .with_lock(user, month, || Ok(self.load_ledger(user, month)?.snapshot()))
    }

    /// Check a payment without committing it
    ///
    /// Returns the balance the bundle would have afterwards.
    pub fn validate(
        &self,
        user: &UserId,
        month: BudgetMonth,
        amount: Money,
        key: &BundleKey,
    ) -> BudgetResult<Money> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }
        let projected = self.load_ledger(user, month)?.check_debit(key, amount);
        debug!(user = %user, bundle = %key, amount = %amount, ok = projected.is_ok(), "validated payment");
        projected
    }

    /// Pay from a bundle chosen now
    ///
    /// All or nothing: on any error the bundle balance is what it was before
    /// and no transaction is recorded.
    pub fn process(
        &self,
        user: &UserId,
        month: BudgetMonth,
        recipient: &str,
        amount: Money,
        key: &BundleKey,
        note: &str,
    ) -> BudgetResult<PaymentOutcome> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }
        let recipient = validate_recipient(recipient)?;

        self.storage.locks().with_lock(user, month, || {
            let mut ledger = self.load_ledger(user, month)?;
            let previous = ledger.remaining(key);
            let new_remaining = ledger.debit(key, amount)?;

            let store = self.storage.store();
            store.update_bundle_remaining(user, month, key, new_remaining)?;

            let txn = Transaction::completed(recipient, amount, key.clone(), note);
            if let Err(e) = store.append_transaction(user, month, &txn) {
                self.restore_remaining(user, month, key, previous);
                return Err(e);
            }

            info!(
                user = %user,
                month = %month,
                bundle = %key,
                amount = %amount,
                remaining = %new_remaining,
                "payment processed"
            );
            self.storage.audit(|| AuditEntry::payment(user, month, &txn));

            Ok(PaymentOutcome {
                transaction: txn,
                new_remaining: Some(new_remaining),
            })
        })
    }

    /// Record an urgent payment for later categorization
    ///
    /// No bundle is checked or debited, so an empty or over-spent bundle
    /// never blocks the payment. Only the amount must be positive.
    pub fn deferred_process(
        &self,
        user: &UserId,
        month: BudgetMonth,
        recipient: &str,
        amount: Money,
        note: &str,
    ) -> BudgetResult<PaymentOutcome> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }
        let recipient = validate_recipient(recipient)?;

        self.storage.locks().with_lock(user, month, || {
            let txn = Transaction::pending(recipient, amount, note);
            self.storage.store().append_transaction(user, month, &txn)?;

            info!(user = %user, month = %month, amount = %amount, id = %txn.id, "deferred payment recorded");
            self.storage.audit(|| AuditEntry::payment(user, month, &txn));

            Ok(PaymentOutcome {
                transaction: txn,
                new_remaining: None,
            })
        })
    }

    /// Assign a pending payment to a bundle and debit it
    ///
    /// The debit clamps at zero: the money is already spent, so a payment
    /// larger than what remains empties the bundle instead of failing.
    /// Protected bundles cannot be chosen.
    pub fn categorize(
        &self,
        user: &UserId,
        month: BudgetMonth,
        id: TransactionId,
        key: &BundleKey,
    ) -> BudgetResult<PaymentOutcome> {
        self.storage.locks().with_lock(user, month, || {
            let store = self.storage.store();
            let before = store
                .list_transactions(user, month)?
                .into_iter()
                .find(|t| t.id == id)
                .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;

            if !before.is_pending() {
                return Err(BudgetError::NotPending {
                    id: id.to_string(),
                    status: before.status.to_string(),
                });
            }

            let mut ledger = self.load_ledger(user, month)?;
            let previous = ledger.remaining(key);
            let new_remaining = ledger.settle_categorized(key, before.amount)?;

            store.update_bundle_remaining(user, month, key, new_remaining)?;

            let after = match store.recategorize_transaction(user, month, id, key) {
                Ok(txn) => txn,
                Err(e) => {
                    self.restore_remaining(user, month, key, previous);
                    return Err(e);
                }
            };

            info!(
                user = %user,
                month = %month,
                id = %id,
                bundle = %key,
                remaining = %new_remaining,
                "payment categorized"
            );
            self.storage.audit(|| {
                AuditEntry::categorization(
                    user,
                    month,
                    &before,
                    &after,
                    previous.unwrap_or_default(),
                    new_remaining,
                )
            });

            Ok(PaymentOutcome {
                transaction: after,
                new_remaining: Some(new_remaining),
            })
        })
    }

    /// Transactions still waiting for a bundle, most recent first
    pub fn pending(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<Vec<Transaction>> {
        Ok(self
            .history(user, month)?
            .into_iter()
            .filter(|t| t.is_pending())
            .collect())
    }

    /// All transactions for the month, most recent first
    pub fn history(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<Vec<Transaction>> {
        self.storage.store().list_transactions(user, month)
    }

    pub fn low_balance_warnings(
        &self,
        user: &UserId,
        month: BudgetMonth,
    ) -> BudgetResult<Vec<LowBalanceWarning>> {
        Ok(low_balance_warnings(&self.snapshot(user, month)?))
    }

    pub fn daily_budget(
        &self,
        user: &UserId,
        month: BudgetMonth,
        key: &BundleKey,
        today: NaiveDate,
    ) -> BudgetResult<DailyBudget> {
        daily_budget(&self.snapshot(user, month)?, key, month, today)
    }

    fn restore_remaining(
        &self,
        user: &UserId,
        month: BudgetMonth,
        key: &BundleKey,
        previous: Option<Money>,
    ) {
        let Some(previous) = previous else {
            return;
        };
        if let Err(e) = self
            .storage
            .store()
            .update_bundle_remaining(user, month, key, previous)
        {
            warn!(
                user = %user,
                month = %month,
                bundle = %key,
                error = %e,
                "failed to restore bundle balance after storage error"
            );
        }
    }
}

fn validate_recipient(recipient: &str) -> BudgetResult<&str> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(BudgetError::Validation("Recipient cannot be empty".into()));
    }
    Ok(recipient)
}
