//! Bundle ledger
//!
//! `BundleLedger` is the authoritative state of one (user, month): the income,
//! every bundle's allocation and its remaining balance. It is the only code
//! that changes `remaining`.
//!
//! Spending goes through `check_debit` (pure validation, returns the
//! projected balance) and `debit` (validation plus commit). Categorizing an
//! urgent payment goes through `settle_categorized`, which clamps at zero
//! instead of failing because the money has already left the account.
//!
//! Readers get a `LedgerSnapshot`, an owned copy that cannot touch the ledger.

mod snapshot;

pub use snapshot::LedgerSnapshot;

use std::collections::BTreeMap;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, Bundle, BundleKey, Money};

/// Allocations and remaining balances for one (user, month)
#[derive(Debug, Clone, PartialEq)]
pub struct BundleLedger {
    budget: Budget,
}

impl BundleLedger {
    /// Build a fresh month from income and per-bundle allocations
    ///
    /// Every bundle starts with `remaining == allocated`. A zero allocation is
    /// allowed. Fails with `OverAllocation` when the allocations add up to
    /// more than the income.
    pub fn create<I>(income: Money, allocations: I) -> BudgetResult<Self>
    where
        I: IntoIterator<Item = (BundleKey, Money)>,
    {
        if income.is_negative() {
            return Err(BudgetError::InvalidAmount(income));
        }

        let mut bundles: BTreeMap<BundleKey, Bundle> = BTreeMap::new();
        for (key, allocated) in allocations {
            if key.is_uncategorized() {
                return Err(BudgetError::Validation(format!(
                    "'{}' is reserved for payments awaiting categorization",
                    key
                )));
            }
            if allocated.is_negative() {
                return Err(BudgetError::InvalidAmount(allocated));
            }
            if bundles.contains_key(&key) {
                return Err(BudgetError::Validation(format!(
                    "Bundle '{}' is allocated more than once",
                    key
                )));
            }
            bundles.insert(key.clone(), Bundle::new(key, allocated));
        }

        if bundles.is_empty() {
            return Err(BudgetError::Validation(
                "A budget needs at least one bundle".into(),
            ));
        }

        let allocated = Money::checked_sum(bundles.values().map(|b| b.allocated)).ok_or_else(|| {
            BudgetError::Validation("Allocations add up to more than can be recorded".into())
        })?;
        if allocated > income {
            return Err(BudgetError::OverAllocation {
                income,
                allocated,
                difference: allocated - income,
            });
        }

        Ok(Self {
            budget: Budget::from_bundles(income, bundles.into_values()),
        })
    }

    /// Rebuild the ledger for a stored budget
    ///
    /// Stored budgets are not re-checked for over-allocation; that rule only
    /// applies at creation time.
    pub fn from_budget(budget: Budget) -> Self {
        Self { budget }
    }

    /// Hand the budget back for persistence
    pub fn into_budget(self) -> Budget {
        self.budget
    }

    /// Income for the month
    pub fn income(&self) -> Money {
        self.budget.income
    }

    /// Current remaining balance of a bundle
    pub fn remaining(&self, key: &BundleKey) -> Option<Money> {
        self.budget.bundle(key).map(|b| b.remaining)
    }

    /// Validate a debit without applying it
    ///
    /// Checks run in a fixed order: the amount must be positive, the bundle
    /// must not be protected, the bundle must exist, and the amount must fit
    /// in what remains. Returns the projected remaining balance.
    pub fn check_debit(&self, key: &BundleKey, amount: Money) -> BudgetResult<Money> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }
        if key.is_savings() {
            return Err(BudgetError::ProtectedBundle(key.to_string()));
        }

        let bundle = self
            .budget
            .bundle(key)
            .ok_or_else(|| BudgetError::bundle_not_found(key.to_string()))?;

        if bundle.protected {
            return Err(BudgetError::ProtectedBundle(key.to_string()));
        }
        if amount > bundle.remaining {
            return Err(BudgetError::InsufficientBalance {
                bundle: key.to_string(),
                needed: amount,
                available: bundle.remaining,
            });
        }

        Ok(bundle.remaining - amount)
    }

    /// Spend `amount` from a bundle, returning the new remaining balance
    ///
    /// On error nothing changes.
    pub fn debit(&mut self, key: &BundleKey, amount: Money) -> BudgetResult<Money> {
        let new_remaining = self.check_debit(key, amount)?;
        self.set_remaining(key, new_remaining)?;
        Ok(new_remaining)
    }

    /// Charge an already-made payment to a bundle
    ///
    /// The new balance is `max(0, remaining - amount)`: a payment larger than
    /// what is left drives the bundle to zero rather than failing. The part
    /// that did not fit is not recorded anywhere else. Protected bundles and
    /// the uncategorized sentinel are still rejected.
    pub fn settle_categorized(&mut self, key: &BundleKey, amount: Money) -> BudgetResult<Money> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }
        if key.is_uncategorized() {
            return Err(BudgetError::Validation(
                "Pick a bundle to categorize the payment into".into(),
            ));
        }
        if key.is_savings() {
            return Err(BudgetError::ProtectedBundle(key.to_string()));
        }

        let bundle = self
            .budget
            .bundle(key)
            .ok_or_else(|| BudgetError::bundle_not_found(key.to_string()))?;

        if bundle.protected {
            return Err(BudgetError::ProtectedBundle(key.to_string()));
        }

        let new_remaining = bundle.remaining.saturating_sub_to_zero(amount);
        self.set_remaining(key, new_remaining)?;
        Ok(new_remaining)
    }

    /// Owned, read-only copy of the current state
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.budget.clone())
    }

    fn set_remaining(&mut self, key: &BundleKey, remaining: Money) -> BudgetResult<()> {
        let bundle = self
            .budget
            .bundles
            .get_mut(key)
            .ok_or_else(|| BudgetError::bundle_not_found(key.to_string()))?;
        bundle.remaining = remaining;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(r: i64) -> Money {
        Money::from_rupees(r)
    }

    fn key(k: &str) -> BundleKey {
        BundleKey::new(k).unwrap()
    }

    fn allocations(meals: i64) -> Vec<(BundleKey, Money)> {
        vec![
            (key("meals"), rupees(meals)),
            (key("groceries"), rupees(6000)),
            (key("rent"), rupees(25000)),
            (key("savings"), rupees(6000)),
        ]
    }

    fn scenario_ledger() -> BundleLedger {
        BundleLedger::create(rupees(45000), allocations(8000)).unwrap()
    }

    #[test]
    fn test_create_when_total_equals_income() {
        let ledger = scenario_ledger();
        let snapshot = ledger.snapshot();

        assert_eq!(snapshot.total_allocated(), rupees(45000));
        for bundle in snapshot.bundles() {
            assert_eq!(bundle.remaining, bundle.allocated);
        }
        assert!(snapshot.bundle(&key("savings")).unwrap().protected);
    }

    #[test]
    fn test_create_rejects_allocations_that_overflow() {
        let half = Money::from_paise(i64::MAX / 2 + 1);
        let result = BundleLedger::create(
            Money::from_paise(i64::MAX),
            vec![(key("meals"), half), (key("rent"), half)],
        );
        assert!(matches!(result, Err(BudgetError::Validation(_))));

        let result = BundleLedger::create(
            rupees(45000),
            vec![(key("meals"), Money::from_paise(i64::MAX)), (key("rent"), rupees(1))],
        );
        assert!(matches!(result, Err(BudgetError::Validation(_))));
    }

    #[test]
    fn test_create_over_allocated_reports_difference() {
        let result = BundleLedger::create(rupees(45000), allocations(9000));

        match result {
            Err(BudgetError::OverAllocation {
                income,
                allocated,
                difference,
            }) => {
                assert_eq!(income, rupees(45000));
                assert_eq!(allocated, rupees(46000));
                assert_eq!(difference, rupees(1000));
            }
            other => panic!("expected OverAllocation, got {:?}", other),
        }
    }

    #[test]
    fn test_create_allows_zero_allocation() {
        let ledger = BundleLedger::create(
            rupees(1000),
            vec![(key("meals"), rupees(1000)), (key("other"), Money::zero())],
        )
        .unwrap();
        assert_eq!(ledger.remaining(&key("other")), Some(Money::zero()));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        assert!(matches!(
            BundleLedger::create(rupees(100), vec![(key("meals"), rupees(-1))]),
            Err(BudgetError::InvalidAmount(_))
        ));
        assert!(matches!(
            BundleLedger::create(rupees(100), vec![(key("uncategorized"), rupees(1))]),
            Err(BudgetError::Validation(_))
        ));
        assert!(matches!(
            BundleLedger::create(
                rupees(100),
                vec![(key("meals"), rupees(1)), (key("Meals"), rupees(1))]
            ),
            Err(BudgetError::Validation(_))
        ));
        assert!(matches!(
            BundleLedger::create(rupees(100), Vec::new()),
            Err(BudgetError::Validation(_))
        ));
    }

    #[test]
    fn test_debit_reduces_remaining() {
        let mut ledger = scenario_ledger();
        let new_remaining = ledger.debit(&key("meals"), rupees(850)).unwrap();

        assert_eq!(new_remaining, rupees(7150));
        assert_eq!(ledger.remaining(&key("meals")), Some(rupees(7150)));
    }

    #[test]
    fn test_debit_savings_is_protected() {
        let mut ledger = scenario_ledger();
        assert!(matches!(
            ledger.debit(&key("savings"), rupees(1)),
            Err(BudgetError::ProtectedBundle(_))
        ));
        assert!(matches!(
            ledger.debit(&key("savings"), Money::from_paise(1)),
            Err(BudgetError::ProtectedBundle(_))
        ));
        assert_eq!(ledger.remaining(&key("savings")), Some(rupees(6000)));
    }

    #[test]
    fn test_amount_checked_before_protection() {
        let ledger = scenario_ledger();
        assert!(matches!(
            ledger.check_debit(&key("savings"), Money::zero()),
            Err(BudgetError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.check_debit(&key("meals"), rupees(-5)),
            Err(BudgetError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_protected_flag_on_stored_budget_is_honored() {
        let mut vault = Bundle::new(key("vault"), rupees(100));
        vault.protected = true;
        let mut ledger = BundleLedger::from_budget(Budget::from_bundles(rupees(100), vec![vault]));

        assert!(matches!(
            ledger.debit(&key("vault"), rupees(1)),
            Err(BudgetError::ProtectedBundle(_))
        ));
    }

    #[test]
    fn test_insufficient_balance_leaves_state_untouched() {
        let mut ledger = scenario_ledger();
        ledger.debit(&key("meals"), rupees(7700)).unwrap();

        let err = ledger.debit(&key("meals"), rupees(301)).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::InsufficientBalance { available, .. } if available == rupees(300)
        ));
        assert_eq!(ledger.remaining(&key("meals")), Some(rupees(300)));

        // Exactly the remaining amount is fine
        assert_eq!(ledger.debit(&key("meals"), rupees(300)).unwrap(), Money::zero());
    }

    #[test]
    fn test_unknown_bundle() {
        let mut ledger = scenario_ledger();
        let err = ledger.debit(&key("travel"), rupees(1)).unwrap_err();
        assert!(err.is_not_found());
        let err = ledger.debit(&key("uncategorized"), rupees(1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_check_debit_does_not_commit() {
        let ledger = scenario_ledger();
        assert_eq!(
            ledger.check_debit(&key("meals"), rupees(850)).unwrap(),
            rupees(7150)
        );
        assert_eq!(ledger.remaining(&key("meals")), Some(rupees(8000)));
    }

    #[test]
    fn test_debits_keep_remaining_within_allocation() {
        let mut ledger = scenario_ledger();
        let keys = [key("meals"), key("groceries"), key("rent"), key("savings")];

        // Deterministic pseudo-random sequence of debits, successful or not
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let bundle = &keys[(seed % 4) as usize];
            let amount = Money::from_paise((seed >> 8) as i64 % 300_000 - 1_000);
            let _ = ledger.debit(bundle, amount);

            for b in ledger.snapshot().bundles() {
                assert!(!b.remaining.is_negative(), "{} went negative", b.key);
                assert!(b.remaining <= b.allocated, "{} exceeds allocation", b.key);
            }
        }
    }

    #[test]
    fn test_settle_categorized_clamps_at_zero() {
        let mut ledger = scenario_ledger();
        ledger.debit(&key("meals"), rupees(7700)).unwrap();

        // 300 left, 500 already spent: bundle drops to 0, no error
        let new_remaining = ledger.settle_categorized(&key("meals"), rupees(500)).unwrap();
        assert_eq!(new_remaining, Money::zero());

        // The clamp is the one path where the bundle absorbs more than it had
        let meals = ledger.snapshot().bundle(&key("meals")).cloned().unwrap();
        assert_eq!(meals.spent(), rupees(8000));
        assert!(meals.spent() < rupees(7700) + rupees(500));
    }

    #[test]
    fn test_settle_categorized_within_balance() {
        let mut ledger = scenario_ledger();
        assert_eq!(
            ledger.settle_categorized(&key("groceries"), rupees(500)).unwrap(),
            rupees(5500)
        );
    }

    #[test]
    fn test_settle_categorized_rejects_protected_and_sentinel() {
        let mut ledger = scenario_ledger();
        assert!(matches!(
            ledger.settle_categorized(&key("savings"), rupees(10)),
            Err(BudgetError::ProtectedBundle(_))
        ));
        assert!(matches!(
            ledger.settle_categorized(&key("uncategorized"), rupees(10)),
            Err(BudgetError::Validation(_))
        ));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ledger = scenario_ledger();
        let before = ledger.snapshot();
        ledger.debit(&key("rent"), rupees(25000)).unwrap();

        assert_eq!(before.bundle(&key("rent")).unwrap().remaining, rupees(25000));
        assert_eq!(
            ledger.snapshot().bundle(&key("rent")).unwrap().remaining,
            Money::zero()
        );
    }
}
