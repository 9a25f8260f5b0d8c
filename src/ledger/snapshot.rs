//! Read-only view of a ledger

use crate::models::{Budget, Bundle, BundleKey, Money};

/// Owned copy of one month's bundle state
///
/// Produced by `BundleLedger::snapshot` and by the services that load a
/// budget for reading. Holding one never blocks or changes the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    budget: Budget,
}

impl LedgerSnapshot {
    pub(crate) fn new(budget: Budget) -> Self {
        Self { budget }
    }

    pub fn income(&self) -> Money {
        self.budget.income
    }

    pub fn bundle(&self, key: &BundleKey) -> Option<&Bundle> {
        self.budget.bundle(key)
    }

    /// Bundles in key order
    pub fn bundles(&self) -> impl Iterator<Item = &Bundle> {
        self.budget.bundles.values()
    }

    pub fn total_allocated(&self) -> Money {
        self.budget.total_allocated()
    }

    pub fn total_remaining(&self) -> Money {
        self.budget.total_remaining()
    }

    /// Remaining summed over the variable bundles present in this budget
    pub fn variable_remaining(&self) -> Money {
        BundleKey::VARIABLE
            .iter()
            .filter_map(|k| BundleKey::new(k).ok())
            .filter_map(|k| self.bundle(&k).map(|b| b.remaining))
            .sum()
    }

    /// The underlying budget, for display and export
    pub fn budget(&self) -> &Budget {
        &self.budget
    }
}

impl From<Budget> for LedgerSnapshot {
    fn from(budget: Budget) -> Self {
        Self::new(budget)
    }
}
