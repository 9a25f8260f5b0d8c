//! Monthly budget model
//!
//! One budget exists per (user, month). It records the income being allocated
//! and owns that month's bundles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::bundle::{Bundle, BundleKey};
use super::money::Money;

/// A month's income and its allocation into bundles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Total income to be allocated
    pub income: Money,

    /// Bundles keyed by bundle key
    pub bundles: BTreeMap<BundleKey, Bundle>,

    /// When the budget was created
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Assemble a budget from already-built bundles
    ///
    /// No allocation check happens here; `BundleLedger::create` is the
    /// validating constructor.
    pub fn from_bundles(income: Money, bundles: impl IntoIterator<Item = Bundle>) -> Self {
        Self {
            income,
            bundles: bundles.into_iter().map(|b| (b.key.clone(), b)).collect(),
            created_at: Utc::now(),
        }
    }

    /// Look up a bundle
    pub fn bundle(&self, key: &BundleKey) -> Option<&Bundle> {
        self.bundles.get(key)
    }

    /// Sum of all allocations
    pub fn total_allocated(&self) -> Money {
        self.bundles.values().map(|b| b.allocated).sum()
    }

    /// Sum of all remaining balances
    pub fn total_remaining(&self) -> Money {
        self.bundles.values().map(|b| b.remaining).sum()
    }

    /// Income not assigned to any bundle
    pub fn unallocated(&self) -> Money {
        self.income - self.total_allocated()
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Income: {} | Allocated: {} | Remaining: {}",
            self.income,
            self.total_allocated(),
            self.total_remaining()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Budget {
        Budget::from_bundles(
            Money::from_rupees(45000),
            vec![
                Bundle::new(BundleKey::meals(), Money::from_rupees(8000)),
                Bundle::new(BundleKey::rent(), Money::from_rupees(25000)),
                Bundle::new(BundleKey::savings(), Money::from_rupees(6000)),
            ],
        )
    }

    #[test]
    fn test_totals() {
        let budget = sample();
        assert_eq!(budget.total_allocated(), Money::from_rupees(39000));
        assert_eq!(budget.total_remaining(), Money::from_rupees(39000));
        assert_eq!(budget.unallocated(), Money::from_rupees(6000));
    }

    #[test]
    fn test_bundle_lookup() {
        let budget = sample();
        assert!(budget.bundle(&BundleKey::meals()).is_some());
        assert!(budget.bundle(&BundleKey::groceries()).is_none());
    }

    #[test]
    fn test_serialization_keys_bundles_by_name() {
        let budget = sample();
        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["bundles"]["meals"]["allocated"], 800000);
        assert_eq!(json["bundles"]["savings"]["protected"], true);

        let back: Budget = serde_json::from_value(json).unwrap();
        assert_eq!(back, budget);
    }
}
