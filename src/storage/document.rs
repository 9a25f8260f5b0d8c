//! Per-user document
//!
//! Both stores keep one `UserDocument` per user: budgets and transaction lists
//! keyed by month, the emergency fund and the savings goals. The mutation
//! helpers here are shared so the JSON and in-memory stores behave the same.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    Budget, BudgetMonth, Bundle, BundleKey, EmergencyFund, GoalId, Money, SavingsGoal,
    Transaction, TransactionId, TransactionStateError,
};

/// Everything stored for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub budgets: BTreeMap<BudgetMonth, Budget>,

    /// Most recent first
    #[serde(default)]
    pub transactions: BTreeMap<BudgetMonth, Vec<Transaction>>,

    #[serde(default)]
    pub emergency_fund: EmergencyFund,

    /// All goals, including soft-deleted ones
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
}

impl UserDocument {
    pub fn budget(&self, month: BudgetMonth) -> Option<&Budget> {
        self.budgets.get(&month)
    }

    pub fn set_budget(&mut self, month: BudgetMonth, budget: Budget) {
        self.budgets.insert(month, budget);
    }

    pub fn update_bundle_remaining(
        &mut self,
        month: BudgetMonth,
        key: &BundleKey,
        new_remaining: Money,
    ) -> BudgetResult<()> {
        let budget = self
            .budgets
            .get_mut(&month)
            .ok_or_else(|| BudgetError::budget_not_found(month.to_string()))?;
        let bundle = budget
            .bundles
            .get_mut(key)
            .ok_or_else(|| BudgetError::bundle_not_found(key.to_string()))?;
        bundle.remaining = new_remaining;
        Ok(())
    }

    pub fn append_transaction(&mut self, month: BudgetMonth, txn: Transaction) {
        self.transactions.entry(month).or_default().insert(0, txn);
    }

    pub fn transactions(&self, month: BudgetMonth) -> Vec<Transaction> {
        self.transactions.get(&month).cloned().unwrap_or_default()
    }

    /// Move a pending transaction to `categorized` under `new_key`
    pub fn recategorize_transaction(
        &mut self,
        month: BudgetMonth,
        id: TransactionId,
        new_key: &BundleKey,
    ) -> BudgetResult<Transaction> {
        let txn = self
            .transactions
            .get_mut(&month)
            .and_then(|list| list.iter_mut().find(|t| t.id == id))
            .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;

        txn.categorize(new_key.clone())
            .map_err(|TransactionStateError::NotPending(status)| BudgetError::NotPending {
                id: id.to_string(),
                status: status.to_string(),
            })?;

        Ok(txn.clone())
    }

    pub fn deposit_emergency_fund(&mut self, amount: Money) -> EmergencyFund {
        self.emergency_fund.deposit(amount);
        self.emergency_fund
    }

    pub fn active_goals(&self) -> Vec<SavingsGoal> {
        self.goals.iter().filter(|g| g.is_active()).cloned().collect()
    }

    pub fn add_goal(&mut self, goal: SavingsGoal) {
        self.goals.push(goal);
    }

    fn active_goal_mut(&mut self, id: GoalId) -> BudgetResult<&mut SavingsGoal> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id && g.is_active())
            .ok_or_else(|| BudgetError::goal_not_found(id.to_string()))
    }

    pub fn deposit_goal(&mut self, id: GoalId, amount: Money) -> BudgetResult<SavingsGoal> {
        let goal = self.active_goal_mut(id)?;
        goal.deposit(amount);
        Ok(goal.clone())
    }

    pub fn delete_goal(&mut self, id: GoalId) -> BudgetResult<SavingsGoal> {
        let goal = self.active_goal_mut(id)?;
        goal.mark_deleted();
        Ok(goal.clone())
    }

    /// Reference data used when no persistent store is configured
    pub fn sample(month: BudgetMonth) -> Self {
        let budget = Budget::from_bundles(
            Money::from_rupees(45_000),
            [
                (BundleKey::meals(), 8_000, 7_800),
                (BundleKey::groceries(), 6_000, 5_920),
                (BundleKey::rent(), 25_000, 25_000),
                (BundleKey::savings(), 6_000, 6_000),
            ]
            .into_iter()
            .map(|(key, allocated, remaining)| {
                let mut bundle = Bundle::new(key, Money::from_rupees(allocated));
                bundle.remaining = Money::from_rupees(remaining);
                bundle
            }),
        );

        let mut doc = Self {
            emergency_fund: EmergencyFund::with_balance(Money::from_rupees(2_870)),
            ..Self::default()
        };
        doc.set_budget(month, budget);

        doc.append_transaction(
            month,
            Transaction::completed("DMart", Money::from_rupees(80), BundleKey::groceries(), ""),
        );
        doc.append_transaction(
            month,
            Transaction::completed("Starbucks", Money::from_rupees(200), BundleKey::meals(), ""),
        );

        let mut vacation = SavingsGoal::new("Vacation", Money::from_rupees(50_000));
        vacation.deposit(Money::from_rupees(15_000));
        let mut laptop = SavingsGoal::new("New Laptop", Money::from_rupees(100_000));
        laptop.deposit(Money::from_rupees(45_000));
        doc.add_goal(vacation);
        doc.add_goal(laptop);

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionStatus;

    fn month() -> BudgetMonth {
        BudgetMonth::new(2025, 1).unwrap()
    }

    #[test]
    fn test_transactions_most_recent_first() {
        let mut doc = UserDocument::default();
        let first = Transaction::pending("A", Money::from_rupees(1), "");
        let second = Transaction::pending("B", Money::from_rupees(2), "");
        doc.append_transaction(month(), first);
        doc.append_transaction(month(), second);

        let list = doc.transactions(month());
        assert_eq!(list[0].recipient, "B");
        assert_eq!(list[1].recipient, "A");
    }

    #[test]
    fn test_recategorize_only_once() {
        let mut doc = UserDocument::default();
        let txn = Transaction::pending("DMart", Money::from_rupees(500), "");
        let id = txn.id;
        doc.append_transaction(month(), txn);

        let updated = doc
            .recategorize_transaction(month(), id, &BundleKey::groceries())
            .unwrap();
        assert_eq!(updated.status, TransactionStatus::Categorized);

        let err = doc
            .recategorize_transaction(month(), id, &BundleKey::meals())
            .unwrap_err();
        assert!(matches!(err, BudgetError::NotPending { .. }));
        assert_eq!(doc.transactions(month())[0].bundle_key, BundleKey::groceries());
    }

    #[test]
    fn test_update_remaining_requires_budget_and_bundle() {
        let mut doc = UserDocument::sample(month());
        assert!(doc
            .update_bundle_remaining(month().next(), &BundleKey::meals(), Money::zero())
            .unwrap_err()
            .is_not_found());
        assert!(doc
            .update_bundle_remaining(month(), &BundleKey::new("travel").unwrap(), Money::zero())
            .unwrap_err()
            .is_not_found());

        doc.update_bundle_remaining(month(), &BundleKey::meals(), Money::from_rupees(5))
            .unwrap();
        assert_eq!(
            doc.budget(month()).unwrap().bundle(&BundleKey::meals()).unwrap().remaining,
            Money::from_rupees(5)
        );
    }

    #[test]
    fn test_deleted_goals_are_hidden_and_frozen() {
        let mut doc = UserDocument::sample(month());
        let id = doc.active_goals()[0].id;

        doc.delete_goal(id).unwrap();
        assert_eq!(doc.active_goals().len(), 1);
        assert!(doc.deposit_goal(id, Money::from_rupees(10)).unwrap_err().is_not_found());
        assert!(doc.delete_goal(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_sample_values() {
        let doc = UserDocument::sample(month());
        let budget = doc.budget(month()).unwrap();

        assert_eq!(budget.income, Money::from_rupees(45_000));
        assert_eq!(budget.total_allocated(), Money::from_rupees(45_000));
        assert_eq!(
            budget.bundle(&BundleKey::groceries()).unwrap().remaining,
            Money::from_rupees(5_920)
        );
        assert_eq!(doc.emergency_fund.balance, Money::from_rupees(2_870));
        assert_eq!(doc.transactions(month())[0].recipient, "Starbucks");
        assert_eq!(doc.active_goals().len(), 2);
    }
}
