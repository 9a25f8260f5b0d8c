//! Savings goals and the emergency fund
//!
//! Both live outside the monthly budget and only grow through explicit
//! deposits. No payment path reads from them and nothing tops up the
//! emergency fund automatically.

use tracing::info;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{EmergencyFund, GoalId, Money, SavingsGoal, UserId};
use crate::storage::Storage;

/// Service for goals and the emergency fund
pub struct SavingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SavingsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Active goals
    pub fn goals(&self, user: &UserId) -> BudgetResult<Vec<SavingsGoal>> {
        self.storage.store().list_goals(user)
    }

    /// Find an active goal by full or short id, or by name (case-insensitive)
    pub fn find_goal(&self, user: &UserId, identifier: &str) -> BudgetResult<SavingsGoal> {
        let identifier = identifier.trim();
        let goals = self.goals(user)?;

        if let Ok(id) = identifier.parse::<GoalId>() {
            if let Some(goal) = goals.iter().find(|g| g.id == id) {
                return Ok(goal.clone());
            }
        }

        goals
            .into_iter()
            .find(|g| g.id.matches_short(identifier) || g.name.eq_ignore_ascii_case(identifier))
            .ok_or_else(|| BudgetError::goal_not_found(identifier))
    }

    pub fn create_goal(
        &self,
        user: &UserId,
        name: &str,
        target: Money,
    ) -> BudgetResult<SavingsGoal> {
        let goal = SavingsGoal::new(name, target);
        goal.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.store().create_goal(user, &goal)?;

        info!(user = %user, goal = %goal.name, target = %target, "savings goal created");
        self.storage.audit(|| {
            AuditEntry::create(user, EntityType::SavingsGoal, goal.id.to_string(), &goal)
                .named(goal.name.clone())
                .with_diff(format!("target {}", goal.target_amount))
        });

        Ok(goal)
    }

    pub fn deposit_goal(
        &self,
        user: &UserId,
        id: GoalId,
        amount: Money,
    ) -> BudgetResult<SavingsGoal> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }

        let before = self
            .goals(user)?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| BudgetError::goal_not_found(id.to_string()))?;
        if before.current_amount.checked_add(amount).is_none() {
            return Err(BudgetError::Validation(format!(
                "Depositing {} would overflow goal '{}'",
                amount, before.name
            )));
        }
        let after = self.storage.store().deposit_goal(user, id, amount)?;

        info!(user = %user, goal = %after.name, amount = %amount, "goal deposit");
        self.storage.audit(|| {
            AuditEntry::update(user, EntityType::SavingsGoal, id.to_string(), &before, &after)
                .named(after.name.clone())
                .with_diff(format!(
                    "saved: {} -> {} of {}",
                    before.current_amount, after.current_amount, after.target_amount
                ))
        });

        Ok(after)
    }

    /// Soft delete
    pub fn delete_goal(&self, user: &UserId, id: GoalId) -> BudgetResult<SavingsGoal> {
        let deleted = self.storage.store().delete_goal(user, id)?;

        info!(user = %user, goal = %deleted.name, "savings goal deleted");
        self.storage.audit(|| {
            AuditEntry::delete(user, EntityType::SavingsGoal, id.to_string(), &deleted)
                .named(deleted.name.clone())
        });

        Ok(deleted)
    }

    pub fn emergency_fund(&self, user: &UserId) -> BudgetResult<EmergencyFund> {
        self.storage.store().emergency_fund(user)
    }

    pub fn deposit_emergency_fund(
        &self,
        user: &UserId,
        amount: Money,
    ) -> BudgetResult<EmergencyFund> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidAmount(amount));
        }

        let before = self.emergency_fund(user)?;
        if before.balance.checked_add(amount).is_none() {
            return Err(BudgetError::Validation(format!(
                "Depositing {} would overflow the emergency fund",
                amount
            )));
        }
        let after = self.storage.store().deposit_emergency_fund(user, amount)?;

        info!(user = %user, amount = %amount, balance = %after.balance, "emergency fund deposit");
        self.storage.audit(|| {
            AuditEntry::update(user, EntityType::EmergencyFund, user.to_string(), &before, &after)
                .with_diff(format!("balance: {} -> {}", before.balance, after.balance))
        });

        Ok(after)
    }

    /// Months of expenses the emergency fund covers
    pub fn months_of_buffer(&self, user: &UserId, monthly_expenses: Money) -> BudgetResult<f64> {
        Ok(self.emergency_fund(user)?.months_of_buffer(monthly_expenses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetMonth;
    use crate::storage::MemoryStore;

    fn rupees(r: i64) -> Money {
        Money::from_rupees(r)
    }

    fn user() -> UserId {
        UserId::new("asha").unwrap()
    }

    fn sample_storage() -> Storage {
        Storage::with_store(Box::new(MemoryStore::with_sample_month(
            BudgetMonth::new(2025, 1).unwrap(),
        )))
    }

    #[test]
    fn test_sample_goals() {
        let storage = sample_storage();
        let service = SavingsService::new(&storage);
        let goals = service.goals(&user()).unwrap();

        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].name, "Vacation");
        assert_eq!(goals[0].progress_percent(), 30.0);
        assert_eq!(goals[1].progress_percent(), 45.0);
    }

    #[test]
    fn test_create_and_deposit() {
        let storage = Storage::in_memory();
        let service = SavingsService::new(&storage);

        let goal = service.create_goal(&user(), "Bike", rupees(20000)).unwrap();
        let updated = service.deposit_goal(&user(), goal.id, rupees(5000)).unwrap();

        assert_eq!(updated.current_amount, rupees(5000));
        assert_eq!(updated.amount_to_go(), rupees(15000));
        assert!(!updated.is_achieved());
    }

    #[test]
    fn test_goal_validation() {
        let storage = Storage::in_memory();
        let service = SavingsService::new(&storage);

        assert!(matches!(
            service.create_goal(&user(), "", rupees(100)),
            Err(BudgetError::Validation(_))
        ));
        assert!(matches!(
            service.create_goal(&user(), "Bike", Money::zero()),
            Err(BudgetError::Validation(_))
        ));

        let goal = service.create_goal(&user(), "Bike", rupees(100)).unwrap();
        assert!(matches!(
            service.deposit_goal(&user(), goal.id, Money::zero()),
            Err(BudgetError::InvalidAmount(_))
        ));
        assert!(service
            .deposit_goal(&user(), GoalId::new(), rupees(10))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_deposits_that_would_overflow_change_nothing() {
        let storage = Storage::in_memory();
        let service = SavingsService::new(&storage);
        let huge = Money::from_paise(i64::MAX - 10);

        let goal = service.create_goal(&user(), "Moon", Money::from_paise(i64::MAX)).unwrap();
        service.deposit_goal(&user(), goal.id, huge).unwrap();
        assert!(matches!(
            service.deposit_goal(&user(), goal.id, rupees(1)),
            Err(BudgetError::Validation(_))
        ));
        assert_eq!(service.find_goal(&user(), "Moon").unwrap().current_amount, huge);

        service.deposit_emergency_fund(&user(), huge).unwrap();
        assert!(matches!(
            service.deposit_emergency_fund(&user(), rupees(1)),
            Err(BudgetError::Validation(_))
        ));
        assert_eq!(service.emergency_fund(&user()).unwrap().balance, huge);
    }

    #[test]
    fn test_delete_is_soft() {
        let storage = sample_storage();
        let service = SavingsService::new(&storage);
        let vacation = service.find_goal(&user(), "vacation").unwrap();

        let deleted = service.delete_goal(&user(), vacation.id).unwrap();
        assert!(!deleted.is_active());
        assert_eq!(deleted.current_amount, rupees(15000));

        assert_eq!(service.goals(&user()).unwrap().len(), 1);
        assert!(service.delete_goal(&user(), vacation.id).unwrap_err().is_not_found());
        assert!(service
            .deposit_goal(&user(), vacation.id, rupees(10))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_find_goal_by_short_id() {
        let storage = sample_storage();
        let service = SavingsService::new(&storage);
        let laptop = service.find_goal(&user(), "New Laptop").unwrap();

        let short = laptop.id.to_string();
        assert_eq!(service.find_goal(&user(), &short).unwrap().id, laptop.id);
        assert!(service.find_goal(&user(), "Boat").unwrap_err().is_not_found());
    }

    #[test]
    fn test_emergency_fund() {
        let storage = sample_storage();
        let service = SavingsService::new(&storage);

        assert_eq!(service.emergency_fund(&user()).unwrap().balance, rupees(2870));
        let fund = service.deposit_emergency_fund(&user(), rupees(7130)).unwrap();
        assert_eq!(fund.balance, rupees(10000));
        assert_eq!(
            service.months_of_buffer(&user(), rupees(10000)).unwrap(),
            1.0
        );
        assert!(matches!(
            service.deposit_emergency_fund(&user(), rupees(-1)),
            Err(BudgetError::InvalidAmount(_))
        ));
    }
}
