//! Savings goal model
//!
//! Goals live outside the monthly budget. Their balance only grows through
//! explicit deposits, and deleting a goal is a soft delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Deleted,
}

/// A named savings target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// Unique identifier
    pub id: GoalId,

    /// Display name
    pub name: String,

    /// Amount to reach
    pub target_amount: Money,

    /// Amount deposited so far
    pub current_amount: Money,

    /// Active or soft-deleted
    #[serde(default)]
    pub status: GoalStatus,

    /// When the goal was created
    pub created_at: DateTime<Utc>,

    /// When the goal was soft-deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SavingsGoal {
    /// Create a new active goal with nothing saved yet
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            id: GoalId::new(),
            name: name.into().trim().to_string(),
            target_amount,
            current_amount: Money::zero(),
            status: GoalStatus::Active,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    /// Derived: the target has been reached
    pub fn is_achieved(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Amount still needed (zero once achieved)
    pub fn amount_to_go(&self) -> Money {
        self.target_amount.saturating_sub_to_zero(self.current_amount)
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percent(&self) -> f64 {
        self.current_amount.percent_of(self.target_amount).min(100.0)
    }

    /// Add a deposit; callers validate that `amount` is positive
    pub fn deposit(&mut self, amount: Money) {
        self.current_amount += amount;
    }

    /// Soft delete
    pub fn mark_deleted(&mut self) {
        self.status = GoalStatus::Deleted;
        self.deleted_at = Some(Utc::now());
    }

    /// Validate name and target
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }
        Ok(())
    }
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {} ({:.0}%)",
            self.name,
            self.current_amount,
            self.target_amount,
            self.progress_percent()
        )
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Goal target must be greater than zero (got {})", amount)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}
