//! Emergency fund model
//!
//! A single running balance per user. Only explicit top-ups change it; no
//! payment flow ever reads from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A user's emergency fund balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EmergencyFund {
    /// Current balance
    pub balance: Money,

    /// When the balance last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmergencyFund {
    pub fn with_balance(balance: Money) -> Self {
        Self {
            balance,
            updated_at: None,
        }
    }

    /// Top up; callers validate that `amount` is positive
    pub fn deposit(&mut self, amount: Money) {
        self.balance += amount;
        self.updated_at = Some(Utc::now());
    }

    /// How many months of `monthly_expenses` the fund covers
    pub fn months_of_buffer(&self, monthly_expenses: Money) -> f64 {
        if !monthly_expenses.is_positive() {
            return 0.0;
        }
        self.balance.paise() as f64 / monthly_expenses.paise() as f64
    }
}

impl fmt::Display for EmergencyFund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Emergency fund: {}", self.balance)
    }
}
