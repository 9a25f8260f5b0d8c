//! Custom error types for BudgetWise
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! Domain errors (invalid amount, over-allocation, protected bundle,
//! insufficient balance, not pending) are expected outcomes meant for direct
//! display to the user; the remaining variants wrap collaborator failures.

use thiserror::Error;

use crate::models::Money;

/// The main error type for BudgetWise operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Amount was zero or negative
    #[error("Invalid amount: {0} (amount must be greater than zero)")]
    InvalidAmount(Money),

    /// Allocations exceed income at budget creation
    #[error("Total allocated ({allocated}) exceeds income ({income}) by {difference}")]
    OverAllocation {
        income: Money,
        allocated: Money,
        difference: Money,
    },

    /// Attempt to spend from a protected bundle
    #[error("Cannot spend from protected bundle '{0}'")]
    ProtectedBundle(String),

    /// Amount exceeds what is left in a bundle
    #[error("Insufficient balance in bundle '{bundle}': need {needed}, only {available} available")]
    InsufficientBalance {
        bundle: String,
        needed: Money,
        available: Money,
    },

    /// Categorization requested for a transaction that is not pending
    #[error("Transaction {id} is not pending (status: {status})")]
    NotPending { id: String, status: String },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for input that is not an amount problem
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage collaborator failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl BudgetError {
    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for bundles
    pub fn bundle_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bundle",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for savings goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Savings goal",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an expected domain outcome rather than a failure
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::OverAllocation { .. }
                | Self::ProtectedBundle(_)
                | Self::InsufficientBalance { .. }
                | Self::NotPending { .. }
        )
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for BudgetWise operations
pub type BudgetResult<T> = Result<T, BudgetError>;
