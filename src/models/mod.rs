//! Core data models for BudgetWise
//!
//! This module contains the data structures of the bundle ledger: money,
//! identifiers, months, bundles, budgets, transactions, savings goals and the
//! emergency fund.

pub mod budget;
pub mod bundle;
pub mod emergency_fund;
pub mod goal;
pub mod ids;
pub mod money;
pub mod month;
pub mod transaction;

pub use budget::Budget;
pub use bundle::{Bundle, BundleKey, BundleKeyError};
pub use emergency_fund::EmergencyFund;
pub use goal::{GoalStatus, GoalValidationError, SavingsGoal};
pub use ids::{GoalId, TransactionId, UserId, UserIdError};
pub use money::{Money, MoneyParseError};
pub use month::{BudgetMonth, MonthParseError};
pub use transaction::{Transaction, TransactionStateError, TransactionStatus};
