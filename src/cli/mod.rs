//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod budget;
pub mod export;
pub mod insights;
pub mod payment;
pub mod savings;

pub use audit::handle_audit;
pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, ExportCommands};
pub use insights::{handle_insights_command, InsightsCommands};
pub use payment::{handle_history, handle_pay, handle_pending_command, PayArgs, PendingCommands};
pub use savings::{handle_fund_command, handle_goal_command, FundCommands, GoalCommands};

use crate::models::{BudgetMonth, UserId};

/// Who and which month a command acts on
#[derive(Debug, Clone)]
pub struct Scope {
    pub user: UserId,
    pub month: BudgetMonth,
}
