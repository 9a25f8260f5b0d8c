//! Display formatting for terminal output
//!
//! Turns ledger snapshots, transactions and insights into tables and short
//! status lines. Every function takes the currency symbol to print.

pub mod budget;
pub mod insights;
pub mod report;
pub mod savings;
pub mod transaction;

pub use budget::{format_budget, format_monthly_stats, format_spending_breakdown, format_trend};
pub use insights::{
    format_daily_budget, format_health_score, format_insights, format_recommendations,
    format_savings_prediction, format_warnings,
};
pub use savings::{format_emergency_fund, format_goal_details, format_goal_list};
pub use transaction::{
    format_payment_outcome, format_transaction_details, format_transaction_register,
};
