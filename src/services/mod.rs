//! Service layer for BudgetWise
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, the payment flows, derived statistics and insights.

pub mod budget;
pub mod insights;
pub mod payment;
pub mod savings;

pub use budget::{BudgetService, BundleSpending, MonthlyStats, SpendingBreakdown};
pub use insights::{
    Insight, InsightKind, InsightsEngine, Recommendation, SavingsPrediction, Tone,
    DEFAULT_MEAL_COST_THRESHOLD,
};
pub use payment::{
    daily_budget, low_balance_warnings, DailyBudget, LowBalanceWarning, PaymentOutcome,
    PaymentProcessor, WarningSeverity,
};
pub use savings::SavingsService;
