//! Insights CLI commands

use chrono::Local;
use clap::Subcommand;

use super::Scope;
use crate::config::Settings;
use crate::display;
use crate::error::BudgetResult;
use crate::models::BundleKey;
use crate::services::{InsightsEngine, PaymentProcessor};
use crate::storage::Storage;

/// Insights subcommands
#[derive(Subcommand, Debug)]
pub enum InsightsCommands {
    /// Budget health score (0-100)
    Score,

    /// Spending insights for the month
    List,

    /// Recommendations based on the health score and meal spending
    Recommend,

    /// What could go to the emergency fund at month end
    Predict,

    /// Bundles with less than 10% left
    Warnings,

    /// Safe daily spend for a bundle for the rest of the month
    Daily {
        /// Bundle key
        bundle: BundleKey,
    },
}

/// Handle an insights command
pub fn handle_insights_command(
    storage: &Storage,
    settings: &Settings,
    scope: &Scope,
    cmd: InsightsCommands,
) -> BudgetResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let engine = || {
        InsightsEngine::load(storage, &scope.user, scope.month)
            .map(|e| e.with_meal_cost_threshold(settings.meal_cost_threshold))
    };

    match cmd {
        InsightsCommands::Score => {
            print!("{}", display::format_health_score(engine()?.health_score()));
        }
        InsightsCommands::List => {
            print!("{}", display::format_insights(&engine()?.spending_insights()));
        }
        InsightsCommands::Recommend => {
            print!(
                "{}",
                display::format_recommendations(&engine()?.recommendations())
            );
        }
        InsightsCommands::Predict => {
            print!(
                "{}",
                display::format_savings_prediction(&engine()?.predict_savings(), symbol)
            );
        }
        InsightsCommands::Warnings => {
            let warnings =
                PaymentProcessor::new(storage).low_balance_warnings(&scope.user, scope.month)?;
            print!("{}", display::format_warnings(&warnings, symbol));
        }
        InsightsCommands::Daily { bundle } => {
            let today = Local::now().date_naive();
            let daily = PaymentProcessor::new(storage).daily_budget(
                &scope.user,
                scope.month,
                &bundle,
                today,
            )?;
            print!("{}", display::format_daily_budget(&daily, symbol));
        }
    }

    Ok(())
}
