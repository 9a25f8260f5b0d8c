//! Budget CLI commands
//!
//! Implements CLI commands for creating a month's budget and viewing its
//! bundles, statistics and trend.

use clap::Subcommand;

use super::Scope;
use crate::config::Settings;
use crate::display;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BundleKey, Money};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Allocate a month's income into bundles
    Create {
        /// Monthly income (e.g., "45000" or "45000.50")
        income: Money,

        /// Bundle allocation as key=amount; repeat for each bundle
        #[arg(short, long = "bundle", value_name = "KEY=AMOUNT", required = true)]
        bundles: Vec<String>,
    },

    /// Show bundles and what is left in each
    Show,

    /// Show income, spending and remaining totals
    Stats,

    /// Show spending per bundle
    Spending,

    /// Show totals for recent months
    Trend {
        /// Number of months to show, ending at --month
        #[arg(short = 'n', long, default_value = "3")]
        months: u32,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    scope: &Scope,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Create { income, bundles } => {
            let allocations = bundles
                .iter()
                .map(|spec| parse_allocation(spec))
                .collect::<BudgetResult<Vec<_>>>()?;

            let budget = service.create_budget(&scope.user, scope.month, income, allocations)?;

            println!(
                "Created budget for {}: {} across {} bundles",
                scope.month.friendly(),
                budget.income.format_with_symbol(symbol),
                budget.bundles.len()
            );
            let unallocated = budget.unallocated();
            if unallocated.is_positive() {
                println!(
                    "{} is not allocated to any bundle.",
                    unallocated.format_with_symbol(symbol)
                );
            }
        }

        BudgetCommands::Show => {
            let snapshot = service.snapshot(&scope.user, scope.month)?;
            print!("{}", display::format_budget(&snapshot, scope.month, symbol));
        }

        BudgetCommands::Stats => {
            let stats = service.monthly_stats(&scope.user, scope.month)?;
            print!("{}", display::format_monthly_stats(&stats, symbol));
        }

        BudgetCommands::Spending => {
            let breakdown = service.spending_by_bundle(&scope.user, scope.month)?;
            print!("{}", display::format_spending_breakdown(&breakdown, symbol));
        }

        BudgetCommands::Trend { months } => {
            let trend = service.spending_trend(&scope.user, scope.month, months)?;
            print!("{}", display::format_trend(&trend, symbol));
        }
    }

    Ok(())
}

/// Parse "meals=8000" into a bundle allocation
pub fn parse_allocation(spec: &str) -> BudgetResult<(BundleKey, Money)> {
    let (key, amount) = spec.split_once('=').ok_or_else(|| {
        BudgetError::Validation(format!(
            "Invalid bundle allocation '{}': expected KEY=AMOUNT",
            spec
        ))
    })?;

    let key = BundleKey::new(key).map_err(|e| BudgetError::Validation(e.to_string()))?;
    let amount = Money::parse(amount).map_err(|e| BudgetError::Validation(e.to_string()))?;

    Ok((key, amount))
}
