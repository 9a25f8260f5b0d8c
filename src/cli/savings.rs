//! Savings goal and emergency fund CLI commands

use clap::Subcommand;

use super::Scope;
use crate::config::Settings;
use crate::display;
use crate::error::BudgetResult;
use crate::models::Money;
use crate::services::SavingsService;
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// List active goals
    List,

    /// Create a goal
    Create {
        /// Goal name
        name: String,
        /// Target amount
        target: Money,
    },

    /// Add money to a goal
    Deposit {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        amount: Money,
    },

    /// Delete a goal (its history is kept)
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Emergency fund subcommands
#[derive(Subcommand, Debug)]
pub enum FundCommands {
    /// Show the balance and how many months it covers
    Show,

    /// Top up the fund
    Deposit {
        /// Amount to add
        amount: Money,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    scope: &Scope,
    cmd: GoalCommands,
) -> BudgetResult<()> {
    let service = SavingsService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::List => {
            let goals = service.goals(&scope.user)?;
            print!("{}", display::format_goal_list(&goals, symbol));
        }
        GoalCommands::Create { name, target } => {
            let goal = service.create_goal(&scope.user, &name, target)?;
            println!("Created goal '{}' ({})", goal.name, goal.id);
        }
        GoalCommands::Deposit { goal, amount } => {
            let goal = service.find_goal(&scope.user, &goal)?;
            let goal = service.deposit_goal(&scope.user, goal.id, amount)?;
            print!("{}", display::format_goal_details(&goal, symbol));
        }
        GoalCommands::Delete { goal } => {
            let goal = service.find_goal(&scope.user, &goal)?;
            let goal = service.delete_goal(&scope.user, goal.id)?;
            println!("Deleted goal '{}'", goal.name);
        }
    }

    Ok(())
}

/// Handle an emergency fund command
pub fn handle_fund_command(
    storage: &Storage,
    settings: &Settings,
    scope: &Scope,
    cmd: FundCommands,
) -> BudgetResult<()> {
    let service = SavingsService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    let fund = match cmd {
        FundCommands::Show => service.emergency_fund(&scope.user)?,
        FundCommands::Deposit { amount } => {
            service.deposit_emergency_fund(&scope.user, amount)?
        }
    };

    let months = fund.months_of_buffer(settings.monthly_expense_estimate);
    print!("{}", display::format_emergency_fund(&fund, months, symbol));

    Ok(())
}
