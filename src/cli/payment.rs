//! Payment CLI commands
//!
//! `pay` for immediate and urgent payments, `pending` for categorizing
//! urgent ones later, and `history` for the month's register.

use clap::{Args, Subcommand};

use super::Scope;
use crate::config::Settings;
use crate::display;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BundleKey, Money, TransactionId};
use crate::services::PaymentProcessor;
use crate::storage::Storage;

/// Arguments for `pay`
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Who was paid
    pub recipient: String,

    /// Amount (e.g., "850" or "₹850.50")
    pub amount: Money,

    /// Bundle to pay from
    #[arg(short, long, required_unless_present = "urgent", conflicts_with = "urgent")]
    pub bundle: Option<BundleKey>,

    /// Pay now and pick the bundle later
    #[arg(short, long)]
    pub urgent: bool,

    /// Free-form note
    #[arg(short, long, default_value = "")]
    pub note: String,
}

/// Pending payment subcommands
#[derive(Subcommand, Debug)]
pub enum PendingCommands {
    /// List urgent payments waiting for a bundle
    List,

    /// Show one transaction of the month in detail
    Show {
        /// Transaction ID (full or short form)
        id: String,
    },

    /// Charge a pending payment to a bundle
    Categorize {
        /// Transaction ID (full or short form, e.g. "txn-1a2b3c4d")
        id: String,

        /// Bundle to charge
        bundle: BundleKey,
    },
}

/// Handle `pay`
pub fn handle_pay(
    storage: &Storage,
    settings: &Settings,
    scope: &Scope,
    args: PayArgs,
) -> BudgetResult<()> {
    let processor = PaymentProcessor::new(storage);

    let outcome = match (args.urgent, &args.bundle) {
        (false, Some(key)) => processor.process(
            &scope.user,
            scope.month,
            &args.recipient,
            args.amount,
            key,
            &args.note,
        )?,
        _ => processor.deferred_process(
            &scope.user,
            scope.month,
            &args.recipient,
            args.amount,
            &args.note,
        )?,
    };

    println!(
        "{}",
        display::format_payment_outcome(&outcome, &settings.currency_symbol)
    );

    if outcome.new_remaining.is_some() {
        let warnings = processor.low_balance_warnings(&scope.user, scope.month)?;
        for warning in warnings
            .iter()
            .filter(|w| w.bundle == outcome.transaction.bundle_key)
        {
            println!("⚠ {}", warning.message());
        }
    }

    Ok(())
}

/// Handle a pending command
pub fn handle_pending_command(
    storage: &Storage,
    settings: &Settings,
    scope: &Scope,
    cmd: PendingCommands,
) -> BudgetResult<()> {
    let processor = PaymentProcessor::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        PendingCommands::List => {
            let pending = processor.pending(&scope.user, scope.month)?;
            if pending.is_empty() {
                println!("No payments waiting for a bundle.");
            } else {
                print!("{}", display::format_transaction_register(&pending, symbol));
            }
        }

        PendingCommands::Show { id } => {
            let id = resolve_transaction_id(&processor, scope, &id)?;
            let history = processor.history(&scope.user, scope.month)?;
            let txn = history
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;
            print!("{}", display::format_transaction_details(txn, symbol));
        }

        PendingCommands::Categorize { id, bundle } => {
            let id = resolve_transaction_id(&processor, scope, &id)?;
            let outcome = processor.categorize(&scope.user, scope.month, id, &bundle)?;
            println!("{}", display::format_payment_outcome(&outcome, symbol));
        }
    }

    Ok(())
}

/// Handle `history`
pub fn handle_history(storage: &Storage, settings: &Settings, scope: &Scope) -> BudgetResult<()> {
    let history = PaymentProcessor::new(storage).history(&scope.user, scope.month)?;
    print!(
        "{}",
        display::format_transaction_register(&history, &settings.currency_symbol)
    );
    Ok(())
}

/// Accept a full UUID or a unique short prefix from the register
fn resolve_transaction_id(
    processor: &PaymentProcessor,
    scope: &Scope,
    identifier: &str,
) -> BudgetResult<TransactionId> {
    let identifier = identifier.trim();
    if let Ok(id) = identifier.parse::<TransactionId>() {
        return Ok(id);
    }

    let matches: Vec<TransactionId> = processor
        .history(&scope.user, scope.month)?
        .iter()
        .map(|t| t.id)
        .filter(|id| id.matches_short(identifier))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(BudgetError::transaction_not_found(identifier)),
        _ => Err(BudgetError::Validation(format!(
            "Transaction ID '{}' is ambiguous; use more characters",
            identifier
        ))),
    }
}
