//! Transaction display formatting
//!
//! Register tables for `history` and `pending list`, and the confirmation
//! printed after a payment or categorization.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::{Transaction, TransactionStatus};
use crate::services::PaymentOutcome;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Recipient")]
    recipient: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Bundle")]
    bundle: String,
    #[tabled(rename = "St")]
    status: &'static str,
}

fn status_icon(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "⏳",
        TransactionStatus::Completed => "✓",
        TransactionStatus::Categorized => "↳",
    }
}

/// Format a list of transactions as a register, most recent first
pub fn format_transaction_register(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: txn.id.to_string(),
            date: txn.created_at.format("%Y-%m-%d").to_string(),
            recipient: truncate(&txn.recipient, 24),
            amount: txn.amount.format_with_symbol(symbol),
            bundle: txn.bundle_key.to_string(),
            status: status_icon(txn.status),
        })
        .collect();

    let mut output = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()))
        .to_string();
    output.push('\n');
    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Date:        {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("Recipient:   {}\n", txn.recipient));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Bundle:      {}\n", txn.bundle_key));
    output.push_str(&format!("Status:      {}\n", txn.status));

    if !txn.note.is_empty() {
        output.push_str(&format!("Note:        {}\n", txn.note));
    }
    if let Some(at) = txn.categorized_at {
        output.push_str(&format!("Categorized: {}\n", at.format("%Y-%m-%d %H:%M")));
    }

    output
}

/// One-line confirmation for a committed payment
pub fn format_payment_outcome(outcome: &PaymentOutcome, symbol: &str) -> String {
    let txn = &outcome.transaction;
    let amount = txn.amount.format_with_symbol(symbol);

    match (txn.status, outcome.new_remaining) {
        (TransactionStatus::Pending, _) => format!(
            "Recorded urgent payment of {} to {} ({}). Categorize it later with 'budgetwise pending categorize {} <bundle>'.",
            amount, txn.recipient, txn.id, txn.id
        ),
        (TransactionStatus::Categorized, Some(remaining)) => format!(
            "Categorized {} to {} under {}. {} left in {}.",
            txn.id,
            txn.recipient,
            txn.bundle_key,
            remaining.format_with_symbol(symbol),
            txn.bundle_key
        ),
        (_, Some(remaining)) => format!(
            "Paid {} to {} from {}. {} left in {}.",
            amount,
            txn.recipient,
            txn.bundle_key,
            remaining.format_with_symbol(symbol),
            txn.bundle_key
        ),
        (_, None) => format!("Paid {} to {}.", amount, txn.recipient),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BundleKey, Money};

    #[test]
    fn test_register() {
        let txns = vec![
            Transaction::pending("Taxi", Money::from_rupees(150), ""),
            Transaction::completed("Starbucks", Money::from_rupees(200), BundleKey::meals(), ""),
        ];

        let output = format_transaction_register(&txns, "₹");
        assert!(output.contains("Taxi"));
        assert!(output.contains("uncategorized"));
        assert!(output.contains("₹200.00"));
        assert!(output.contains(&txns[0].id.to_string()));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[], "₹"), "No transactions found.\n");
    }

    #[test]
    fn test_payment_outcome_messages() {
        let paid = PaymentOutcome {
            transaction: Transaction::completed(
                "Cafe",
                Money::from_rupees(850),
                BundleKey::meals(),
                "",
            ),
            new_remaining: Some(Money::from_rupees(7150)),
        };
        assert_eq!(
            format_payment_outcome(&paid, "₹"),
            "Paid ₹850.00 to Cafe from meals. ₹7150.00 left in meals."
        );

        let deferred = PaymentOutcome {
            transaction: Transaction::pending("Taxi", Money::from_rupees(150), ""),
            new_remaining: None,
        };
        assert!(format_payment_outcome(&deferred, "₹").starts_with("Recorded urgent payment"));
    }

    #[test]
    fn test_details_show_note() {
        let txn = Transaction::completed("Cafe", Money::from_rupees(1), BundleKey::meals(), "latte");
        let output = format_transaction_details(&txn, "₹");
        assert!(output.contains("Note:        latte"));
        assert!(output.contains("Status:      completed"));
    }
}
