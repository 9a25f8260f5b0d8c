//! CSV export of a month's transactions

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetMonth, UserId};
use crate::storage::Storage;

const HEADER: [&str; 8] = [
    "ID",
    "Created",
    "Recipient",
    "Amount",
    "Bundle",
    "Status",
    "Note",
    "Categorized",
];

/// Export a month's transactions to CSV, most recent first
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    user: &UserId,
    month: BudgetMonth,
    writer: W,
) -> BudgetResult<usize> {
    let transactions = storage.store().list_transactions(user, month)?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(HEADER).map_err(export_error)?;

    for txn in &transactions {
        let amount = format!("{}.{:02}", txn.amount.rupees(), txn.amount.paise_part());
        let categorized = txn
            .categorized_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        csv_writer
            .write_record([
                txn.id.as_uuid().to_string(),
                txn.created_at.to_rfc3339(),
                txn.recipient.clone(),
                amount,
                txn.bundle_key.to_string(),
                txn.status.to_string(),
                txn.note.clone(),
                categorized,
            ])
            .map_err(export_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(transactions.len())
}

fn export_error(e: csv::Error) -> BudgetError {
    BudgetError::Export(e.to_string())
}
