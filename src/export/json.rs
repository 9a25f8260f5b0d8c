//! JSON export of one month's ledger, with schema versioning

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetMonth, Money, Transaction, UserId};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One month of a user's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user: UserId,

    pub month: BudgetMonth,

    /// Income and bundles as currently stored
    pub budget: Budget,

    /// Transactions, most recent first
    pub transactions: Vec<Transaction>,

    pub metadata: ExportMetadata,
}

/// Totals included for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,

    /// Transactions still awaiting a bundle
    pub pending_count: usize,

    pub total_spent: Money,

    pub total_remaining: Money,
}

impl MonthExport {
    /// Collect a month from storage; `NotFound` when the month has no budget
    pub fn from_storage(storage: &Storage, user: &UserId, month: BudgetMonth) -> BudgetResult<Self> {
        let budget = BudgetService::new(storage).budget(user, month)?;
        let transactions = storage.store().list_transactions(user, month)?;

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            pending_count: transactions.iter().filter(|t| t.is_pending()).count(),
            total_spent: transactions.iter().map(|t| t.amount).sum(),
            total_remaining: budget.total_remaining(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user: user.clone(),
            month,
            budget,
            transactions,
            metadata,
        })
    }
}

/// Export a month to pretty-printed JSON
pub fn export_month_json<W: Write>(
    storage: &Storage,
    user: &UserId,
    month: BudgetMonth,
    writer: &mut W,
) -> BudgetResult<()> {
    let export = MonthExport::from_storage(storage, user, month)?;

    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}
