//! YAML export of one month's ledger, for human reading

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::MonthExport;
use crate::models::{BudgetMonth, UserId};
use crate::storage::Storage;

/// Export a month to YAML, preceded by a comment header
pub fn export_month_yaml<W: Write>(
    storage: &Storage,
    user: &UserId,
    month: BudgetMonth,
    writer: &mut W,
) -> BudgetResult<()> {
    let export = MonthExport::from_storage(storage, user, month)?;
    let to_export_error = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# BudgetWise export: {} for {}", month.friendly(), user)
        .map_err(to_export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(to_export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(to_export_error)?;
    writeln!(writer).map_err(to_export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}
