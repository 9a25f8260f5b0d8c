//! Export module for BudgetWise
//!
//! Exports one month of a user's ledger:
//! - CSV: the transaction list (spreadsheet-compatible)
//! - JSON: budget, bundles and transactions, machine-readable
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_transactions_csv;
pub use json::{export_month_json, MonthExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_month_yaml;
