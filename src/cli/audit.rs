//! `audit` command: show recent audit log entries for the current user

use super::Scope;
use crate::error::BudgetResult;
use crate::storage::Storage;

/// Print the user's most recent `count` entries, oldest first
pub fn handle_audit(storage: &Storage, scope: &Scope, count: usize) -> BudgetResult<()> {
    let Some(logger) = storage.audit_logger() else {
        println!("The audit log is disabled while using sample data.");
        return Ok(());
    };

    let entries = logger.read_recent(&scope.user, count)?;
    if entries.is_empty() {
        println!("No audit entries for {} yet.", scope.user);
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
