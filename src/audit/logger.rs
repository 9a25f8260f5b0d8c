//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;

use super::entry::AuditEntry;

/// Writes audit entries to the audit log file, one JSON object per line
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush immediately
    pub fn log(&self, entry: &AuditEntry) -> BudgetResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BudgetError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| BudgetError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| BudgetError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| BudgetError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> BudgetResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BudgetError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                BudgetError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                BudgetError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries for `user`, oldest first
    pub fn read_recent(&self, user: &UserId, count: usize) -> BudgetResult<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| &e.user == user)
            .collect();
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use crate::models::{BudgetMonth, Money, Transaction};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        let txn = Transaction::pending("DMart", Money::from_rupees(500), "");
        let entry = AuditEntry::payment(&user("asha"), BudgetMonth::new(2025, 1).unwrap(), &txn);

        logger.log(&entry).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Transaction);
        assert_eq!(entries[0].entity_name.as_deref(), Some("DMart"));
        assert_eq!(entries[0].user, user("asha"));
        assert_eq!(entries[0].month, BudgetMonth::new(2025, 1).ok());
    }

    #[test]
    fn test_read_recent_is_per_user() {
        let (logger, _temp) = create_test_logger();

        for i in 0..6 {
            let owner = if i % 2 == 0 { user("asha") } else { user("ravi") };
            let entry = AuditEntry::create(
                &owner,
                EntityType::SavingsGoal,
                format!("goal-{}", i),
                &json!({"index": i}),
            );
            logger.log(&entry).unwrap();
        }

        let recent = logger.read_recent(&user("asha"), 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "goal-2");
        assert_eq!(recent[1].entity_id, "goal-4");

        assert_eq!(logger.read_recent(&user("ravi"), 10).unwrap().len(), 3);
        assert!(logger.read_recent(&user("meera"), 10).unwrap().is_empty());
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(&user("asha"), 5).unwrap().is_empty());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let (logger, temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(
                &user("asha"),
                EntityType::EmergencyFund,
                "asha",
                &json!({"balance": 287000}),
            ))
            .unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
