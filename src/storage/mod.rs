//! Storage layer for BudgetWise
//!
//! `BudgetStore` is the persistence interface the ledger services talk to.
//! Two implementations exist: `JsonStore` keeps one JSON document per user
//! with atomic writes, and `MemoryStore` keeps everything in memory and is
//! seeded with sample data when no store has been configured.
//!
//! `Storage` is the coordinator handed to services: the store, the audit
//! logger and the per-(user, month) mutation locks.

pub mod document;
pub mod file_io;
pub mod json;
pub mod locks;
pub mod memory;

pub use document::UserDocument;
pub use file_io::{read_json, write_json_atomic};
pub use json::JsonStore;
pub use locks::LedgerLocks;
pub use memory::MemoryStore;

use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{BudgetwisePaths, Settings, StorageBackend};
use crate::error::BudgetResult;
use crate::models::{
    Budget, BudgetMonth, BundleKey, EmergencyFund, GoalId, Money, SavingsGoal, Transaction,
    TransactionId, UserId,
};

/// Persistence operations used by the ledger services
///
/// Every call either commits fully or returns an error; nothing is retried.
pub trait BudgetStore: Send + Sync {
    fn load_budget(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<Option<Budget>>;

    fn save_budget(&self, user: &UserId, month: BudgetMonth, budget: &Budget) -> BudgetResult<()>;

    fn update_bundle_remaining(
        &self,
        user: &UserId,
        month: BudgetMonth,
        key: &BundleKey,
        new_remaining: Money,
    ) -> BudgetResult<()>;

    fn append_transaction(
        &self,
        user: &UserId,
        month: BudgetMonth,
        txn: &Transaction,
    ) -> BudgetResult<()>;

    /// Transactions for the month, most recent first
    fn list_transactions(&self, user: &UserId, month: BudgetMonth)
        -> BudgetResult<Vec<Transaction>>;

    /// Move a pending transaction to `categorized` under `new_key`
    fn recategorize_transaction(
        &self,
        user: &UserId,
        month: BudgetMonth,
        id: TransactionId,
        new_key: &BundleKey,
    ) -> BudgetResult<Transaction>;

    fn emergency_fund(&self, user: &UserId) -> BudgetResult<EmergencyFund>;

    fn deposit_emergency_fund(&self, user: &UserId, amount: Money) -> BudgetResult<EmergencyFund>;

    /// Active goals only
    fn list_goals(&self, user: &UserId) -> BudgetResult<Vec<SavingsGoal>>;

    fn create_goal(&self, user: &UserId, goal: &SavingsGoal) -> BudgetResult<()>;

    fn deposit_goal(&self, user: &UserId, id: GoalId, amount: Money)
        -> BudgetResult<SavingsGoal>;

    /// Soft delete
    fn delete_goal(&self, user: &UserId, id: GoalId) -> BudgetResult<SavingsGoal>;
}

/// Stores built on one `UserDocument` per user
///
/// Implementors only provide document access; the `BudgetStore` operations
/// come from the blanket impl below. `with_document_mut` must leave the
/// stored document unchanged when the closure or the write fails.
pub trait DocumentStore: Send + Sync {
    fn with_document<T>(&self, user: &UserId, f: impl FnOnce(&UserDocument) -> T)
        -> BudgetResult<T>;

    fn with_document_mut<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut UserDocument) -> BudgetResult<T>,
    ) -> BudgetResult<T>;
}

impl<S: DocumentStore> BudgetStore for S {
    fn load_budget(&self, user: &UserId, month: BudgetMonth) -> BudgetResult<Option<Budget>> {
        self.with_document(user, |doc| doc.budget(month).cloned())
    }

    fn save_budget(&self, user: &UserId, month: BudgetMonth, budget: &Budget) -> BudgetResult<()> {
        self.with_document_mut(user, |doc| {
            doc.set_budget(month, budget.clone());
            Ok(())
        })
    }

    fn update_bundle_remaining(
        &self,
        user: &UserId,
        month: BudgetMonth,
        key: &BundleKey,
        new_remaining: Money,
    ) -> BudgetResult<()> {
        self.with_document_mut(user, |doc| doc.update_bundle_remaining(month, key, new_remaining))
    }

    fn append_transaction(
        &self,
        user: &UserId,
        month: BudgetMonth,
        txn: &Transaction,
    ) -> BudgetResult<()> {
        self.with_document_mut(user, |doc| {
            doc.append_transaction(month, txn.clone());
            Ok(())
        })
    }

    fn list_transactions(
        &self,
        user: &UserId,
        month: BudgetMonth,
    ) -> BudgetResult<Vec<Transaction>> {
        self.with_document(user, |doc| doc.transactions(month))
    }

    fn recategorize_transaction(
        &self,
        user: &UserId,
        month: BudgetMonth,
        id: TransactionId,
        new_key: &BundleKey,
    ) -> BudgetResult<Transaction> {
        self.with_document_mut(user, |doc| doc.recategorize_transaction(month, id, new_key))
    }

    fn emergency_fund(&self, user: &UserId) -> BudgetResult<EmergencyFund> {
        self.with_document(user, |doc| doc.emergency_fund)
    }

    fn deposit_emergency_fund(&self, user: &UserId, amount: Money) -> BudgetResult<EmergencyFund> {
        self.with_document_mut(user, |doc| Ok(doc.deposit_emergency_fund(amount)))
    }

    fn list_goals(&self, user: &UserId) -> BudgetResult<Vec<SavingsGoal>> {
        self.with_document(user, |doc| doc.active_goals())
    }

    fn create_goal(&self, user: &UserId, goal: &SavingsGoal) -> BudgetResult<()> {
        self.with_document_mut(user, |doc| {
            doc.add_goal(goal.clone());
            Ok(())
        })
    }

    fn deposit_goal(
        &self,
        user: &UserId,
        id: GoalId,
        amount: Money,
    ) -> BudgetResult<SavingsGoal> {
        self.with_document_mut(user, |doc| doc.deposit_goal(id, amount))
    }

    fn delete_goal(&self, user: &UserId, id: GoalId) -> BudgetResult<SavingsGoal> {
        self.with_document_mut(user, |doc| doc.delete_goal(id))
    }
}

/// Main storage coordinator handed to services
pub struct Storage {
    store: Box<dyn BudgetStore>,
    audit: Option<AuditLogger>,
    locks: LedgerLocks,
    backend: StorageBackend,
}

impl Storage {
    /// Open the store selected by `settings`
    ///
    /// The JSON backend creates the data directories and enables the audit
    /// log. The sample backend needs nothing on disk.
    pub fn open(paths: &BudgetwisePaths, settings: &Settings) -> BudgetResult<Self> {
        match settings.storage_backend {
            StorageBackend::Json => {
                paths.ensure_directories()?;
                Ok(Self {
                    store: Box::new(JsonStore::new(paths.clone())),
                    audit: Some(AuditLogger::new(paths.audit_log())),
                    locks: LedgerLocks::new(),
                    backend: StorageBackend::Json,
                })
            }
            StorageBackend::Sample => Ok(Self::sample()),
        }
    }

    /// Degraded mode: in-memory store seeded with sample data, no audit log
    pub fn sample() -> Self {
        Self {
            store: Box::new(MemoryStore::with_sample_data()),
            audit: None,
            locks: LedgerLocks::new(),
            backend: StorageBackend::Sample,
        }
    }

    /// Empty in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Wrap an arbitrary store, without audit logging
    pub fn with_store(store: Box<dyn BudgetStore>) -> Self {
        Self {
            store,
            audit: None,
            locks: LedgerLocks::new(),
            backend: StorageBackend::Sample,
        }
    }

    /// Enable audit logging to `logger`
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn store(&self) -> &dyn BudgetStore {
        self.store.as_ref()
    }

    pub fn locks(&self) -> &LedgerLocks {
        &self.locks
    }

    pub fn is_sample_mode(&self) -> bool {
        self.backend == StorageBackend::Sample
    }

    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Record a committed mutation; the entry is only built with a logger
    ///
    /// A failed audit write is reported but does not turn the already
    /// committed operation into a failure.
    pub fn audit(&self, entry: impl FnOnce() -> AuditEntry) {
        if let Some(logger) = &self.audit {
            let entry = entry();
            if let Err(e) = logger.log(&entry) {
                warn!(
                    entity = %entry.entity_id,
                    error = %e,
                    "failed to write audit entry"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{EntityType, Operation};
    use tempfile::TempDir;

    #[test]
    fn test_open_json_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, &Settings::default()).unwrap();

        assert!(paths.users_dir().exists());
        assert!(!storage.is_sample_mode());
        assert!(storage.audit_logger().is_some());
    }

    #[test]
    fn test_open_sample_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetwisePaths::with_base_dir(temp_dir.path().join("nowhere"));
        let storage = Storage::open(&paths, &Settings::sample()).unwrap();

        assert!(storage.is_sample_mode());
        assert!(storage.audit_logger().is_none());
        assert!(!paths.base_dir().exists());
    }

    #[test]
    fn test_audit_writes_entry() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::in_memory()
            .with_audit_logger(AuditLogger::new(temp_dir.path().join("audit.log")));
        let user = UserId::new("asha").unwrap();

        storage.audit(|| {
            AuditEntry::update(
                &user,
                EntityType::EmergencyFund,
                "asha",
                &EmergencyFund::with_balance(Money::from_rupees(100)),
                &EmergencyFund::with_balance(Money::from_rupees(150)),
            )
        });

        let entries = storage.audit_logger().unwrap().read_recent(&user, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("balance: 10000 -> 15000")
        );
    }

    #[test]
    fn test_no_audit_without_logger() {
        let storage = Storage::in_memory();
        let mut built = false;
        storage.audit(|| {
            built = true;
            AuditEntry::create(
                &UserId::new("asha").unwrap(),
                EntityType::Budget,
                "asha/2025-01",
                &"ignored",
            )
        });
        assert!(!built);
        assert!(storage.audit_logger().is_none());
    }
}
