//! In-memory store
//!
//! Used when no persistent store is configured, and by tests. With sample
//! data enabled every user is seeded on first access with the same
//! deterministic reference month; changes last for the life of the process.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetMonth, UserId};

use super::document::UserDocument;
use super::DocumentStore;

/// Process-local store
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, UserDocument>>,
    sample_month: Option<BudgetMonth>,
}

impl MemoryStore {
    /// Empty store; unknown users have no data
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            sample_month: None,
        }
    }

    /// Store that seeds each user with sample data for the current month
    pub fn with_sample_data() -> Self {
        Self::with_sample_month(BudgetMonth::current())
    }

    /// Store that seeds each user with sample data for `month`
    pub fn with_sample_month(month: BudgetMonth) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            sample_month: Some(month),
        }
    }

    fn seed(&self, user: &UserId) -> UserDocument {
        match self.sample_month {
            Some(month) => {
                debug!(user = %user, month = %month, "seeding sample data");
                UserDocument::sample(month)
            }
            None => UserDocument::default(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn with_document<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&UserDocument) -> T,
    ) -> BudgetResult<T> {
        {
            let users = self.users.read().map_err(|e| {
                BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(doc) = users.get(user) {
                return Ok(f(doc));
            }
        }

        let mut users = self.users.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let doc = users
            .entry(user.clone())
            .or_insert_with(|| self.seed(user));
        Ok(f(doc))
    }

    fn with_document_mut<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut UserDocument) -> BudgetResult<T>,
    ) -> BudgetResult<T> {
        let mut users = self.users.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut doc = match users.get(user) {
            Some(doc) => doc.clone(),
            None => self.seed(user),
        };
        let result = f(&mut doc)?;
        users.insert(user.clone(), doc);

        Ok(result)
    }
}
