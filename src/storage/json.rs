//! JSON file store
//!
//! One document per user at `data/users/<user>.json`. Documents are loaded
//! lazily into an in-memory cache and every mutation is written through with
//! an atomic replace before the cache is updated.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::config::BudgetwisePaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;

use super::document::UserDocument;
use super::file_io::{read_json, write_json_atomic};
use super::DocumentStore;

/// File-backed store with a write-through cache
pub struct JsonStore {
    paths: BudgetwisePaths,
    cache: RwLock<HashMap<UserId, UserDocument>>,
}

impl JsonStore {
    pub fn new(paths: BudgetwisePaths) -> Self {
        Self {
            paths,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn load(&self, user: &UserId) -> BudgetResult<UserDocument> {
        let path = self.paths.user_file(user);
        debug!(user = %user, path = %path.display(), "loading user document");
        read_json(&path)
    }

    /// Drop cached documents so the next access re-reads from disk
    pub fn invalidate(&self) -> BudgetResult<()> {
        let mut cache = self.cache.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        cache.clear();
        Ok(())
    }
}

impl DocumentStore for JsonStore {
    fn with_document<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&UserDocument) -> T,
    ) -> BudgetResult<T> {
        {
            let cache = self.cache.read().map_err(|e| {
                BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(doc) = cache.get(user) {
                return Ok(f(doc));
            }
        }

        let mut cache = self.cache.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let doc = match cache.entry(user.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => entry.insert(self.load(user)?),
        };
        Ok(f(doc))
    }

    fn with_document_mut<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut UserDocument) -> BudgetResult<T>,
    ) -> BudgetResult<T> {
        let mut cache = self.cache.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut doc = match cache.get(user) {
            Some(doc) => doc.clone(),
            None => self.load(user)?,
        };

        let result = f(&mut doc)?;
        write_json_atomic(self.paths.user_file(user), &doc)?;
        cache.insert(user.clone(), doc);

        Ok(result)
    }
}
