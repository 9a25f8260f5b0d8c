//! Path management for BudgetWise
//!
//! Provides XDG-compliant path resolution for configuration, user data and
//! exports.
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGETWISE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/budgetwise` or `~/.config/budgetwise`
//! 3. Windows: `%APPDATA%\budgetwise`

use std::path::PathBuf;

use crate::error::BudgetError;
use crate::models::UserId;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BUDGETWISE_DATA_DIR";

/// Manages all paths used by BudgetWise
#[derive(Debug, Clone)]
pub struct BudgetwisePaths {
    /// Base directory for all BudgetWise data
    base_dir: PathBuf,
}

impl BudgetwisePaths {
    /// Create a new BudgetwisePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create BudgetwisePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/budgetwise/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/budgetwise/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding one document per user
    pub fn users_dir(&self) -> PathBuf {
        self.data_dir().join("users")
    }

    /// Document for a single user
    pub fn user_file(&self, user: &UserId) -> PathBuf {
        self.users_dir().join(format!("{}.json", user.as_str()))
    }

    /// Get the export directory (~/.config/budgetwise/exports/)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure all required directories exist
    ///
    /// Creates the base, data/users and exports directories.
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.users_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if BudgetWise has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BudgetError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("budgetwise"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BudgetError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("budgetwise"))
}
