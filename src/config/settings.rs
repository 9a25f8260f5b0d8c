//! User settings for BudgetWise
//!
//! Manages the storage backend choice, currency display and the thresholds
//! used by insights.

use serde::{Deserialize, Serialize};

use super::paths::BudgetwisePaths;
use crate::error::BudgetError;
use crate::models::money::DEFAULT_CURRENCY_SYMBOL;
use crate::models::Money;

/// Where ledger data lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document per user under `data/users/`
    #[default]
    Json,
    /// In-memory sample data, nothing persisted
    Sample,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Sample => write!(f, "sample"),
        }
    }
}

/// User settings for BudgetWise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Storage backend
    #[serde(default)]
    pub storage_backend: StorageBackend,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Average meal spend above which a recommendation is emitted
    #[serde(default = "default_meal_cost_threshold")]
    pub meal_cost_threshold: Money,

    /// Monthly expenses used to express the emergency fund in months
    #[serde(default = "default_monthly_expense_estimate")]
    pub monthly_expense_estimate: Money,

    /// User acting when `--user` is not given
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_meal_cost_threshold() -> Money {
    Money::from_rupees(300)
}

fn default_monthly_expense_estimate() -> Money {
    Money::from_rupees(10_000)
}

fn default_user() -> String {
    "default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            storage_backend: StorageBackend::default(),
            currency_symbol: default_currency(),
            meal_cost_threshold: default_meal_cost_threshold(),
            monthly_expense_estimate: default_monthly_expense_estimate(),
            default_user: default_user(),
        }
    }
}

impl Settings {
    /// Settings used when nothing has been initialized
    pub fn sample() -> Self {
        Self {
            storage_backend: StorageBackend::Sample,
            ..Self::default()
        }
    }

    /// Load settings from disk
    ///
    /// Without a config file the sample backend is selected and nothing is
    /// written; `init` is what creates the file.
    pub fn load(paths: &BudgetwisePaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            Ok(Settings::sample())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetwisePaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            BudgetError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// True when no persistent store is configured
    pub fn is_sample_mode(&self) -> bool {
        self.storage_backend == StorageBackend::Sample
    }

    /// Format an amount with the configured symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
