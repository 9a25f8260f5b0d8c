//! BudgetWise - bundle-based monthly budgeting
//!
//! Monthly income is split into named bundles (meals, groceries, rent,
//! savings, ...). Payments are debited from a bundle chosen at payment time,
//! or recorded as urgent and assigned to a bundle later. Savings is protected
//! and can never be spent from.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, bundles, budgets, transactions, goals)
//! - `ledger`: The bundle ledger and its read-only snapshots
//! - `storage`: Store trait, JSON and in-memory stores, per-month locks
//! - `services`: Payments, insights, budgets and savings
//! - `audit`: Audit logging system
//! - `export`: CSV, JSON and YAML export of a month
//! - `display`: Terminal formatting
//! - `cli`: Command definitions and handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetwise::config::{BudgetwisePaths, Settings};
//! use budgetwise::storage::Storage;
//!
//! let paths = BudgetwisePaths::new()?;
//! let settings = Settings::load(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
