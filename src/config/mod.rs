//! Configuration module for BudgetWise
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Storage backend selection

pub mod paths;
pub mod settings;

pub use paths::BudgetwisePaths;
pub use settings::{Settings, StorageBackend};
