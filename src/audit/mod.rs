//! Audit logging for BudgetWise
//!
//! Every committed ledger mutation (budget creation, payment, deferral,
//! categorization, goal and emergency-fund changes) is appended to
//! `audit.log` as one JSON object per line with before/after values.
//!
//! - `AuditEntry`: a single entry with timestamp, user, month, entity and
//!   values. `payment` and `categorization` build the entries for the payment
//!   flows, with summaries like `bundle: uncategorized -> meals`.
//! - `AuditLogger`: appends entries to the log file and reads them back per user.
//! - `generate_diff`: short human-readable summary of what changed.
//!
//! The audit log is only active with a persistent store; sample mode keeps
//! nothing.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
