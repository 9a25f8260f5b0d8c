//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::generate_diff;
use crate::models::{BudgetMonth, Money, Transaction, TransactionStatus, UserId};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Budget,
    Transaction,
    SavingsGoal,
    EmergencyFund,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Budget => write!(f, "Budget"),
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::SavingsGoal => write!(f, "SavingsGoal"),
            EntityType::EmergencyFund => write!(f, "EmergencyFund"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Owner of the ledger that changed
    pub user: UserId,

    /// Budget month, for month-scoped entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<BudgetMonth>,

    pub entity_type: EntityType,

    /// ID of the affected entity (`txn-…`, `goal-…`, `asha/2025-01`)
    pub entity_id: String,

    /// Human-readable description, e.g. the recipient of a payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Entity before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Entity after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            user: user.clone(),
            month: None,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a create operation
    pub fn create<T: Serialize>(
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, user, entity_type, entity_id);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// Entry for an update operation
    ///
    /// The diff summary is derived from the two values; `with_diff` replaces
    /// it with a domain-specific one.
    pub fn update<T: Serialize>(
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, user, entity_type, entity_id);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        if let (Some(b), Some(a)) = (&entry.before, &entry.after) {
            entry.diff_summary = generate_diff(b, a);
        }
        entry
    }

    /// Entry for a (soft) delete operation
    pub fn delete<T: Serialize>(
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, user, entity_type, entity_id);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// A payment recorded in `month`, immediate or urgent
    pub fn payment(user: &UserId, month: BudgetMonth, txn: &Transaction) -> Self {
        let summary = match txn.status {
            TransactionStatus::Pending => format!("{} awaiting categorization", txn.amount),
            _ => format!("{} paid from {}", txn.amount, txn.bundle_key),
        };
        Self::create(user, EntityType::Transaction, txn.id.to_string(), txn)
            .in_month(month)
            .named(txn.recipient.clone())
            .with_diff(summary)
    }

    /// A pending payment assigned to a bundle, with the bundle's balance move
    pub fn categorization(
        user: &UserId,
        month: BudgetMonth,
        before: &Transaction,
        after: &Transaction,
        remaining_before: Money,
        remaining_after: Money,
    ) -> Self {
        let summary = format!(
            "bundle: {} -> {}, status: {} -> {}, {} remaining: {} -> {}",
            before.bundle_key,
            after.bundle_key,
            before.status,
            after.status,
            after.bundle_key,
            remaining_before,
            remaining_after
        );
        Self::update(user, EntityType::Transaction, after.id.to_string(), before, after)
            .in_month(month)
            .named(after.recipient.clone())
            .with_diff(summary)
    }

    pub fn in_month(mut self, month: BudgetMonth) -> Self {
        self.month = Some(month);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn with_diff(mut self, summary: impl Into<String>) -> Self {
        self.diff_summary = Some(summary.into());
        self
    }

    /// One-line rendering, with the diff on a second line when present
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        match self.month {
            Some(month) => output.push_str(&format!(" for {}, {}", self.user, month.friendly())),
            None => output.push_str(&format!(" for {}", self.user)),
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BundleKey;
    use serde_json::json;

    fn user() -> UserId {
        UserId::new("asha").unwrap()
    }

    fn month() -> BudgetMonth {
        BudgetMonth::new(2025, 1).unwrap()
    }

    #[test]
    fn test_entity_type_serialization() {
        assert_eq!(
            serde_json::to_string(&EntityType::SavingsGoal).unwrap(),
            "\"savings_goal\""
        );
        assert_eq!(EntityType::EmergencyFund.to_string(), "EmergencyFund");
    }

    #[test]
    fn test_payment_entry() {
        let txn = Transaction::completed("Starbucks", Money::from_rupees(200), BundleKey::meals(), "");
        let entry = AuditEntry::payment(&user(), month(), &txn);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.month, Some(month()));
        assert!(entry.before.is_none());
        assert_eq!(entry.after.unwrap()["amount"], 20000);
        assert_eq!(entry.diff_summary.as_deref(), Some("₹200.00 paid from meals"));

        let urgent = Transaction::pending("Taxi", Money::from_rupees(150), "");
        let entry = AuditEntry::payment(&user(), month(), &urgent);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("₹150.00 awaiting categorization")
        );
    }

    #[test]
    fn test_categorization_entry_names_bundle_and_balance() {
        let before = Transaction::pending("DMart", Money::from_rupees(500), "");
        let mut after = before.clone();
        after.categorize(BundleKey::meals()).unwrap();

        let entry = AuditEntry::categorization(
            &user(),
            month(),
            &before,
            &after,
            Money::from_rupees(300),
            Money::zero(),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.entity_name.as_deref(), Some("DMart"));
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some(
                "bundle: uncategorized -> meals, status: pending -> categorized, \
                 meals remaining: ₹300.00 -> ₹0.00"
            )
        );
    }

    #[test]
    fn test_update_derives_diff() {
        let entry = AuditEntry::update(
            &user(),
            EntityType::EmergencyFund,
            "asha",
            &json!({"balance": 800000}),
            &json!({"balance": 715000}),
        );

        assert_eq!(entry.before.unwrap()["balance"], 800000);
        assert_eq!(entry.diff_summary.as_deref(), Some("balance: 800000 -> 715000"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::delete(
            &user(),
            EntityType::SavingsGoal,
            "goal-12345678",
            &json!({"name": "Vacation"}),
        )
        .named("Vacation");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("DELETE SavingsGoal goal-12345678 (Vacation) for asha"));

        let budget = AuditEntry::create(&user(), EntityType::Budget, "asha/2025-01", &json!({}))
            .in_month(month());
        assert!(budget
            .format_human_readable()
            .ends_with("CREATE Budget asha/2025-01 for asha, January 2025"));
    }
}
