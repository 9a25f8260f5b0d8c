//! Transaction model
//!
//! A payment record. Transactions are created either `completed` (a bundle
//! was chosen and debited at payment time) or `pending` against the
//! `uncategorized` sentinel (an urgent payment). A pending transaction moves
//! to `categorized` exactly once; `completed` and `categorized` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bundle::BundleKey;
use super::ids::TransactionId;
use super::money::Money;

/// Status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Paid urgently, waiting for a bundle
    Pending,
    /// Paid from a bundle chosen at payment time
    Completed,
    /// A pending payment that has since been assigned to a bundle
    Categorized,
}

impl TransactionStatus {
    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Categorized => write!(f, "categorized"),
        }
    }
}

/// A payment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Who was paid
    pub recipient: String,

    /// Amount paid (always positive)
    pub amount: Money,

    /// Bundle the payment belongs to, or `uncategorized` while pending
    pub bundle_key: BundleKey,

    /// Free-text note
    #[serde(default)]
    pub note: String,

    /// Lifecycle status
    pub status: TransactionStatus,

    /// When the payment was made
    pub created_at: DateTime<Utc>,

    /// When a pending payment was categorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorized_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// A payment debited from `bundle_key` at payment time
    pub fn completed(
        recipient: impl Into<String>,
        amount: Money,
        bundle_key: BundleKey,
        note: impl Into<String>,
    ) -> Self {
        Self::with_status(recipient, amount, bundle_key, note, TransactionStatus::Completed)
    }

    /// An urgent payment awaiting categorization
    pub fn pending(recipient: impl Into<String>, amount: Money, note: impl Into<String>) -> Self {
        Self::with_status(
            recipient,
            amount,
            BundleKey::uncategorized(),
            note,
            TransactionStatus::Pending,
        )
    }

    fn with_status(
        recipient: impl Into<String>,
        amount: Money,
        bundle_key: BundleKey,
        note: impl Into<String>,
        status: TransactionStatus,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            recipient: recipient.into().trim().to_string(),
            amount,
            bundle_key,
            note: note.into(),
            status,
            created_at: Utc::now(),
            categorized_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Tagged to a real bundle (not the uncategorized sentinel)
    pub fn is_categorized_to(&self, key: &BundleKey) -> bool {
        !self.is_pending() && &self.bundle_key == key
    }

    /// Apply the one allowed transition: pending -> categorized
    pub fn categorize(&mut self, bundle_key: BundleKey) -> Result<(), TransactionStateError> {
        if !self.is_pending() {
            return Err(TransactionStateError::NotPending(self.status));
        }
        self.bundle_key = bundle_key;
        self.status = TransactionStatus::Categorized;
        self.categorized_at = Some(Utc::now());
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.created_at.format("%Y-%m-%d"),
            self.recipient,
            self.amount,
            self.bundle_key
        )
    }
}

/// Invalid transaction state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStateError {
    NotPending(TransactionStatus),
}

impl fmt::Display for TransactionStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPending(status) => {
                write!(f, "Transaction is {}, only pending ones can be categorized", status)
            }
        }
    }
}

impl std::error::Error for TransactionStateError {}
