//! Bundle model
//!
//! A bundle is one spending category for one month: an immutable allocation
//! and a mutable remaining balance. Bundle keys are validated once at the
//! boundary and never rebuilt from string concatenation afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Identifier of a bundle within a budget (e.g. "meals")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BundleKey(String);

impl BundleKey {
    pub const MEALS: &'static str = "meals";
    pub const GROCERIES: &'static str = "groceries";
    pub const RENT: &'static str = "rent";
    pub const SAVINGS: &'static str = "savings";
    pub const UNCATEGORIZED: &'static str = "uncategorized";

    /// The bundles whose usage drives the health score and insights
    pub const VARIABLE: [&'static str; 3] = [Self::MEALS, Self::GROCERIES, Self::RENT];

    /// Create a key; trimmed and lowercased, ASCII alphanumerics, '_' or '-'
    pub fn new(key: impl AsRef<str>) -> Result<Self, BundleKeyError> {
        let key = key.as_ref().trim().to_lowercase();
        if key.is_empty() {
            return Err(BundleKeyError::Empty);
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(BundleKeyError::InvalidCharacters(key));
        }
        Ok(Self(key))
    }

    pub fn meals() -> Self {
        Self(Self::MEALS.to_string())
    }

    pub fn groceries() -> Self {
        Self(Self::GROCERIES.to_string())
    }

    pub fn rent() -> Self {
        Self(Self::RENT.to_string())
    }

    pub fn savings() -> Self {
        Self(Self::SAVINGS.to_string())
    }

    /// Sentinel carried by deferred payments until they are categorized
    pub fn uncategorized() -> Self {
        Self(Self::UNCATEGORIZED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Savings is always protected, whatever a stored budget says
    pub fn is_savings(&self) -> bool {
        self.0 == Self::SAVINGS
    }

    pub fn is_uncategorized(&self) -> bool {
        self.0 == Self::UNCATEGORIZED
    }

    /// Title-cased display name ("meals" -> "Meals")
    pub fn title(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BundleKey {
    type Err = BundleKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BundleKey {
    type Error = BundleKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BundleKey> for String {
    fn from(key: BundleKey) -> Self {
        key.0
    }
}

/// Errors from constructing a `BundleKey`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleKeyError {
    Empty,
    InvalidCharacters(String),
}

impl fmt::Display for BundleKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Bundle key cannot be empty"),
            Self::InvalidCharacters(key) => write!(
                f,
                "Bundle key '{}' may only contain letters, digits, '_' and '-'",
                key
            ),
        }
    }
}

impl std::error::Error for BundleKeyError {}

/// One spending category for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Stable identifier
    pub key: BundleKey,

    /// Amount set at budget creation
    pub allocated: Money,

    /// Amount still spendable
    pub remaining: Money,

    /// Protected bundles are never debited by a payment
    #[serde(default)]
    pub protected: bool,
}

impl Bundle {
    /// Create a bundle with its full allocation remaining
    pub fn new(key: BundleKey, allocated: Money) -> Self {
        let protected = key.is_savings();
        Self {
            key,
            allocated,
            remaining: allocated,
            protected,
        }
    }

    /// Amount spent so far
    pub fn spent(&self) -> Money {
        self.allocated - self.remaining
    }

    /// Nothing has been spent
    pub fn is_untouched(&self) -> bool {
        self.remaining == self.allocated
    }

    /// Spent more than `percent` of the allocation (exact integer comparison)
    ///
    /// A zero allocation counts as 0% used.
    pub fn used_more_than(&self, percent: i64) -> bool {
        if self.allocated.is_zero() {
            return false;
        }
        let spent = self.allocated.paise() as i128 - self.remaining.paise() as i128;
        spent * 100 > self.allocated.paise() as i128 * percent as i128
    }

    /// Remaining is below `percent` of the allocation (exact integer comparison)
    pub fn remaining_below(&self, percent: i64) -> bool {
        (self.remaining.paise() as i128) * 100 < self.allocated.paise() as i128 * percent as i128
    }

    /// Fraction of the allocation spent, for display
    pub fn percent_used(&self) -> f64 {
        self.spent().percent_of(self.allocated)
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} remaining{}",
            self.key,
            self.remaining,
            self.allocated,
            if self.protected { " (protected)" } else { "" }
        )
    }
}
