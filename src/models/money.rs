//! Money type for representing currency amounts
//!
//! Internally stores amounts in paise (i64) to avoid floating-point precision
//! issues. The operators saturate at the i64 bounds; `checked_add` and
//! `checked_sub` are for places where an overflow has to be reported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Default currency symbol used by `Display`
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Represents a monetary amount stored as paise (hundredths of a rupee)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from paise
    ///
    /// # Examples
    /// ```
    /// use budgetwise::models::Money;
    /// let amount = Money::from_paise(85050); // ₹850.50
    /// assert_eq!(amount.rupees(), 850);
    /// ```
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    /// Create a Money amount from whole rupees
    ///
    /// # Examples
    /// ```
    /// use budgetwise::models::Money;
    /// let amount = Money::from_rupees(850);
    /// assert_eq!(amount.paise(), 85000);
    /// ```
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees.saturating_mul(100))
    }

    /// Create a Money amount from rupees and paise
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        Self(rupees.saturating_mul(100).saturating_add(paise))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in paise
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Get the whole rupees portion (truncated toward zero)
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Get the paise portion (0-99)
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Add, or `None` on overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract, or `None` on overflow
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum every amount, or `None` if the total overflows
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, m| acc.checked_add(m))
    }

    /// Subtract, flooring the result at zero
    pub fn saturating_sub_to_zero(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0).max(0))
    }

    /// Divide evenly into `parts`, truncating; zero when `parts` is not positive
    pub fn split_evenly(self, parts: i64) -> Self {
        if parts <= 0 {
            Self::zero()
        } else {
            Self(self.0 / parts)
        }
    }

    /// This amount as a percentage of `total`; zero when `total` is zero
    pub fn percent_of(&self, total: Money) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            self.0 as f64 / total.0 as f64 * 100.0
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "850", "850.5", "850.50", "₹850.50", "-10", "Rs 10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s
            .strip_prefix(DEFAULT_CURRENCY_SYMBOL)
            .or_else(|| s.strip_prefix("Rs"))
            .unwrap_or(s)
            .trim()
            .replace(',', "");

        let paise = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let rupees: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };

            let paise_str = parts[1];
            if !paise_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }
            let paise: i64 = match paise_str.len() {
                0 => 0,
                1 => {
                    paise_str
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => paise_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            rupees
                .checked_mul(100)
                .and_then(|p| p.checked_add(paise))
                .ok_or_else(|| MoneyParseError::Overflow(s.to_string()))?
        } else {
            s.parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                .checked_mul(100)
                .ok_or_else(|| MoneyParseError::Overflow(s.to_string()))?
        };

        Ok(Self(if negative { -paise } else { paise }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.rupees().abs(),
                self.paise_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.rupees(), self.paise_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol(DEFAULT_CURRENCY_SYMBOL))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    Overflow(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::Overflow(s) => write!(f, "Amount too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
