//! Amount type for monthly expense values.
//!
//! This module provides the `Won` type which wraps a positive whole number of won and handles
//! parsing values that may include thousands separators or a trailing `원`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// A positive amount of money in whole won.
///
/// Stored as a plain JSON number. Displayed with thousands separators and a `원` suffix.
///
/// # Examples
///
/// ```
/// # use homelist::model::Won;
/// # use std::str::FromStr;
/// let amount = Won::from_str("1,320,000").unwrap();
/// assert_eq!(amount.value(), 1_320_000);
/// assert_eq!(amount.to_string(), "1,320,000원");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Won(u64);

impl Won {
    /// Creates a new amount. Returns an error if `value` is zero.
    pub fn new(value: u64) -> Result<Self, WonError> {
        if value == 0 {
            return Err(WonError::NotPositive);
        }
        Ok(Self(value))
    }

    /// Returns the number of won.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Formats `value` the same way `Display` does, for sums that are not themselves a `Won`.
    pub fn format(value: u64) -> String {
        if value <= MAX_EXACT_F64 {
            format!("{}원", format_num::format_num!(",.0f", value as f64))
        } else {
            format!("{}원", group_thousands(&value.to_string()))
        }
    }
}

/// Largest integer that survives the round trip through `f64` unchanged.
const MAX_EXACT_F64: u64 = 1 << 53;

/// Inserts a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// An error that can occur when parsing strings into `Won` values.
pub enum WonError {
    Empty,
    NotPositive,
    Parse(ParseIntError),
}

impl Debug for WonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WonError::Empty => f.write_str("Empty"),
            WonError::NotPositive => f.write_str("NotPositive"),
            WonError::Parse(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for WonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WonError::Empty => f.write_str("amount is empty"),
            WonError::NotPositive => f.write_str("amount must be greater than zero"),
            WonError::Parse(e) => write!(f, "amount is not a whole number: {e}"),
        }
    }
}

impl Error for WonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WonError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Won {
    type Err = WonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let without_unit = trimmed.strip_suffix('원').unwrap_or(trimmed).trim_end();
        if without_unit.is_empty() {
            return Err(WonError::Empty);
        }

        // Remove commas (thousand separators)
        let without_commas = without_unit.replace(',', "");
        let value = without_commas.parse::<u64>().map_err(WonError::Parse)?;
        Won::new(value)
    }
}

impl Display for Won {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&Won::format(self.0))
    }
}

impl TryFrom<u64> for Won {
    type Error = WonError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Won::new(value)
    }
}

impl From<Won> for u64 {
    fn from(won: Won) -> Self {
        won.value()
    }
}
