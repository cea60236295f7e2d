//! Whole-won price representation.
//!
//! The storefront trades in a currency without minor units, so a price is a
//! plain non-negative integer. Totals are computed in `u64` to leave room for
//! 100 units of the most expensive item.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a menu [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not an integer.
    #[error("price must be a whole number")]
    NotANumber,
    /// The value is below zero or above [`Price::MENU_MAX`].
    #[error("price must be between 0 and {max}")]
    OutOfRange {
        /// Inclusive upper bound.
        max: u32,
    },
}

/// A non-negative price in won.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Highest price a menu item may be created or updated with (inclusive).
    pub const MENU_MAX: u32 = 10_000_000;

    /// Create a price from a won amount.
    #[must_use]
    pub const fn new(won: u32) -> Self {
        Self(won)
    }

    /// Parse a price typed into a menu form.
    ///
    /// Surrounding whitespace is ignored. The value must be an integer in
    /// `0..=MENU_MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] for non-integer input and
    /// [`PriceError::OutOfRange`] for negative or too-large values.
    pub fn parse_menu_price(s: &str) -> Result<Self, PriceError> {
        let value: i64 = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        Self::menu_price(value)
    }

    /// Check an already-numeric menu price against the allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] outside `0..=MENU_MAX`.
    pub fn menu_price(value: i64) -> Result<Self, PriceError> {
        u32::try_from(value)
            .ok()
            .filter(|won| *won <= Self::MENU_MAX)
            .map(Self)
            .ok_or(PriceError::OutOfRange {
                max: Self::MENU_MAX,
            })
    }

    /// Returns the amount in won.
    #[must_use]
    pub const fn won(self) -> u32 {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> u64 {
        u64::from(self.0) * u64::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}원", format_grouped(u64::from(self.0)))
    }
}

/// Format a won amount with thousands separators, e.g. `15,860원`.
#[must_use]
pub fn format_won(amount: u64) -> String {
    format!("{}원", format_grouped(amount))
}

fn format_grouped(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
