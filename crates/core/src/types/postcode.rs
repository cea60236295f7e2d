//! Five-digit postal code.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Postcode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostcodeError {
    /// Wrong number of characters.
    #[error("postcode must be exactly {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// A character other than an ASCII digit.
    #[error("postcode must contain only digits")]
    NonDigit,
}

/// A postal code of exactly five ASCII digits.
///
/// Leading zeros are kept in the textual form. The order service takes the
/// postcode as an integer, see [`Postcode::as_u32`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Postcode(String);

impl Postcode {
    /// Number of digits in a postcode.
    pub const LENGTH: usize = 5;

    /// Parse a `Postcode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly five ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PostcodeError> {
        if s.len() != Self::LENGTH {
            // A non-ASCII char could make byte length differ; report it as non-digit.
            return Err(if s.is_ascii() {
                PostcodeError::WrongLength {
                    expected: Self::LENGTH,
                }
            } else {
                PostcodeError::NonDigit
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostcodeError::NonDigit);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns `true` if `s` is exactly five ASCII digits.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the postcode as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value sent on the wire.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
            .bytes()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Postcode {
    type Err = PostcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
