//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted shape: no whitespace, one `@`, and a dot with at least one
/// character on each side somewhere after it. The local part may be empty.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]*@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The input contains more than one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MultipleAtSymbols,
    /// The part after the @ has no dot separating two non-empty labels.
    #[error("email domain must contain a dot")]
    MissingDomainDot,
}

/// An email address, as accepted by the storefront forms.
///
/// This is a UX gate, not a deliverability check. The rule is deliberately
/// loose and must stay that way to match what the backend's clients accept.
///
/// ## Constraints
///
/// - No whitespace anywhere
/// - Exactly one @ symbol
/// - After the @, a dot with at least one character before and after it
/// - The local part (before @) may be empty
///
/// ## Examples
///
/// ```
/// use beanstall_core::Email;
///
/// assert!(Email::parse("a@b.c").is_ok());
/// assert!(Email::parse("@c.d").is_ok());        // empty local part is accepted
///
/// assert!(Email::parse("a@b").is_err());        // no dot after @
/// assert!(Email::parse("a b@c.d").is_err());    // whitespace
/// assert!(Email::parse("a@b@c.d").is_err());    // two @ symbols
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks, checked in the order listed
    /// on [`EmailError`].
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if EMAIL_PATTERN.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(diagnose(s))
        }
    }

    /// Returns `true` if `s` would parse as an [`Email`].
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        EMAIL_PATTERN.is_match(s)
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

fn diagnose(s: &str) -> EmailError {
    if s.is_empty() {
        return EmailError::Empty;
    }
    if s.chars().any(char::is_whitespace) {
        return EmailError::ContainsWhitespace;
    }
    match s.matches('@').count() {
        0 => EmailError::MissingAtSymbol,
        1 => EmailError::MissingDomainDot,
        _ => EmailError::MultipleAtSymbols,
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
