//! Client error taxonomy.
//!
//! Every storefront operation returns `Result<T, ClientError>`. The variants
//! separate failures by where they happened:
//!
//! - `Validation` / `Cart` - rejected locally, nothing was sent;
//! - `Transport` - no response was received;
//! - `Rejected` - the service answered with a non-success status;
//! - `Ownership` - the service refused an update/delete because the email
//!   does not match the item's creator;
//! - `Busy` - the same kind of action is already in flight.
//!
//! None of these alter the session's cart or form, so the user can retry.

use std::fmt;

use beanstall_core::{CartError, ValidationError};
use thiserror::Error;

/// Kinds of user action that are limited to one in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Submitting the cart as an order.
    Checkout,
    /// Creating, updating or deleting a menu item.
    Mutation,
    /// Reloading the catalog.
    Refresh,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checkout => "checkout",
            Self::Mutation => "menu change",
            Self::Refresh => "menu refresh",
        })
    }
}

/// Errors returned by storefront operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A form field failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cart refused the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The request never got a response (connection, DNS, timeout).
    #[error("could not reach the order service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Best-effort message from the response body.
        message: String,
    },

    /// The email does not match the item's creator.
    #[error("{message}")]
    Ownership {
        /// Best-effort message from the response body.
        message: String,
    },

    /// A success response could not be understood.
    #[error("unexpected response from the order service: {0}")]
    Parse(String),

    /// The same kind of action is already running.
    #[error("a {0} is already in progress")]
    Busy(Action),
}

impl ClientError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Ownership { .. } => Some(401),
            _ => None,
        }
    }

    /// Returns `true` if the failure happened before anything was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Cart(_) | Self::Busy(_))
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
