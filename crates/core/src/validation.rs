//! Field-level validation errors.
//!
//! These are raised before any request is built. Each variant maps to one
//! form field so the caller can show a message next to the right input; the
//! `Display` text is the user-facing message.

use thiserror::Error;

use crate::types::{EmailError, PostcodeError, PriceError};

/// A local validation failure. Never sent to the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The cart holds more units than one order may contain.
    #[error("an order may contain at most {max} items")]
    TooManyItems {
        /// Maximum total quantity per order.
        max: u32,
    },

    /// The email field is empty or malformed.
    #[error("please enter a valid email address")]
    InvalidEmail(#[source] EmailError),

    /// The postcode field is not five digits.
    #[error("postcode must be 5 digits")]
    InvalidPostcode(#[source] PostcodeError),

    /// The delivery address is blank.
    #[error("please enter a delivery address")]
    MissingAddress,

    /// A required menu field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The menu price is not a whole number in range.
    #[error("price must be a whole number between 0 and 10,000,000")]
    InvalidPrice(#[source] PriceError),

    /// The image file is empty.
    #[error("the image file is empty")]
    EmptyImage,

    /// The file is not an image.
    #[error("only image files can be uploaded (got {content_type})")]
    NotAnImage {
        /// Content type of the rejected file.
        content_type: String,
    },

    /// The image file exceeds the upload limit.
    #[error("image files may not exceed {max_mib}MB")]
    ImageTooLarge {
        /// Upload limit in MiB.
        max_mib: usize,
    },
}

impl From<EmailError> for ValidationError {
    fn from(err: EmailError) -> Self {
        Self::InvalidEmail(err)
    }
}

impl From<PostcodeError> for ValidationError {
    fn from(err: PostcodeError) -> Self {
        Self::InvalidPostcode(err)
    }
}

impl From<PriceError> for ValidationError {
    fn from(err: PriceError) -> Self {
        Self::InvalidPrice(err)
    }
}

/// Return `value` trimmed, or [`ValidationError::MissingField`] if blank.
///
/// # Errors
///
/// Returns `MissingField(field)` when `value` is empty or only whitespace.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_field_specific() {
        assert_eq!(
            ValidationError::InvalidEmail(EmailError::Empty).to_string(),
            "please enter a valid email address"
        );
        assert_eq!(
            ValidationError::InvalidPostcode(PostcodeError::NonDigit).to_string(),
            "postcode must be 5 digits"
        );
        assert_eq!(
            ValidationError::TooManyItems { max: 100 }.to_string(),
            "an order may contain at most 100 items"
        );
        assert_eq!(
            ValidationError::MissingField("category").to_string(),
            "category is required"
        );
    }

    #[test]
    fn test_require() {
        assert_eq!(require("name", "  Ethiopia  "), Ok("Ethiopia"));
        assert_eq!(
            require("name", "   "),
            Err(ValidationError::MissingField("name"))
        );
    }
}
