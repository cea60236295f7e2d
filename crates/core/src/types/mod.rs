//! Core types for Beanstall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod postcode;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use postcode::{Postcode, PostcodeError};
pub use price::{Price, PriceError, format_won};
