//! Orchestrators for storefront actions.
//!
//! # Services
//!
//! - `catalog` - Fetch the menu into the session
//! - `checkout` - Validate the cart and form, place the order
//! - `menu` - Create, update and delete menu items
//! - `history` - Look up past orders by email
//!
//! Every orchestrator follows the same shape: validate locally, mark the
//! action in flight, send one request, clear the mark, then apply the result
//! to the session. A failure at any step leaves the cart and form as they
//! were.

pub mod catalog;
pub mod checkout;
pub mod history;
pub mod menu;
