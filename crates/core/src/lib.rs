//! Beanstall Core - Shared types and client-side state.
//!
//! This crate provides the types and pure state machines used by every
//! Beanstall component:
//! - `storefront` - HTTP client and orchestrators for the menu/order service
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and synchronous logic - no I/O, no
//! HTTP clients. Every mutation here completes without suspending, which is
//! what lets the storefront crate treat a cart update as atomic.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and postcodes
//! - [`catalog`] - Menu items as the storefront sees them
//! - [`cart`] - Item quantities with the 100-unit ceiling
//! - [`order`] - Order form, order request, and order history shapes
//! - [`menu`] - Menu create/update/delete inputs and image uploads
//! - [`validation`] - Field-level validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod menu;
pub mod order;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartError};
pub use catalog::{Catalog, CatalogItem};
pub use menu::{
    CreateMenuBody, DeleteMenuBody, ImageSource, ImageUpload, MenuDraft, MenuEdit, MenuRemoval,
    NewMenu, UpdateMenuBody,
};
pub use order::{
    OrderAck, OrderForm, OrderHistory, OrderLine, OrderRequest, PastOrder, PastOrderItem,
};
pub use types::*;
pub use validation::ValidationError;
