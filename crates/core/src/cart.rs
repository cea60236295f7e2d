//! Cart store: item quantities with an order-wide ceiling.
//!
//! The cart is a map from [`MenuId`] to a strictly positive quantity. Two
//! invariants hold after every operation:
//!
//! - the sum of all quantities is at most [`Cart::MAX_TOTAL`];
//! - no entry is stored with a quantity of zero.
//!
//! All operations are synchronous, so a cart update can never be interleaved
//! with a pending network call.

use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::{Catalog, CatalogItem};
use crate::types::MenuId;

/// Errors returned by cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// Adding would push the total past the ceiling. The cart is unchanged.
    #[error("an order may contain at most {max} items")]
    CapacityExceeded {
        /// The ceiling that was hit.
        max: u32,
    },
}

/// Quantities of selected menu items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: HashMap<MenuId, u32>,
}

impl Cart {
    /// Maximum total quantity across all items.
    pub const MAX_TOTAL: u32 = 100;

    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CapacityExceeded`] and leaves the cart untouched
    /// if the total is already at [`Cart::MAX_TOTAL`].
    pub fn add(&mut self, id: MenuId) -> Result<u32, CartError> {
        if self.total() >= Self::MAX_TOTAL {
            return Err(CartError::CapacityExceeded {
                max: Self::MAX_TOTAL,
            });
        }
        let quantity = self.lines.entry(id).or_insert(0);
        *quantity += 1;
        Ok(*quantity)
    }

    /// Remove one unit of `id`, deleting the entry when it reaches zero.
    ///
    /// Returns the remaining quantity. Removing an id that is not in the cart
    /// does nothing and returns 0.
    pub fn remove(&mut self, id: MenuId) -> u32 {
        match self.lines.get(&id).copied() {
            None => 0,
            Some(quantity) if quantity <= 1 => {
                self.lines.remove(&id);
                0
            }
            Some(quantity) => {
                self.lines.insert(id, quantity - 1);
                quantity - 1
            }
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.lines.values().sum()
    }

    /// Quantity held for `id`, or 0.
    #[must_use]
    pub fn quantity(&self, id: MenuId) -> u32 {
        self.lines.get(&id).copied().unwrap_or(0)
    }

    /// Returns `true` if nothing is in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Catalog items that are in the cart, in catalog order.
    ///
    /// The iterator is lazy and borrows both sides, so calling this again
    /// yields the same sequence as long as neither has changed.
    pub fn selected<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = &'a CatalogItem> + Clone + 'a {
        catalog
            .iter()
            .filter(move |item| self.quantity(item.id) > 0)
    }

    /// Selected items paired with their quantities, in catalog order.
    pub fn entries<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = (&'a CatalogItem, u32)> + 'a {
        self.selected(catalog)
            .map(move |item| (item, self.quantity(item.id)))
    }

    /// Price of everything in the cart that is still on the catalog.
    #[must_use]
    pub fn total_price(&self, catalog: &Catalog) -> u64 {
        self.entries(catalog)
            .map(|(item, quantity)| item.price.times(quantity))
            .sum()
    }

    /// Drop entries whose item is no longer on the catalog.
    ///
    /// Returns the number of entries removed.
    pub fn retain_known(&mut self, catalog: &Catalog) -> usize {
        let before = self.lines.len();
        self.lines.retain(|id, _| catalog.contains(*id));
        before - self.lines.len()
    }
}
