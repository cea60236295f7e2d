//! Per-user storefront session.
//!
//! A [`Session`] owns everything a shopper's page would otherwise keep in
//! ambient UI state: the catalog as last fetched, the cart, the checkout
//! form, and one in-flight flag per action kind. Orchestrators take the
//! session explicitly. They mutate it only in synchronous steps before and
//! after a request, never while a request is pending.

use beanstall_core::{Cart, CartError, Catalog, CatalogItem, MenuId, OrderForm};
use tracing::debug;

use crate::error::{Action, ClientError};

/// Which actions currently have a request outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InFlight {
    checkout: bool,
    mutation: bool,
    refresh: bool,
}

impl InFlight {
    fn flag(&mut self, action: Action) -> &mut bool {
        match action {
            Action::Checkout => &mut self.checkout,
            Action::Mutation => &mut self.mutation,
            Action::Refresh => &mut self.refresh,
        }
    }
}

/// Clears an in-flight mark when dropped.
///
/// Held across the network call so a request future that is cancelled (a
/// timeout, a `select!` branch, an aborted task) still releases its action.
#[must_use = "the action is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FlightGuard<'a> {
    session: &'a mut Session,
    action: Action,
}

impl FlightGuard<'_> {
    /// The action this guard holds.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.session.finish(self.action);
    }
}

/// Client-side state for one shopper.
#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: Catalog,
    cart: Cart,
    form: OrderForm,
    in_flight: InFlight,
}

impl Session {
    /// Start an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items as last fetched.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The checkout form.
    #[must_use]
    pub const fn form(&self) -> &OrderForm {
        &self.form
    }

    /// Edit the checkout form.
    pub fn form_mut(&mut self) -> &mut OrderForm {
        &mut self.form
    }

    /// Add one unit of an item to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CapacityExceeded` when the cart is full; the cart
    /// is left unchanged.
    pub fn add_to_cart(&mut self, id: MenuId) -> Result<u32, CartError> {
        let quantity = self.cart.add(id)?;
        debug!(menu_id = %id, quantity, total = self.cart.total(), "Added to cart");
        Ok(quantity)
    }

    /// Remove one unit of an item from the cart. Absent items are ignored.
    pub fn remove_from_cart(&mut self, id: MenuId) -> u32 {
        let quantity = self.cart.remove(id);
        debug!(menu_id = %id, quantity, total = self.cart.total(), "Removed from cart");
        quantity
    }

    /// Items in the cart, in catalog order.
    pub fn selected(&self) -> impl Iterator<Item = &CatalogItem> + Clone + '_ {
        self.cart.selected(&self.catalog)
    }

    /// Units in the cart.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.cart.total()
    }

    /// Price of the cart at current catalog prices.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.cart.total_price(&self.catalog)
    }

    /// Returns `true` while a request for `action` is outstanding.
    #[must_use]
    pub const fn is_in_flight(&self, action: Action) -> bool {
        match action {
            Action::Checkout => self.in_flight.checkout,
            Action::Mutation => self.in_flight.mutation,
            Action::Refresh => self.in_flight.refresh,
        }
    }

    /// Mark `action` as in flight.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Busy` if it already is.
    pub fn begin(&mut self, action: Action) -> Result<(), ClientError> {
        let flag = self.in_flight.flag(action);
        if *flag {
            return Err(ClientError::Busy(action));
        }
        *flag = true;
        Ok(())
    }

    /// Clear the in-flight mark for `action`.
    pub fn finish(&mut self, action: Action) {
        *self.in_flight.flag(action) = false;
    }

    /// Mark `action` as in flight until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Busy` if it already is.
    pub fn enter(&mut self, action: Action) -> Result<FlightGuard<'_>, ClientError> {
        self.begin(action)?;
        Ok(FlightGuard {
            session: self,
            action,
        })
    }

    /// Guard an action already marked by [`Session::begin`].
    pub(crate) fn hold(&mut self, action: Action) -> FlightGuard<'_> {
        FlightGuard {
            session: self,
            action,
        }
    }

    /// Replace the catalog wholesale and drop cart entries for items that
    /// no longer exist.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        let pruned = self.cart.retain_known(&self.catalog);
        if pruned > 0 {
            debug!(pruned, "Dropped cart entries for removed menu items");
        }
    }

    /// Drop one item from the local catalog (and the cart).
    pub fn forget_item(&mut self, id: MenuId) -> Option<CatalogItem> {
        let removed = self.catalog.remove(id);
        self.cart.retain_known(&self.catalog);
        removed
    }

    /// Empty the cart and the form after a successful checkout.
    pub(crate) fn reset_after_checkout(&mut self) {
        self.cart.clear();
        self.form.clear();
    }
}
