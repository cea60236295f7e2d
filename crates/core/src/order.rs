//! Order form, order request, and order history shapes.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::types::{Email, MenuId, Postcode};
use crate::validation::ValidationError;

/// Customer details typed at checkout.
///
/// Fields hold raw user input; nothing is validated until
/// [`OrderRequest::build`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    /// Contact email, also the key for order history.
    pub email: String,
    /// Delivery address.
    pub address: String,
    /// Five-digit postal code.
    pub postal_code: String,
}

impl OrderForm {
    /// Create a form from raw input.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            address: address.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One line of an order: which item and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Menu item being ordered.
    pub menu_id: MenuId,
    /// Units ordered, always at least 1.
    pub count: u32,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Validated contact email.
    pub email: Email,
    /// Trimmed delivery address.
    pub address: String,
    /// Postcode as an integer.
    pub postcode: u32,
    /// Lines in catalog order.
    pub items: Vec<OrderLine>,
}

impl OrderRequest {
    /// Derive an order request from the cart and the checkout form.
    ///
    /// Checks run in order and stop at the first failure:
    ///
    /// 1. nothing selected → `Ok(None)` (nothing to order, not an error);
    /// 2. total quantity above [`Cart::MAX_TOTAL`] → `TooManyItems`;
    /// 3. malformed email → `InvalidEmail`;
    /// 4. malformed postcode → `InvalidPostcode`;
    /// 5. blank address → `MissingAddress`.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first failed check.
    pub fn build(
        cart: &Cart,
        catalog: &Catalog,
        form: &OrderForm,
    ) -> Result<Option<Self>, ValidationError> {
        let items: Vec<OrderLine> = cart
            .entries(catalog)
            .map(|(item, count)| OrderLine {
                menu_id: item.id,
                count,
            })
            .collect();

        if items.is_empty() {
            return Ok(None);
        }

        if cart.total() > Cart::MAX_TOTAL {
            return Err(ValidationError::TooManyItems {
                max: Cart::MAX_TOTAL,
            });
        }

        let email = Email::parse(&form.email)?;
        let postcode = Postcode::parse(&form.postal_code)?;

        let address = form.address.trim();
        if address.is_empty() {
            return Err(ValidationError::MissingAddress);
        }

        Ok(Some(Self {
            email,
            address: address.to_owned(),
            postcode: postcode.as_u32(),
            items,
        }))
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items.iter().map(|line| line.count).sum()
    }

    /// Price of the request at the given catalog's prices.
    ///
    /// Lines whose item is missing from the catalog contribute nothing.
    #[must_use]
    pub fn total_price(&self, catalog: &Catalog) -> u64 {
        self.items
            .iter()
            .filter_map(|line| {
                catalog
                    .get(line.menu_id)
                    .map(|item| item.price.times(line.count))
            })
            .sum()
    }
}

/// Acknowledgment returned by `POST /order`.
///
/// The service may answer with `{}`, `{"message": ...}`, or an empty body;
/// all of them are a successful order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderAck {
    /// Optional confirmation text.
    #[serde(default)]
    pub message: Option<String>,
}

/// Every order placed with one email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderHistory {
    /// Email the orders were placed with.
    pub email: String,
    /// Orders, oldest first as returned by the service.
    #[serde(default)]
    pub orders: Vec<PastOrder>,
}

/// One past order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PastOrder {
    /// Delivery address.
    pub address: String,
    /// Postcode as stored by the service.
    pub postcode: u32,
    /// Ordered items with the price charged at the time.
    #[serde(default)]
    pub items: Vec<PastOrderItem>,
}

/// One line of a past order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PastOrderItem {
    /// Item name at order time.
    pub menu_name: String,
    /// Unit price at order time.
    pub menu_price: u32,
    /// Units ordered.
    pub count: u32,
}

impl PastOrder {
    /// Units in this order.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items.iter().map(|item| item.count).sum()
    }

    /// Amount charged for this order.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.menu_price) * u64::from(item.count))
            .sum()
    }
}

impl OrderHistory {
    /// Amount charged across all orders.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.orders.iter().map(PastOrder::total_price).sum()
    }
}
