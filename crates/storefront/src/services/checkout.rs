//! Checkout orchestrator.
//!
//! Checkout runs in three steps so the session is never borrowed across the
//! network call:
//!
//! 1. [`begin`] validates the cart and form, builds the [`OrderRequest`],
//!    and marks checkout as in flight;
//! 2. [`PendingCheckout::submit`] sends the request;
//! 3. [`finish`] clears the in-flight mark and, on success, empties the cart
//!    and the form.
//!
//! [`checkout`] chains the three for callers that hold the session for the
//! whole exchange, and releases the in-flight mark if it is cancelled.

use beanstall_core::{OrderAck, OrderRequest};
use tracing::{debug, info, instrument};

use crate::api::ApiClient;
use crate::error::{Action, Result};
use crate::session::Session;

/// What a checkout attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was empty; nothing was sent.
    NothingToOrder,
    /// The service accepted the order.
    Placed(Receipt),
}

/// Summary of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// The service's acknowledgment.
    pub ack: OrderAck,
    /// Units ordered.
    pub total_count: u32,
    /// Amount at the catalog prices the order was built from.
    pub total_price: u64,
}

/// A validated order waiting to be sent.
///
/// Checkout stays marked as in flight until [`finish`] runs. A caller that
/// drops a pending checkout without finishing it must call
/// `Session::finish(Action::Checkout)` itself; [`checkout`] does this
/// automatically, even when its future is cancelled.
#[derive(Debug, Clone)]
pub struct PendingCheckout {
    request: OrderRequest,
    total_price: u64,
}

impl PendingCheckout {
    /// The request that will be sent.
    #[must_use]
    pub const fn request(&self) -> &OrderRequest {
        &self.request
    }

    /// Send the order.
    ///
    /// # Errors
    ///
    /// Returns `Transport` or `Rejected`.
    pub async fn submit(&self, client: &ApiClient) -> Result<OrderAck> {
        client.place_order(&self.request).await
    }
}

/// Validate the session and mark checkout as in flight.
///
/// Returns `Ok(None)` when the cart has nothing on the current catalog; in
/// that case nothing is marked and nothing should be sent.
///
/// # Errors
///
/// Returns `Validation` for the first failed check (see
/// [`OrderRequest::build`]) or `Busy` if a checkout is already running.
pub fn begin(session: &mut Session) -> Result<Option<PendingCheckout>> {
    let Some(request) = OrderRequest::build(session.cart(), session.catalog(), session.form())?
    else {
        debug!("Checkout with empty cart ignored");
        return Ok(None);
    };

    session.begin(Action::Checkout)?;
    let total_price = request.total_price(session.catalog());
    Ok(Some(PendingCheckout {
        request,
        total_price,
    }))
}

/// Apply the result of a submitted checkout to the session.
///
/// # Errors
///
/// Passes through the submission error. The cart and form are kept so the
/// user can try again.
pub fn finish(
    session: &mut Session,
    pending: PendingCheckout,
    result: Result<OrderAck>,
) -> Result<CheckoutOutcome> {
    session.finish(Action::Checkout);
    let ack = result?;

    session.reset_after_checkout();
    let receipt = Receipt {
        ack,
        total_count: pending.request.total_count(),
        total_price: pending.total_price,
    };
    info!(
        count = receipt.total_count,
        price = receipt.total_price,
        "Order placed"
    );
    Ok(CheckoutOutcome::Placed(receipt))
}

/// Validate, submit and apply a checkout in one call.
///
/// # Errors
///
/// See [`begin`] and [`finish`]. No request is sent when validation fails.
#[instrument(skip_all, fields(count = session.total_count()))]
pub async fn checkout(client: &ApiClient, session: &mut Session) -> Result<CheckoutOutcome> {
    let Some(pending) = begin(session)? else {
        return Ok(CheckoutOutcome::NothingToOrder);
    };
    let flight = session.hold(Action::Checkout);
    let result = pending.submit(client).await;
    drop(flight);
    finish(session, pending, result)
}
