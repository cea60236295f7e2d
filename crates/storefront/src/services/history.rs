//! Order history lookup.

use beanstall_core::{Email, OrderHistory, ValidationError};
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::Result;

/// Look up the orders placed with `email`.
///
/// Returns `Ok(None)` when the service has no orders for it.
///
/// # Errors
///
/// Returns `Validation` without sending anything if `email` is blank or
/// malformed, otherwise whatever [`ApiClient::order_history`] returns.
#[instrument(skip_all)]
pub async fn lookup(client: &ApiClient, email: &str) -> Result<Option<OrderHistory>> {
    let email = Email::parse(email).map_err(ValidationError::from)?;
    client.order_history(&email).await
}
