//! Catalog accessor.

use beanstall_core::Catalog;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::error::{Action, Result};
use crate::session::Session;

/// Fetch the menu and replace the session's catalog with it.
///
/// Cart entries for items that disappeared are dropped. On failure the
/// previous catalog is kept. Returns the number of items now on sale.
///
/// # Errors
///
/// Returns `Busy` if a refresh is already running, otherwise whatever
/// [`ApiClient::fetch_menu`] returns.
#[instrument(skip_all)]
pub async fn refresh(client: &ApiClient, session: &mut Session) -> Result<usize> {
    let flight = session.enter(Action::Refresh)?;
    let fetched = client.fetch_menu().await;
    drop(flight);

    let items = fetched?;
    let count = items.len();
    session.replace_catalog(Catalog::new(items));
    info!(count, "Catalog refreshed");
    Ok(count)
}
