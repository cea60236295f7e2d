//! Menu mutation orchestrator.
//!
//! Create, update and delete share one in-flight mark. Input is validated
//! before the mark is taken, so a rejected form never blocks the next one.
//! After a successful create or update the catalog is reloaded; a failed
//! reload is logged and reported as [`CatalogSync::Stale`] but does not turn
//! the mutation into an error. A delete patches the local catalog instead.

use beanstall_core::{ImageSource, MenuDraft, MenuEdit, MenuRemoval, NewMenu};
use tracing::{info, instrument, warn};

use super::catalog;
use crate::api::ApiClient;
use crate::error::{Action, Result};
use crate::session::Session;

/// How the local catalog caught up with a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSync {
    /// Fetched again from the service.
    Reloaded,
    /// Edited in place without a fetch.
    Patched,
    /// The reload failed; the catalog predates the mutation.
    Stale,
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Confirmation message from the service.
    pub message: String,
    /// State of the local catalog afterwards.
    pub catalog: CatalogSync,
}

/// Create a menu item, uploading its image first if one was attached.
///
/// # Errors
///
/// Returns `Validation` without sending anything if the draft is invalid,
/// `Busy` if another mutation is running, otherwise the upload or create
/// error. A failed upload aborts the create.
#[instrument(skip_all, fields(name = %draft.name.trim()))]
pub async fn create(
    client: &ApiClient,
    session: &mut Session,
    draft: &MenuDraft,
) -> Result<MutationOutcome> {
    let new_menu = draft.validate()?;

    let flight = session.enter(Action::Mutation)?;
    let result = submit_create(client, new_menu).await;
    drop(flight);

    let message = result?;
    info!(%message, "Menu item created");
    Ok(settle(client, session, message).await)
}

async fn submit_create(client: &ApiClient, new_menu: NewMenu) -> Result<String> {
    let image_url = match &new_menu.image {
        ImageSource::None => None,
        ImageSource::Url(url) => Some(url.clone()),
        ImageSource::Upload(upload) => Some(client.upload_image(upload).await?),
    };
    client.create_menu(&new_menu.into_body(image_url)).await
}

/// Update a menu item.
///
/// # Errors
///
/// Returns `Validation`, `Busy`, `Ownership` when the email is not the
/// creator's, otherwise `Transport` or `Rejected`.
#[instrument(skip_all, fields(menu_id = %edit.id))]
pub async fn update(
    client: &ApiClient,
    session: &mut Session,
    edit: &MenuEdit,
) -> Result<MutationOutcome> {
    let body = edit.validate()?;

    let flight = session.enter(Action::Mutation)?;
    let result = client.update_menu(edit.id, &body).await;
    drop(flight);

    let message = result?;
    info!(%message, "Menu item updated");
    Ok(settle(client, session, message).await)
}

/// Delete a menu item.
///
/// The item leaves the local catalog (and the cart) as soon as the service
/// confirms. The catalog is not fetched again.
///
/// # Errors
///
/// Returns `Validation`, `Busy`, `Ownership` when the email is not the
/// creator's, otherwise `Transport` or `Rejected`.
#[instrument(skip_all, fields(menu_id = %removal.id))]
pub async fn delete(
    client: &ApiClient,
    session: &mut Session,
    removal: &MenuRemoval,
) -> Result<MutationOutcome> {
    let body = removal.validate()?;

    let flight = session.enter(Action::Mutation)?;
    let result = client.delete_menu(removal.id, &body).await;
    drop(flight);

    let message = result?;
    session.forget_item(removal.id);
    info!(%message, "Menu item deleted");
    Ok(MutationOutcome {
        message,
        catalog: CatalogSync::Patched,
    })
}

/// Reload the catalog after a mutation went through.
async fn settle(client: &ApiClient, session: &mut Session, message: String) -> MutationOutcome {
    let catalog = match catalog::refresh(client, session).await {
        Ok(_) => CatalogSync::Reloaded,
        Err(e) => {
            warn!(error = %e, "Catalog reload after menu change failed");
            CatalogSync::Stale
        }
    };
    MutationOutcome { message, catalog }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use beanstall_core::{MenuId, ValidationError};

    use crate::config::ClientConfig;
    use crate::error::ClientError;

    // Nothing listens on port 9 locally; validation must fail before any
    // request would be attempted.
    fn unreachable_client() -> ApiClient {
        ApiClient::new(&ClientConfig::for_api_url("http://127.0.0.1:9/api").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_locally() {
        let mut session = Session::new();
        let draft = MenuDraft {
            email: "roaster@example.com".to_string(),
            category: "Beans".to_string(),
            name: "Sidamo".to_string(),
            price: "abc".to_string(),
            image: ImageSource::None,
        };

        let err = create(&unreachable_client(), &mut session, &draft)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::InvalidPrice(_))
        ));
        assert!(!session.is_in_flight(Action::Mutation));
    }

    #[tokio::test]
    async fn test_busy_when_mutation_in_flight() {
        let mut session = Session::new();
        session.begin(Action::Mutation).unwrap();
        let removal = MenuRemoval {
            id: MenuId::new(1),
            email: "roaster@example.com".to_string(),
        };

        let err = delete(&unreachable_client(), &mut session, &removal)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Busy(Action::Mutation)));
    }

    #[tokio::test]
    async fn test_transport_failure_clears_mark() {
        let mut session = Session::new();
        let removal = MenuRemoval {
            id: MenuId::new(1),
            email: "roaster@example.com".to_string(),
        };

        let err = delete(&unreachable_client(), &mut session, &removal)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(!session.is_in_flight(Action::Mutation));
    }
}
