//! HTTP client for the menu/order service.
//!
//! One method per remote endpoint. Methods send exactly one request, never
//! retry, and leave timeouts to the underlying `reqwest` client. Bodies are
//! built and validated by `beanstall-core`; this module only moves them over
//! the wire and classifies what comes back.
//!
//! # Endpoints
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | GET | `/menu` | - |
//! | POST | `/menu` | [`CreateMenuBody`] |
//! | PUT | `/menu/{id}` | [`UpdateMenuBody`] |
//! | DELETE | `/menu/{id}` | [`DeleteMenuBody`] |
//! | POST | `/order` | [`OrderRequest`] |
//! | POST | `/order/history` | `{ "email": ... }` |
//! | POST | `/upload/image` | multipart `file` |

mod response;
mod wire;

pub use response::ParsedBody;

use beanstall_core::{
    CatalogItem, CreateMenuBody, DeleteMenuBody, Email, ImageUpload, MenuId, OrderAck,
    OrderHistory, OrderRequest, UpdateMenuBody, ValidationError,
};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use response::Reply;
use wire::{MenuListing, UploadReply};

/// Fallback messages when a response body carries none.
mod fallback {
    pub const MENU_LOAD_FAILED: &str = "failed to load the menu";
    pub const MENU_CREATED: &str = "menu item created";
    pub const MENU_CREATE_FAILED: &str = "failed to create the menu item";
    pub const MENU_UPDATED: &str = "menu item updated";
    pub const MENU_UPDATE_FAILED: &str = "failed to update the menu item";
    pub const MENU_DELETED: &str = "menu item deleted";
    pub const MENU_DELETE_FAILED: &str = "failed to delete the menu item";
    pub const OWNERSHIP: &str = "the email does not match the item's owner";
    pub const ORDER_FAILED: &str = "failed to place the order";
    pub const HISTORY_FAILED: &str = "failed to load order history";
    pub const UPLOAD_FAILED: &str = "failed to upload the image";
}

/// Client for the menu/order service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// Body of `POST /order/history`.
#[derive(Serialize)]
struct HistoryQuery<'a> {
    email: &'a Email,
}

impl ApiClient {
    /// Create a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("beanstall/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Fetch the menu and normalize it.
    ///
    /// Entries that cannot be normalized are skipped with a warning rather
    /// than failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns `Transport`, `Rejected`, or `Parse` if the body is not a
    /// listing at all.
    #[instrument(skip(self))]
    pub async fn fetch_menu(&self) -> Result<Vec<CatalogItem>> {
        let response = self.client.get(self.endpoint("menu")).send().await?;
        let reply = Reply::read(response)
            .await?
            .success_or_rejected(fallback::MENU_LOAD_FAILED)?;

        let listing: MenuListing = reply.json()?;
        let items: Vec<CatalogItem> = listing
            .into_entries()
            .into_iter()
            .filter_map(|entry| {
                wire::normalize_entry(entry)
                    .map_err(|reason| warn!(%reason, "Skipping malformed menu entry"))
                    .ok()
            })
            .collect();

        debug!(count = items.len(), "Menu fetched");
        Ok(items)
    }

    /// Create a menu item. Returns the service's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `Transport` or `Rejected`.
    #[instrument(skip(self, body), fields(name = %body.menu_name))]
    pub async fn create_menu(&self, body: &CreateMenuBody) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint("menu"))
            .json(body)
            .send()
            .await?;
        let reply = Reply::read(response)
            .await?
            .success_or_rejected(fallback::MENU_CREATE_FAILED)?;

        debug!("Menu item created");
        Ok(reply.message_or(fallback::MENU_CREATED))
    }

    /// Update a menu item. Returns the service's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `Ownership` on 401, otherwise `Transport` or `Rejected`.
    #[instrument(skip(self, body), fields(menu_id = %id))]
    pub async fn update_menu(&self, id: MenuId, body: &UpdateMenuBody) -> Result<String> {
        let response = self
            .client
            .put(self.endpoint(&format!("menu/{id}")))
            .json(body)
            .send()
            .await?;
        let reply = owned_or_rejected(
            Reply::read(response).await?,
            fallback::MENU_UPDATE_FAILED,
        )?;

        debug!("Menu item updated");
        Ok(reply.message_or(fallback::MENU_UPDATED))
    }

    /// Delete a menu item. Returns the service's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `Ownership` on 401, otherwise `Transport` or `Rejected`.
    #[instrument(skip(self, body), fields(menu_id = %id))]
    pub async fn delete_menu(&self, id: MenuId, body: &DeleteMenuBody) -> Result<String> {
        let response = self
            .client
            .delete(self.endpoint(&format!("menu/{id}")))
            .json(body)
            .send()
            .await?;
        let reply = owned_or_rejected(
            Reply::read(response).await?,
            fallback::MENU_DELETE_FAILED,
        )?;

        debug!("Menu item deleted");
        Ok(reply.message_or(fallback::MENU_DELETED))
    }

    /// Submit an order.
    ///
    /// An empty success body is a valid acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns `Transport` or `Rejected`.
    #[instrument(skip(self, order), fields(items = order.items.len(), count = order.total_count()))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        let response = self
            .client
            .post(self.endpoint("order"))
            .json(order)
            .send()
            .await?;
        let reply = Reply::read(response)
            .await?
            .success_or_rejected(fallback::ORDER_FAILED)?;

        debug!(status = reply.status.as_u16(), "Order accepted");
        Ok(OrderAck {
            message: ParsedBody::parse(&reply.body).message(),
        })
    }

    /// Look up every order placed with `email`.
    ///
    /// A 404 means the email has no orders and is returned as `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Transport`, `Rejected` for other failures, or `Parse` if the
    /// history cannot be decoded.
    #[instrument(skip(self, email))]
    pub async fn order_history(&self, email: &Email) -> Result<Option<OrderHistory>> {
        let response = self
            .client
            .post(self.endpoint("order/history"))
            .json(&HistoryQuery { email })
            .send()
            .await?;
        let reply = Reply::read(response).await?;

        if reply.status == StatusCode::NOT_FOUND {
            debug!("No order history");
            return Ok(None);
        }
        let reply = reply.success_or_rejected(fallback::HISTORY_FAILED)?;

        let history: OrderHistory = reply.json()?;
        debug!(orders = history.orders.len(), "Order history fetched");
        Ok(Some(history))
    }

    /// Upload an image and return the URL it is served from.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the content type is not a valid MIME type,
    /// otherwise `Transport`, `Rejected`, or `Parse`.
    #[instrument(skip(self, upload), fields(file = %upload.file_name, bytes = upload.bytes.len()))]
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<String> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|_| ValidationError::NotAnImage {
                content_type: upload.content_type.clone(),
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload/image"))
            .multipart(form)
            .send()
            .await?;
        let reply = Reply::read(response)
            .await?
            .success_or_rejected(fallback::UPLOAD_FAILED)?;

        let uploaded: UploadReply = reply.json()?;
        debug!(url = %uploaded.image_url, "Image uploaded");
        Ok(uploaded.image_url)
    }
}

/// Like `success_or_rejected`, but a 401 means the ownership check failed.
fn owned_or_rejected(reply: Reply, default_error: &str) -> Result<Reply> {
    if reply.status == StatusCode::UNAUTHORIZED {
        let message = reply.message_or(fallback::OWNERSHIP);
        warn!(%message, "Ownership check failed");
        return Err(ClientError::Ownership { message });
    }
    reply.success_or_rejected(default_error)
}
