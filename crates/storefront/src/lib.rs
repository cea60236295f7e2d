//! Beanstall storefront client.
//!
//! Holds one shopper's [`Session`] (catalog, cart, checkout form) and the
//! orchestrators that move it through the menu/order service via
//! [`ApiClient`].
//!
//! ```no_run
//! use beanstall_storefront::{ApiClient, ClientConfig, Session, services};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(&ClientConfig::from_env()?)?;
//! let mut session = Session::new();
//! services::catalog::refresh(&client, &mut session).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{Action, ClientError};
pub use session::{FlightGuard, Session};
