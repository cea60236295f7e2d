//! Subcommand implementations.
//!
//! Each command builds a fresh [`Session`](beanstall_storefront::Session),
//! drives one storefront orchestrator, and prints the result to stdout.
//! Diagnostics go to the log on stderr.

pub mod history;
pub mod menu;
pub mod order;

use std::path::PathBuf;

use beanstall_core::MenuId;
use beanstall_storefront::ClientError;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The storefront client failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// An image file could not be read.
    #[error("Could not read {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An ordered item is not on the menu.
    #[error("Menu item {0} is not on sale")]
    UnknownItem(MenuId),
}
