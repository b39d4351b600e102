//! CLI subcommand implementations.

pub mod catalog;
pub mod registration;

use emporium_storefront::api::ApiError;
use emporium_storefront::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Product {id} not found: {message}")]
    ProductNotFound { id: String, message: String },

    #[error("Registration form is invalid ({0} errors)")]
    InvalidForm(usize),

    #[error("Could not encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
