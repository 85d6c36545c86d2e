//! Subcommand implementations.

pub mod catalog;
pub mod order;
pub mod session;

use std::path::Path;

use thiserror::Error;

use nextshop_storefront::models::Product;
use nextshop_storefront::services::auth::FileSessionStore;
use nextshop_storefront::{AppError, Catalog, Storefront, StorefrontConfig};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Failed to read catalog file: {0}")]
    CatalogIo(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    CatalogYaml(#[from] serde_yaml::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Log the error and return the text to show.
    pub fn report(&self) -> String {
        match self {
            Self::App(err) => err.report(),
            other => other.to_string(),
        }
    }
}

/// Build the storefront with the session record from `config.session_path`.
pub fn open_storefront(
    config: StorefrontConfig,
    catalog_path: Option<&Path>,
) -> Result<Storefront, CliError> {
    let store = Box::new(FileSessionStore::new(config.session_path.clone()));
    let catalog = match catalog_path {
        Some(path) => load_catalog(path)?,
        None => Catalog::seeded(),
    };
    Ok(Storefront::with_catalog(config, store, catalog))
}

/// Load a YAML list of products.
fn load_catalog(path: &Path) -> Result<Catalog, CliError> {
    let content = std::fs::read_to_string(path)?;
    let products: Vec<Product> = serde_yaml::from_str(&content)?;
    tracing::info!(
        path = %path.display(),
        products = products.len(),
        "Loaded catalog"
    );
    Ok(Catalog::new(products))
}
