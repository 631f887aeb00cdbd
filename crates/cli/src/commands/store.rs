//! File store initialisation.

use std::path::PathBuf;

use herbal_glow_storefront::config::{ConfigError, StoreBackendConfig, StorefrontConfig};
use herbal_glow_storefront::db::{RepositoryError, kv::FileKeyValue};

/// Errors from `hg-cli init-store`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("STOREFRONT_STORE_BACKEND is {0}; pass --path to initialise a users file anyway")]
    NotFileBackend(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Create an empty users file at `path`, or at the configured location.
///
/// An existing file is left untouched.
///
/// # Errors
///
/// Returns `StoreError` if no path can be determined or the file cannot be
/// written.
pub async fn init(path: Option<PathBuf>) -> Result<(), StoreError> {
    let path = match path {
        Some(path) => path,
        None => match StorefrontConfig::from_env()?.store {
            StoreBackendConfig::File { path } => path,
            other => return Err(StoreError::NotFileBackend(other.name())),
        },
    };

    let kv = FileKeyValue::open(&path).await?;
    if kv.create_if_missing().await? {
        tracing::info!(path = %kv.path().display(), "Created empty users file");
    } else {
        tracing::info!(path = %kv.path().display(), "Users file already exists");
    }
    Ok(())
}
