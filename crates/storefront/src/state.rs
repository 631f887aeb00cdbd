//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use herbal_glow_core::{RecommendationError, RecommendationTable};

use crate::config::StorefrontConfig;
use crate::db::UserBackend;

/// Error loading the recommendation table.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationsLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] RecommendationError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// credential store, the recommendation table and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    users: UserBackend,
    recommendations: RecommendationTable,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        users: UserBackend,
        recommendations: RecommendationTable,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                recommendations,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn users(&self) -> &UserBackend {
        &self.inner.users
    }

    /// Get a reference to the recommendation table.
    #[must_use]
    pub fn recommendations(&self) -> &RecommendationTable {
        &self.inner.recommendations
    }
}

/// Load the recommendation table from `path`, or the built-in one.
///
/// # Errors
///
/// Returns `RecommendationsLoadError` if the file cannot be read or is not a
/// valid rule table.
pub async fn load_recommendations(
    path: Option<&Path>,
) -> Result<RecommendationTable, RecommendationsLoadError> {
    let Some(path) = path else {
        return Ok(RecommendationTable::builtin()?);
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RecommendationsLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let table = RecommendationTable::from_json(&json)?;
    tracing::info!(path = %path.display(), rules = table.len(), "Loaded recommendation table");
    Ok(table)
}
