//! User inspection commands.

use herbal_glow_storefront::config::{ConfigError, StorefrontConfig};
use herbal_glow_storefront::db::{RepositoryError, UserBackend, UserStore};

/// Errors from `hg-cli users`.
#[derive(Debug, thiserror::Error)]
pub enum UsersError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Print every user in the configured backend, oldest first.
///
/// # Errors
///
/// Returns `UsersError` if the configuration is invalid or the store cannot
/// be read.
pub async fn list() -> Result<(), UsersError> {
    let config = StorefrontConfig::from_env()?;
    let users = UserBackend::open(&config.store).await?.list().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{:<24} {:<40} CREATED", "USERNAME", "EMAIL");
        for user in &users {
            println!(
                "{:<24} {:<40} {}",
                user.username.as_str(),
                user.email.as_str(),
                user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        println!("{} user(s) in {} store", users.len(), config.store.name());
    }
    Ok(())
}
