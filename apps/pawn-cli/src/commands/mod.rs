//! CLI command implementations.

mod auth;

pub use auth::{login, logout, register, status};

use anyhow::Result;
use pawn_auth::{ApiClient, AuthProvider, SessionStore};
use pawn_config_and_utils::{Config, Paths};
use pawn_storage::{DurableStorage, FileStorage, MemoryStorage};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

/// Build the provider from configuration and restore any saved session.
///
/// With `ephemeral` set, the session lives only for this process.
pub async fn start_provider(paths: &Paths, config: &Config, ephemeral: bool) -> Result<AuthProvider> {
    let storage: Arc<dyn DurableStorage> = if ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::new(paths.session_file()))
    };

    let api_url = config.api_url()?;
    debug!(api_url = %api_url, ephemeral, "Starting auth provider");

    let provider = AuthProvider::new(ApiClient::new(api_url.as_str()), SessionStore::new(storage));
    provider.initialize().await?;
    Ok(provider)
}

/// Read a line from stdin after printing `label`.
fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}
