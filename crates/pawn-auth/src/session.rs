//! The client's single active session.
//!
//! `SessionStore` owns the durable token storage and the bearer value the
//! request layer attaches to authenticated calls. Callers that issue
//! requests receive a reference to it instead of reading ambient globals.

use crate::AuthResult;
use parking_lot::RwLock;
use pawn_storage::{DurableStorage, StorageKeys};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
    bearer: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            storage,
            bearer: RwLock::new(None),
        }
    }

    /// Persist a session and start presenting its access token.
    ///
    /// A refresh token left over from an earlier session is removed when
    /// none is supplied, so the stored pair always belongs to one login.
    pub fn set_session(&self, access_token: &str, refresh_token: Option<&str>) -> AuthResult<()> {
        self.storage.set(StorageKeys::ACCESS_TOKEN, access_token)?;
        match refresh_token {
            Some(refresh) => self.storage.set(StorageKeys::REFRESH_TOKEN, refresh)?,
            None => {
                self.storage.delete(StorageKeys::REFRESH_TOKEN)?;
            }
        }

        *self.bearer.write() = Some(access_token.to_string());
        debug!(with_refresh = refresh_token.is_some(), "Session stored");
        Ok(())
    }

    /// Forget the session. Storage failures are logged and skipped; the
    /// bearer header is always cleared.
    pub fn reset_session(&self) {
        for key in [StorageKeys::ACCESS_TOKEN, StorageKeys::REFRESH_TOKEN] {
            if let Err(e) = self.storage.delete(key) {
                warn!(key, error = %e, "Failed to remove persisted token");
            }
        }

        if self.bearer.write().take().is_some() {
            debug!("Session cleared");
        }
    }

    /// Persisted access token, if any.
    pub fn access_token(&self) -> AuthResult<Option<String>> {
        Ok(self.storage.get(StorageKeys::ACCESS_TOKEN)?)
    }

    /// Persisted refresh token, if any.
    pub fn refresh_token(&self) -> AuthResult<Option<String>> {
        Ok(self.storage.get(StorageKeys::REFRESH_TOKEN)?)
    }

    /// `Authorization` header value for outgoing requests, when a session
    /// is active in this process.
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer
            .read()
            .as_deref()
            .map(|token| format!("Bearer {token}"))
    }

    pub fn is_active(&self) -> bool {
        self.bearer.read().is_some()
    }
}
