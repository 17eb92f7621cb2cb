use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{AuthError, SessionSnapshot, SessionStorage};

pub const ADMIN_TOKEN_KEY: &str = "admin_token";
pub const SESSION_ERROR_KEY: &str = "admin_session_error";

/// Admin token and one-shot session error for a single scope.
///
/// The in-memory snapshot is authoritative; storage mirrors it so a reopened
/// scope sees the same token. Storage failures are logged and swallowed.
pub struct AdminSession<S> {
    storage: S,
    state: Mutex<SessionSnapshot>,
}

impl<S> AdminSession<S>
where
    S: SessionStorage,
{
    pub fn open(storage: S) -> Self {
        let token = match storage.get_item(ADMIN_TOKEN_KEY) {
            Ok(stored) => stored.as_deref().and_then(normalize_token),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored admin token");
                None
            }
        };

        // The session error is shown once: read it, then purge it.
        let session_error = match storage.get_item(SESSION_ERROR_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored session error");
                None
            }
        };
        if session_error.is_some() {
            remove_logged(&storage, SESSION_ERROR_KEY);
        }

        Self {
            storage,
            state: Mutex::new(SessionSnapshot {
                token,
                session_error,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn session_error(&self) -> Option<String> {
        self.state().session_error.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().clone()
    }

    /// Stores a freshly issued token and drops any stale session error.
    pub fn set_token(&self, value: &str) -> Result<(), AuthError> {
        let Some(token) = normalize_token(value) else {
            tracing::warn!(length = value.len(), "rejected empty admin token");
            return Err(AuthError::MalformedToken);
        };

        let mut state = self.state();
        if let Err(err) = self.storage.set_item(ADMIN_TOKEN_KEY, &token) {
            tracing::warn!(error = %err, "failed to persist admin token");
        }
        remove_logged(&self.storage, SESSION_ERROR_KEY);
        state.token = Some(token);
        state.session_error = None;
        Ok(())
    }

    pub fn clear_token(&self) {
        let mut state = self.state();
        remove_logged(&self.storage, ADMIN_TOKEN_KEY);
        state.token = None;
    }

    pub fn set_session_error(&self, message: &str) {
        let mut state = self.state();
        if let Err(err) = self.storage.set_item(SESSION_ERROR_KEY, message) {
            tracing::warn!(error = %err, "failed to persist session error");
        }
        state.session_error = Some(message.to_string());
    }

    pub fn clear_session_error(&self) {
        let mut state = self.state();
        remove_logged(&self.storage, SESSION_ERROR_KEY);
        state.session_error = None;
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn state(&self) -> MutexGuard<'_, SessionSnapshot> {
        // The snapshot stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Trimmed, non-empty token or nothing.
pub(crate) fn normalize_token(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn remove_logged<S: SessionStorage>(storage: &S, key: &str) {
    if let Err(err) = storage.remove_item(key) {
        tracing::warn!(error = %err, key, "failed to remove session entry");
    }
}
