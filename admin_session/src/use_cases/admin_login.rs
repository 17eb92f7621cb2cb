use std::sync::Arc;
use std::time::Duration;

use crate::domain::{AdminBackend, AuthContext, AuthError, RawError, SessionStorage};
use crate::use_cases::auth_messages::translate;
use crate::use_cases::classify_rejection::classify;
use crate::use_cases::query_timeout::with_query_timeout;
use crate::use_cases::session_store::{AdminSession, normalize_token};

// Admin login use case with injected dependencies.
pub struct AdminLoginUseCase<B, S> {
    pub backend: B,
    pub session: Arc<AdminSession<S>>,
    // Upper bound for the login call; a hung backend reads as unavailable.
    pub timeout: Duration,
}

impl<B, S> AdminLoginUseCase<B, S>
where
    B: AdminBackend,
    S: SessionStorage,
{
    #[tracing::instrument(name = "admin_login", skip_all, fields(username = %username))]
    pub async fn execute(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let token = match self.request_token(username, password).await {
            Ok(token) => token,
            Err(error) => {
                let details = classify(Some(&error));
                let message = translate(&details, AuthContext::Login);
                tracing::warn!(?error, reason = %message, "admin login failed");
                return Err(AuthError::from_message(message));
            }
        };

        self.session.set_token(&token)?;
        tracing::info!("admin login succeeded");
        Ok(())
    }

    async fn request_token(&self, username: &str, password: &str) -> Result<String, RawError> {
        if !self.backend.is_ready() {
            return Err(RawError::plain("Actor not available"));
        }

        with_query_timeout(self.backend.admin_login(username, password), self.timeout)
            .await?
            .as_deref()
            .and_then(normalize_token)
            .ok_or_else(|| RawError::plain("Invalid username or password"))
    }
}
