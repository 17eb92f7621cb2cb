use crate::domain::messages::AuthMessage;
use thiserror::Error;

// Domain-level errors for admin auth workflows.
// Display is always the fixed user-facing sentence, never the raw rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{}", AuthMessage::InvalidCredentials)]
    InvalidCredentials,
    #[error("{}", AuthMessage::SessionExpired)]
    TokenInvalid,
    // Covers both the stopped and the unreachable backend cases.
    #[error("{message}")]
    ServiceUnavailable { message: AuthMessage },
    #[error("admin token must be a non-empty string")]
    MalformedToken,
}

impl AuthError {
    pub fn from_message(message: AuthMessage) -> Self {
        match message {
            AuthMessage::CanisterStopped | AuthMessage::BackendUnavailable => {
                AuthError::ServiceUnavailable { message }
            }
            AuthMessage::SessionExpired => AuthError::TokenInvalid,
            AuthMessage::InvalidCredentials => AuthError::InvalidCredentials,
        }
    }
}
