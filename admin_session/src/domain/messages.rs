use std::fmt;

// Which admin flow produced the failure being translated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthContext {
    Login,
    Validation,
}

/// Fixed user-facing sentences for admin authentication states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMessage {
    CanisterStopped,
    BackendUnavailable,
    SessionExpired,
    InvalidCredentials,
}

impl AuthMessage {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthMessage::CanisterStopped => {
                "The admin backend is temporarily unavailable. The service may be stopped or under maintenance. Please try again later."
            }
            AuthMessage::BackendUnavailable => {
                "The admin backend is temporarily unavailable. Please try again later."
            }
            AuthMessage::SessionExpired => "Your session has expired. Please log in again.",
            AuthMessage::InvalidCredentials => {
                "Invalid username or password. Please check your credentials and try again."
            }
        }
    }
}

impl fmt::Display for AuthMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
