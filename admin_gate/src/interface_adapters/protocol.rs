use admin_session::{HealthStatus, SessionState};
use serde::{Deserialize, Serialize};

// Request payload for admin login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Response payload for admin login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
}

// Response payload for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

// What a protected page needs to decide between login form and admin layout.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub state: SessionState,
    pub authenticated: bool,
    pub session_error: Option<String>,
}

impl SessionResponse {
    // What a scope the gate has never seen (or already dropped) looks like.
    pub fn signed_out() -> Self {
        Self {
            state: SessionState::NoToken,
            authenticated: false,
            session_error: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: HealthStatus,
    pub backend_ready: bool,
    pub last_connectivity_error: Option<String>,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
