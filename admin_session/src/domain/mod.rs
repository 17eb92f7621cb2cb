mod entities;
mod errors;
mod messages;
mod ports;
mod rejection;

// Re-export the domain boundary types and ports.
pub use entities::{ContactMessage, HealthStatus, SessionSnapshot, SessionState};
pub use errors::AuthError;
pub use messages::{AuthContext, AuthMessage};
pub use ports::{AdminBackend, SessionStorage};
pub use rejection::{
    RawError, RejectionDetails, STOPPED_ERROR_CODE, STOPPED_REJECT_CODE, StructuredRejection,
};
