pub mod domain;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{
    AdminBackend, AuthContext, AuthError, AuthMessage, ContactMessage, HealthStatus, RawError,
    RejectionDetails, SessionSnapshot, SessionState, SessionStorage, StructuredRejection,
};
pub use interface_adapters::{HttpBackendClient, MemoryStorage};
pub use use_cases::{
    AdminSession, AdminSessionContext, SessionValidator, SkipReason, ValidationOutcome, classify,
    should_preserve_token, translate,
};
