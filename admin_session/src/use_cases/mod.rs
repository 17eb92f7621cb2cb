pub mod admin_login;
pub mod auth_messages;
pub mod backend_health;
pub mod classify_rejection;
pub mod diagnostics;
pub mod logout;
pub mod query_timeout;
pub mod session_context;
pub mod session_store;
pub mod validate_session;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_messages::{should_preserve_token, translate};
pub use classify_rejection::classify;
pub use session_context::AdminSessionContext;
pub use session_store::AdminSession;
pub use validate_session::{SessionValidator, SkipReason, ValidationOutcome};
