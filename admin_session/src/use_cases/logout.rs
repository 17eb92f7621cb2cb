use std::sync::Arc;

use crate::domain::SessionStorage;
use crate::use_cases::session_store::AdminSession;

// Response returned by the logout use case.
pub struct LogoutResponse {
    pub revoked: bool,
}

// Logout is local only: the token is dropped, the backend is not called.
pub struct AdminLogoutUseCase<S> {
    pub session: Arc<AdminSession<S>>,
}

impl<S> AdminLogoutUseCase<S>
where
    S: SessionStorage,
{
    pub fn execute(&self) -> LogoutResponse {
        let revoked = self.session.token().is_some();
        self.session.clear_token();
        tracing::info!(revoked, "admin logged out");
        LogoutResponse { revoked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::MemoryStorage;

    #[test]
    fn when_token_exists_then_logout_returns_revoked_true() {
        let session = Arc::new(AdminSession::open(MemoryStorage::new()));
        session.set_token("token-1").expect("expected token to be accepted");
        let use_case = AdminLogoutUseCase {
            session: session.clone(),
        };

        let result = use_case.execute();

        assert!(result.revoked);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn when_no_token_then_logout_returns_revoked_false() {
        let use_case = AdminLogoutUseCase {
            session: Arc::new(AdminSession::open(MemoryStorage::new())),
        };

        assert!(!use_case.execute().revoked);
        assert!(!use_case.execute().revoked);
    }

    #[test]
    fn when_logging_out_then_session_error_is_left_for_display() {
        let session = Arc::new(AdminSession::open(MemoryStorage::new()));
        session.set_token("token-1").expect("expected token to be accepted");
        session.set_session_error("shown once");
        let use_case = AdminLogoutUseCase {
            session: session.clone(),
        };

        use_case.execute();

        assert_eq!(session.session_error().as_deref(), Some("shown once"));
    }
}
