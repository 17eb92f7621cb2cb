use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    AdminBackend, AuthError, HealthStatus, SessionSnapshot, SessionState, SessionStorage,
};
use crate::use_cases::admin_login::AdminLoginUseCase;
use crate::use_cases::backend_health::{BackendHealthUseCase, HEALTH_CHECK_TIMEOUT};
use crate::use_cases::diagnostics::ConnectivityDiagnostics;
use crate::use_cases::logout::{AdminLogoutUseCase, LogoutResponse};
use crate::use_cases::query_timeout::QUERY_TIMEOUT;
use crate::use_cases::session_store::AdminSession;
use crate::use_cases::validate_session::{SessionValidator, ValidationOutcome};

/// Everything one scope (browser tab) needs for admin auth, built when the
/// scope opens and dropped when it closes.
pub struct AdminSessionContext<B, S> {
    backend: B,
    session: Arc<AdminSession<S>>,
    validator: SessionValidator<B, S>,
    health_timeout: Duration,
}

impl<B, S> AdminSessionContext<B, S>
where
    B: AdminBackend + Clone,
    S: SessionStorage,
{
    pub fn open(backend: B, storage: S) -> Self {
        let session = Arc::new(AdminSession::open(storage));
        let validator = SessionValidator::new(backend.clone(), session.clone());
        Self {
            backend,
            session,
            validator,
            health_timeout: HEALTH_CHECK_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        AdminLoginUseCase {
            backend: self.backend.clone(),
            session: self.session.clone(),
            timeout: QUERY_TIMEOUT,
        }
        .execute(username, password)
        .await
    }

    pub fn logout(&self) -> LogoutResponse {
        AdminLogoutUseCase {
            session: self.session.clone(),
        }
        .execute()
    }

    pub async fn enter(&self) -> ValidationOutcome {
        self.validator.on_enter().await
    }

    pub async fn retry(&self) -> ValidationOutcome {
        self.validator.revalidate().await
    }

    /// Background retry: probes again only while the backend was deemed
    /// unavailable, so healthy and logged-out scopes cost nothing.
    pub async fn retry_if_unavailable(&self) -> Option<ValidationOutcome> {
        if self.validator.state() != SessionState::Unavailable {
            return None;
        }
        Some(self.validator.revalidate().await)
    }

    pub fn dismiss_error(&self) {
        self.session.clear_session_error();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn state(&self) -> SessionState {
        self.validator.state()
    }

    // Health check that also records the failure for the diagnostics view.
    pub async fn check_backend(&self) -> HealthStatus {
        let status = BackendHealthUseCase {
            backend: self.backend.clone(),
            timeout: self.health_timeout,
        }
        .execute()
        .await;
        if let HealthStatus::Unreachable(message) = &status {
            self.diagnostics().store(message);
        }
        status
    }

    pub fn last_connectivity_error(&self) -> Option<String> {
        self.diagnostics().last()
    }

    pub fn clear_connectivity_error(&self) {
        self.diagnostics().clear();
    }

    fn diagnostics(&self) -> ConnectivityDiagnostics<'_, S> {
        ConnectivityDiagnostics {
            storage: self.session.storage(),
        }
    }
}
