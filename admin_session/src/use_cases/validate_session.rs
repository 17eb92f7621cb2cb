use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{AdminBackend, AuthContext, AuthMessage, SessionState, SessionStorage};
use crate::use_cases::auth_messages::{should_preserve_token, translate};
use crate::use_cases::classify_rejection::classify;
use crate::use_cases::session_store::AdminSession;

// Why a validation attempt did not probe the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoToken,
    BackendNotReady,
    InFlight,
    AlreadyChecked,
    // The token changed while the probe was running.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Skipped(SkipReason),
    Valid,
    // Backend trouble: token kept, message stored.
    Unavailable(AuthMessage),
    // Credential trouble: token cleared, message stored.
    Invalid(AuthMessage),
}

#[derive(Default)]
struct Progress {
    state: SessionState,
    // Token the last completed probe ran against.
    checked_token: Option<String>,
    // Set when an entry found the backend not ready; cleared by the next probe.
    readiness_lost: bool,
}

/// Probes the backend with the stored token and decides whether to keep it.
pub struct SessionValidator<B, S> {
    backend: B,
    session: Arc<AdminSession<S>>,
    in_flight: AtomicBool,
    progress: Mutex<Progress>,
}

// Resets the in-flight flag even when the probe future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B, S> SessionValidator<B, S>
where
    B: AdminBackend,
    S: SessionStorage,
{
    pub fn new(backend: B, session: Arc<AdminSession<S>>) -> Self {
        Self {
            backend,
            session,
            in_flight: AtomicBool::new(false),
            progress: Mutex::new(Progress::default()),
        }
    }

    pub fn state(&self) -> SessionState {
        let mut progress = self.progress();
        if self.session.token().is_none() && !self.in_flight.load(Ordering::Acquire) {
            progress.state = SessionState::NoToken;
            progress.checked_token = None;
        }
        progress.state
    }

    /// Entry into a protected area: probes only when the token changed since
    /// the last completed probe, or when the backend went away and came back
    /// while the session was unavailable.
    pub async fn on_enter(&self) -> ValidationOutcome {
        let token = match self.preconditions() {
            Ok(token) => token,
            Err(reason) => return ValidationOutcome::Skipped(reason),
        };
        let already_checked = {
            let progress = self.progress();
            let recovered = progress.readiness_lost && progress.state == SessionState::Unavailable;
            !recovered && progress.checked_token.as_deref() == Some(token.as_str())
        };
        if already_checked {
            return ValidationOutcome::Skipped(SkipReason::AlreadyChecked);
        }
        self.probe(token).await
    }

    /// Forced probe, used to retry after the backend was unavailable.
    pub async fn revalidate(&self) -> ValidationOutcome {
        match self.preconditions() {
            Ok(token) => self.probe(token).await,
            Err(reason) => ValidationOutcome::Skipped(reason),
        }
    }

    fn preconditions(&self) -> Result<String, SkipReason> {
        let Some(token) = self.session.token() else {
            let mut progress = self.progress();
            progress.state = SessionState::NoToken;
            progress.checked_token = None;
            return Err(SkipReason::NoToken);
        };
        if !self.backend.is_ready() {
            self.progress().readiness_lost = true;
            return Err(SkipReason::BackendNotReady);
        }
        Ok(token)
    }

    #[tracing::instrument(name = "validate_session", skip_all)]
    async fn probe(&self, token: String) -> ValidationOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return ValidationOutcome::Skipped(SkipReason::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);
        {
            let mut progress = self.progress();
            progress.state = SessionState::Validating;
            progress.readiness_lost = false;
        }

        let result = self.backend.probe_session(&token).await;

        let mut progress = self.progress();
        if self.session.token().as_deref() != Some(token.as_str()) {
            // Logged out or re-authenticated meanwhile; this answer is stale.
            progress.state = if self.session.token().is_some() {
                SessionState::Validating
            } else {
                SessionState::NoToken
            };
            progress.checked_token = None;
            return ValidationOutcome::Skipped(SkipReason::Superseded);
        }

        let error = match result {
            Ok(_) => {
                self.session.clear_session_error();
                progress.state = SessionState::Valid;
                progress.checked_token = Some(token);
                tracing::debug!("admin token accepted");
                return ValidationOutcome::Valid;
            }
            Err(error) => error,
        };

        let details = classify(Some(&error));
        let message = translate(&details, AuthContext::Validation);
        self.session.set_session_error(message.as_str());

        if should_preserve_token(&details) {
            tracing::warn!(
                ?error,
                error_code = ?details.error_code,
                reject_code = ?details.reject_code,
                "token validation failed due to backend unavailability"
            );
            progress.state = SessionState::Unavailable;
            progress.checked_token = Some(token);
            ValidationOutcome::Unavailable(message)
        } else {
            tracing::error!(?error, unauthorized = details.is_unauthorized, "token validation failed");
            self.session.clear_token();
            // Invalid is transient: with the token gone the scope is back to NoToken.
            progress.state = SessionState::NoToken;
            progress.checked_token = None;
            ValidationOutcome::Invalid(message)
        }
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
