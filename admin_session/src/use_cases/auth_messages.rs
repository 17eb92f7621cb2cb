use crate::domain::{AuthContext, AuthMessage, RejectionDetails};

/// Picks the user-facing sentence for a classified failure.
///
/// Backend trouble wins over credential trouble, so a login attempt against
/// an unreachable backend never reports bad credentials.
pub fn translate(details: &RejectionDetails, context: AuthContext) -> AuthMessage {
    if details.is_canister_stopped {
        return AuthMessage::CanisterStopped;
    }
    if details.is_connectivity_failure {
        return AuthMessage::BackendUnavailable;
    }
    match context {
        AuthContext::Validation => AuthMessage::SessionExpired,
        AuthContext::Login => AuthMessage::InvalidCredentials,
    }
}

// Keep the stored token only when the backend, not the credential, is at fault.
pub fn should_preserve_token(details: &RejectionDetails) -> bool {
    details.is_canister_stopped || details.is_connectivity_failure
}
