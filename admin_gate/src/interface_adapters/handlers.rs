use crate::interface_adapters::protocol::{
    DiagnosticsResponse, ErrorResponse, LoginRequest, LoginResponse, LogoutResponse,
    SessionResponse,
};
use crate::interface_adapters::state::{AppState, ScopeContext};
use admin_session::use_cases::backend_health::BackendHealthUseCase;
use admin_session::{AdminBackend, AuthError, HealthStatus};
use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
};
use std::sync::Arc;

pub const SCOPE_HEADER: &str = "x-session-scope";

type ErrorReply = (StatusCode, Json<ErrorResponse>);

// Identifies the browser tab whose session a request acts on.
pub struct ScopeId(pub String);

impl<S> FromRequestParts<S> for ScopeId
where
    S: Send + Sync,
{
    type Rejection = ErrorReply;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(SCOPE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| ScopeId(value.to_string()))
            .ok_or_else(|| {
                error_response(StatusCode::BAD_REQUEST, "x-session-scope header is required")
            })
    }
}

// Handler for the unscoped backend health check.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    let status = check_backend(&state).await;
    (health_status_code(&status), Json(status))
}

// Unknown scopes get a live health check but nothing is remembered for them.
#[tracing::instrument(name = "diagnostics", skip_all, fields(scope = %scope.0))]
pub async fn diagnostics(
    State(state): State<Arc<AppState>>,
    scope: ScopeId,
) -> Json<DiagnosticsResponse> {
    let (backend, last_connectivity_error) = match state.get_scope(&scope.0).await {
        Some(context) => {
            let backend = context.check_backend().await;
            (backend, context.last_connectivity_error())
        }
        None => (check_backend(&state).await, None),
    };

    Json(DiagnosticsResponse {
        backend,
        backend_ready: state.backend.is_ready(),
        last_connectivity_error,
    })
}

pub async fn clear_diagnostics(State(state): State<Arc<AppState>>, scope: ScopeId) -> StatusCode {
    if let Some(context) = state.get_scope(&scope.0).await {
        context.clear_connectivity_error();
    }
    StatusCode::NO_CONTENT
}

// Handler for admin login; the token stays server-side in the scope. Only a
// successful login registers a new scope.
#[tracing::instrument(name = "login", skip_all, fields(scope = %scope.0))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    scope: ScopeId,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorReply> {
    let existing = state.get_scope(&scope.0).await;
    let context = existing.clone().unwrap_or_else(|| state.new_context());

    context
        .login(&body.username, &body.password)
        .await
        .map_err(map_login_error)?;

    if existing.is_none() {
        state.insert_scope(&scope.0, context).await;
    }

    Ok(Json(LoginResponse {
        authenticated: true,
    }))
}

pub async fn logout(State(state): State<Arc<AppState>>, scope: ScopeId) -> Json<LogoutResponse> {
    let revoked = match state.get_scope(&scope.0).await {
        Some(context) => context.logout().revoked,
        None => false,
    };
    Json(LogoutResponse { revoked })
}

// Entry into the protected area: validates the stored token when needed.
#[tracing::instrument(name = "session", skip_all, fields(scope = %scope.0))]
pub async fn session(State(state): State<Arc<AppState>>, scope: ScopeId) -> Json<SessionResponse> {
    let Some(context) = state.get_scope(&scope.0).await else {
        return Json(SessionResponse::signed_out());
    };
    let outcome = context.enter().await;
    tracing::debug!(?outcome, "session entry");
    Json(session_response(&context))
}

#[tracing::instrument(name = "retry_session", skip_all, fields(scope = %scope.0))]
pub async fn retry_session(
    State(state): State<Arc<AppState>>,
    scope: ScopeId,
) -> Json<SessionResponse> {
    let Some(context) = state.get_scope(&scope.0).await else {
        return Json(SessionResponse::signed_out());
    };
    let outcome = context.retry().await;
    tracing::debug!(?outcome, "session retry");
    Json(session_response(&context))
}

pub async fn dismiss_session_error(
    State(state): State<Arc<AppState>>,
    scope: ScopeId,
) -> StatusCode {
    if let Some(context) = state.get_scope(&scope.0).await {
        context.dismiss_error();
    }
    StatusCode::NO_CONTENT
}

// Tab closed: drops the scope's token, messages and diagnostics.
pub async fn close_scope(State(state): State<Arc<AppState>>, scope: ScopeId) -> StatusCode {
    if state.close_scope(&scope.0).await {
        tracing::info!(scope = %scope.0, "session scope closed");
    }
    StatusCode::NO_CONTENT
}

async fn check_backend(state: &AppState) -> HealthStatus {
    BackendHealthUseCase {
        backend: state.backend.clone(),
        timeout: state.health_timeout,
    }
    .execute()
    .await
}

fn session_response(context: &ScopeContext) -> SessionResponse {
    let snapshot = context.snapshot();
    SessionResponse {
        state: context.state(),
        authenticated: snapshot.token.is_some(),
        session_error: snapshot.session_error,
    }
}

fn health_status_code(status: &HealthStatus) -> StatusCode {
    if status.is_reachable() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

// Maps login errors to HTTP responses; the body is always the fixed sentence.
fn map_login_error(err: AuthError) -> ErrorReply {
    let message = err.to_string();
    match err {
        AuthError::InvalidCredentials | AuthError::TokenInvalid => {
            error_response(StatusCode::UNAUTHORIZED, &message)
        }
        AuthError::ServiceUnavailable { .. } => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, &message)
        }
        AuthError::MalformedToken => error_response(StatusCode::BAD_GATEWAY, &message),
    }
}
