use crate::interface_adapters::handlers::{
    clear_diagnostics, close_scope, diagnostics, dismiss_session_error, health, login, logout,
    retry_session, session,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/health", get(health))
        .route("/diagnostics", get(diagnostics).delete(clear_diagnostics))
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/session", get(session))
        .route("/admin/session/retry", post(retry_session))
        .route("/admin/session/error", delete(dismiss_session_error))
        .route("/admin/scope", delete(close_scope))
        .with_state(state)
}
