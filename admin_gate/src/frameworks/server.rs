// Framework bootstrap for the admin gate.

use crate::frameworks::config::{self, Settings};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use admin_session::{AdminBackend, HttpBackendClient};
use admin_session::use_cases::backend_health::BackendHealthUseCase;
use std::io::{Error, ErrorKind, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;

    let backend = HttpBackendClient::new(&settings.backend_url)
        .map(Arc::new)
        .map_err(|e| {
            tracing::error!(backend_url = %settings.backend_url, error = %e, "invalid backend url");
            Error::new(ErrorKind::InvalidInput, e)
        })?;
    tracing::debug!(backend_url = %backend.base_url(), "backend client configured.");

    spawn_startup_health_gate(backend.clone(), &settings);

    let state = Arc::new(AppState::new(backend, settings.health_check_timeout));
    spawn_session_maintenance(state.clone(), &settings);
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, Settings::from_env()).await
}

// Marks the backend ready once it answers a health check; keeps retrying in
// the background until it does.
fn spawn_startup_health_gate(backend: Arc<HttpBackendClient>, settings: &Settings) {
    let attempts = settings.startup_health_attempts;
    let delay = settings.startup_health_retry_delay;
    let use_case = BackendHealthUseCase {
        backend: backend.clone(),
        timeout: settings.health_check_timeout,
    };

    tokio::spawn(async move {
        loop {
            let status = use_case.wait_until_reachable(attempts, delay).await;
            if status.is_reachable() {
                backend.set_ready(true);
                tracing::info!(detail = status.message(), "backend reachable");
                return;
            }
            tracing::error!(
                attempts,
                detail = status.message(),
                "backend unreachable after startup attempts"
            );
            tokio::time::sleep(delay).await;
        }
    });
}

// Retries sessions left unavailable by a backend outage and drops scopes whose
// tab went away without closing them.
fn spawn_session_maintenance(state: Arc<AppState>, settings: &Settings) {
    // `interval` rejects a zero period.
    let period = settings.session_maintenance_interval.max(Duration::from_millis(1));
    let max_idle = settings.scope_idle_timeout;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = state.evict_idle(max_idle).await;
            if evicted > 0 {
                tracing::info!(evicted, "evicted idle session scopes");
            }
            if state.backend.is_ready() {
                let retried = state.retry_unavailable().await;
                if retried > 0 {
                    tracing::info!(retried, "retried unavailable sessions");
                }
            }
        }
    });
}
