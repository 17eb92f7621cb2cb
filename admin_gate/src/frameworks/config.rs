use std::{env, time::Duration};
use url::Url;

// Runtime/server settings, read from the environment (and `.env` if present).

pub fn http_port() -> u16 {
    env::var("ADMIN_GATE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

// Falls back to the local replica when unset or not a valid URL.
pub fn backend_url() -> String {
    const DEFAULT: &str = "http://127.0.0.1:4943";
    match env::var("BACKEND_URL") {
        Ok(value) if Url::parse(&value).is_ok() => value,
        Ok(value) => {
            tracing::warn!(backend_url = %value, "BACKEND_URL is not a valid url, using default");
            DEFAULT.to_string()
        }
        Err(_) => DEFAULT.to_string(),
    }
}

pub fn health_check_timeout() -> Duration {
    duration_from_env("HEALTH_CHECK_TIMEOUT_MS", 8000)
}

pub fn startup_health_attempts() -> u32 {
    env::var("STARTUP_HEALTH_ATTEMPTS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3)
}

pub fn startup_health_retry_delay() -> Duration {
    duration_from_env("STARTUP_HEALTH_RETRY_MS", 2000)
}

// How often unavailable sessions are retried and idle scopes swept.
pub fn session_maintenance_interval() -> Duration {
    duration_from_env("SESSION_MAINTENANCE_INTERVAL_MS", 15_000)
}

pub fn scope_idle_timeout() -> Duration {
    duration_from_env("SCOPE_IDLE_TIMEOUT_MS", 30 * 60 * 1000)
}

fn duration_from_env(key: &str, default_millis: u64) -> Duration {
    let millis = env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default_millis);
    Duration::from_millis(millis)
}

// Everything the server needs to build its state.
#[derive(Clone, Debug)]
pub struct Settings {
    pub backend_url: String,
    pub health_check_timeout: Duration,
    pub startup_health_attempts: u32,
    pub startup_health_retry_delay: Duration,
    pub session_maintenance_interval: Duration,
    pub scope_idle_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            backend_url: backend_url(),
            health_check_timeout: health_check_timeout(),
            startup_health_attempts: startup_health_attempts(),
            startup_health_retry_delay: startup_health_retry_delay(),
            session_maintenance_interval: session_maintenance_interval(),
            scope_idle_timeout: scope_idle_timeout(),
        }
    }
}
