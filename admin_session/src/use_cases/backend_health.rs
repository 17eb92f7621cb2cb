use std::time::Duration;

use crate::domain::{AdminBackend, HealthStatus, RawError};
use crate::use_cases::query_timeout::{normalize_query_error, with_query_timeout};

pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(8);

// Backend health check with injected dependencies.
pub struct BackendHealthUseCase<B> {
    pub backend: B,
    pub timeout: Duration,
}

impl<B> BackendHealthUseCase<B>
where
    B: AdminBackend,
{
    pub async fn execute(&self) -> HealthStatus {
        if !self.backend.is_ready() {
            return HealthStatus::Unreachable(normalize_query_error(&RawError::plain(
                "Actor not available",
            )));
        }
        self.check().await
    }

    /// Retries until the backend answers or the attempts run out. Ignores
    /// readiness, since this is what establishes it at startup.
    pub async fn wait_until_reachable(&self, attempts: u32, delay: Duration) -> HealthStatus {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            let status = self.check().await;
            if status.is_reachable() || attempt >= attempts {
                return status;
            }
            tracing::info!(
                attempt,
                attempts,
                detail = status.message(),
                "backend not reachable yet, retrying"
            );
            attempt += 1;
            tokio::time::sleep(delay).await;
        }
    }

    async fn check(&self) -> HealthStatus {
        match with_query_timeout(self.backend.health(), self.timeout).await {
            Ok(message) if !message.trim().is_empty() => HealthStatus::Reachable(message),
            Ok(_) => HealthStatus::Reachable("Backend is reachable".to_string()),
            Err(error) => {
                tracing::warn!(?error, "backend health check failed");
                HealthStatus::Unreachable(normalize_query_error(&error))
            }
        }
    }
}
