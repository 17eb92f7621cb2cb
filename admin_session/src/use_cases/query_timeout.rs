use std::future::Future;
use std::time::Duration;

use crate::domain::RawError;

// Default ceiling for admin queries other than the session probe.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

pub const QUERY_TIMED_OUT: &str = "Request timed out. The backend may be unavailable.";
pub const UNABLE_TO_CONNECT: &str =
    "Unable to connect to the server. Please check your connection and try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

// Phrases that turn a query failure into the generic "unable to connect"
// sentence. Matched verbatim, so casing matters.
const UNREACHABLE_PHRASES: &[&str] = &[
    "timed out",
    "Actor not available",
    "Actor initialization timed out",
    "Failed to fetch",
    "fetch failed",
    "NetworkError",
    "network",
    "canister",
    "IC0508",
    "is stopped",
    "unreachable",
    "unavailable",
];

// Lowercased phrases that mark a failure as "backend unreachable".
const CONNECTIVITY_PHRASES: &[&str] = &[
    "timed out",
    "actor not available",
    "actor initialization timed out",
    "failed to fetch",
    "fetch failed",
    "networkerror",
    "network",
    "canister",
    "ic0508",
    "is stopped",
    "unreachable",
    "unavailable",
];

/// Races a backend call against a timer so a dead backend cannot hang a caller.
pub async fn with_query_timeout<T, F>(query: F, timeout: Duration) -> Result<T, RawError>
where
    F: Future<Output = Result<T, RawError>>,
{
    tokio::time::timeout(timeout, query)
        .await
        .unwrap_or_else(|_| Err(RawError::network(QUERY_TIMED_OUT)))
}

pub fn is_connectivity_error(error: &RawError) -> bool {
    if matches!(error, RawError::Network { .. }) {
        return true;
    }
    error.message().is_some_and(|message| {
        let message = message.to_lowercase();
        CONNECTIVITY_PHRASES
            .iter()
            .any(|phrase| message.contains(phrase))
    })
}

// User-facing text for a failed query; connectivity failures collapse into one sentence.
// Unlike `is_connectivity_error`, phrase matching here is case-sensitive.
pub fn normalize_query_error(error: &RawError) -> String {
    if matches!(error, RawError::Network { .. }) {
        return UNABLE_TO_CONNECT.to_string();
    }
    match error.message() {
        Some(message)
            if UNREACHABLE_PHRASES
                .iter()
                .any(|phrase| message.contains(phrase)) =>
        {
            UNABLE_TO_CONNECT.to_string()
        }
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => UNEXPECTED_ERROR.to_string(),
    }
}
