use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt::Display;
use std::str::FromStr;

// Admin session as seen by one scope (browser tab).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub session_error: Option<String>,
}

// Validation lifecycle of the stored admin token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NoToken,
    Validating,
    Valid,
    Invalid,
    Unavailable,
}

// Contact form message returned by the admin-gated probe call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(deserialize_with = "number_or_string")]
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    // Nanoseconds since the epoch.
    #[serde(deserialize_with = "number_or_string")]
    pub timestamp: i64,
}

// Bridges often encode 64-bit integers as JSON strings.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire<T> {
        Number(T),
        Text(String),
    }

    match Wire::<T>::deserialize(deserializer)? {
        Wire::Number(value) => Ok(value),
        Wire::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum HealthStatus {
    Reachable(String),
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, HealthStatus::Reachable(_))
    }

    pub fn message(&self) -> &str {
        match self {
            HealthStatus::Reachable(message) | HealthStatus::Unreachable(message) => message,
        }
    }
}
