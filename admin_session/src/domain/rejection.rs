use serde::Serialize;

// Replica error code reported when the target canister is stopped.
pub const STOPPED_ERROR_CODE: &str = "IC0508";
// Reject code class for "stopped / unavailable" rejections.
pub const STOPPED_REJECT_CODE: u32 = 5;

/// Failure reported by the backend collaborator, normalised once at the
/// adapter boundary so classification never has to guess at its shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawError {
    /// The request never produced a backend answer (transport, timeout).
    Network { message: String },
    /// A replica rejection carrying some of the structured reject fields.
    Rejection(StructuredRejection),
    /// Anything that only carries a human readable message.
    PlainMessage(String),
    /// A value with no usable fields at all.
    Unknown,
}

impl RawError {
    pub fn network(message: impl Into<String>) -> Self {
        RawError::Network {
            message: message.into(),
        }
    }

    pub fn plain(message: impl Into<String>) -> Self {
        RawError::PlainMessage(message.into())
    }

    // Free-text message attached to the error, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            RawError::Network { message } | RawError::PlainMessage(message) => Some(message),
            RawError::Rejection(rejection) => rejection.message.as_deref(),
            RawError::Unknown => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuredRejection {
    pub error_code: Option<String>,
    pub reject_code: Option<u32>,
    pub reject_message: Option<String>,
    pub message: Option<String>,
    pub cause: Option<Box<RawError>>,
}

/// Structured view of a rejection, recomputed for every error.
///
/// `is_canister_stopped` always implies `is_connectivity_failure`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RejectionDetails {
    pub error_code: Option<String>,
    pub reject_code: Option<u32>,
    pub reject_message: Option<String>,
    pub is_canister_stopped: bool,
    pub is_connectivity_failure: bool,
    pub is_unauthorized: bool,
}
