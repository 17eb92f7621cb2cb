use regex::Regex;
use std::sync::LazyLock;

use crate::domain::{
    RawError, RejectionDetails, STOPPED_ERROR_CODE, STOPPED_REJECT_CODE, StructuredRejection,
};

// Nested causes deeper than this are ignored.
const MAX_CAUSE_DEPTH: usize = 8;

static ERROR_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"IC\d{4}").expect("valid error code pattern"));
static REJECT_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Reject code:\s*(\d+)").expect("valid reject code pattern"));
static REJECT_TEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Reject text:\s*([^\n]+)").expect("valid reject text pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flag {
    Unauthorized,
    ConnectivityFailure,
}

// A single keyword check against the evidence gathered from an error.
#[derive(Clone, Copy, Debug)]
enum Pattern {
    // Lowercased message contains the phrase.
    Message(&'static str),
    // Lowercased message contains the phrase and at least one of the others.
    MessageWithAny(&'static str, &'static [&'static str]),
    // Lowercased reject text contains the phrase.
    RejectText(&'static str),
    // The failure never produced a backend answer.
    Transport,
}

// Evaluated in order; unauthorized checks run before connectivity checks and
// neither short-circuits the other.
const RULES: &[(Pattern, Flag)] = &[
    (Pattern::Message("unauthorized"), Flag::Unauthorized),
    (
        Pattern::MessageWithAny("invalid", &["token", "admin"]),
        Flag::Unauthorized,
    ),
    (Pattern::Message("expired"), Flag::Unauthorized),
    (Pattern::Message("only admins can"), Flag::Unauthorized),
    (Pattern::RejectText("unauthorized"), Flag::Unauthorized),
    (Pattern::RejectText("invalid"), Flag::Unauthorized),
    (Pattern::RejectText("expired"), Flag::Unauthorized),
    (Pattern::Message("timed out"), Flag::ConnectivityFailure),
    (Pattern::Message("actor not available"), Flag::ConnectivityFailure),
    (
        Pattern::Message("actor initialization timed out"),
        Flag::ConnectivityFailure,
    ),
    (Pattern::Message("failed to fetch"), Flag::ConnectivityFailure),
    (Pattern::Message("fetch failed"), Flag::ConnectivityFailure),
    (Pattern::Message("networkerror"), Flag::ConnectivityFailure),
    (Pattern::Message("network"), Flag::ConnectivityFailure),
    (Pattern::Message("unreachable"), Flag::ConnectivityFailure),
    (Pattern::Message("unavailable"), Flag::ConnectivityFailure),
    (Pattern::Transport, Flag::ConnectivityFailure),
];

struct Evidence {
    message: Option<String>,
    reject_text: Option<String>,
    transport: bool,
}

impl Pattern {
    fn matches(self, evidence: &Evidence) -> bool {
        let message = evidence.message.as_deref();
        match self {
            Pattern::Message(phrase) => message.is_some_and(|m| m.contains(phrase)),
            Pattern::MessageWithAny(phrase, others) => message
                .is_some_and(|m| m.contains(phrase) && others.iter().any(|o| m.contains(o))),
            Pattern::RejectText(phrase) => evidence
                .reject_text
                .as_deref()
                .is_some_and(|text| text.contains(phrase)),
            Pattern::Transport => evidence.transport,
        }
    }
}

/// Extracts rejection metadata from a backend failure.
///
/// Total and pure: an absent error yields the all-false default, and
/// classifying the same error twice yields identical details.
pub fn classify(error: Option<&RawError>) -> RejectionDetails {
    match error {
        Some(error) => classify_at_depth(error, 0),
        None => RejectionDetails::default(),
    }
}

fn classify_at_depth(error: &RawError, depth: usize) -> RejectionDetails {
    let mut details = RejectionDetails::default();

    if let RawError::Rejection(rejection) = error {
        copy_direct_fields(rejection, &mut details);

        // Cause fields only fill what the parent left unset.
        if let Some(cause) = rejection.cause.as_deref() {
            if depth < MAX_CAUSE_DEPTH {
                let from_cause = classify_at_depth(cause, depth + 1);
                details.error_code = details.error_code.or(from_cause.error_code);
                details.reject_code = details.reject_code.or(from_cause.reject_code);
                details.reject_message = details.reject_message.or(from_cause.reject_message);
                details.is_unauthorized |= from_cause.is_unauthorized;
            }
        }
    }

    let message = error.message();
    if let Some(message) = message {
        parse_message(message, &mut details);
    }

    let evidence = Evidence {
        message: message.map(str::to_lowercase),
        reject_text: details.reject_message.as_deref().map(str::to_lowercase),
        transport: matches!(error, RawError::Network { .. }),
    };
    for (pattern, flag) in RULES {
        if pattern.matches(&evidence) {
            match flag {
                Flag::Unauthorized => details.is_unauthorized = true,
                Flag::ConnectivityFailure => details.is_connectivity_failure = true,
            }
        }
    }

    details.is_canister_stopped = details.error_code.as_deref() == Some(STOPPED_ERROR_CODE)
        || details.reject_code == Some(STOPPED_REJECT_CODE)
        || evidence
            .reject_text
            .as_deref()
            .is_some_and(|text| text.contains("is stopped"));
    if details.is_canister_stopped {
        details.is_connectivity_failure = true;
    }

    details
}

fn copy_direct_fields(rejection: &StructuredRejection, details: &mut RejectionDetails) {
    details.error_code = rejection.error_code.clone().filter(|code| !code.is_empty());
    details.reject_code = rejection.reject_code;
    details.reject_message = rejection
        .reject_message
        .clone()
        .filter(|text| !text.is_empty());
}

// Fills still-unset fields from the replica's textual error format.
fn parse_message(message: &str, details: &mut RejectionDetails) {
    if details.error_code.is_none() {
        details.error_code = ERROR_CODE_PATTERN
            .find(message)
            .map(|code| code.as_str().to_string());
    }

    if details.reject_code.is_none() {
        details.reject_code = REJECT_CODE_PATTERN
            .captures(message)
            .and_then(|captures| captures[1].parse().ok());
    }

    if details.reject_message.is_none() {
        details.reject_message = REJECT_TEXT_PATTERN
            .captures(message)
            .map(|captures| captures[1].trim().to_string())
            .filter(|text| !text.is_empty());
    }

    if details.reject_message.is_none() && message.to_lowercase().contains("is stopped") {
        details.reject_message = Some(message.to_string());
    }
}
