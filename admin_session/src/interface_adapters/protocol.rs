use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{RawError, StructuredRejection};
use crate::use_cases::session_store::normalize_token;

// Arguments for the backend login call.
#[derive(Debug, Serialize)]
pub struct AdminLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// Arguments for admin-gated backend calls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTokenRequest<'a> {
    pub admin_token: &'a str,
}

/// Turns a loosely typed error payload into a [`RawError`].
///
/// `null` means there was no error at all.
pub fn normalize_error(value: &Value) -> Option<RawError> {
    match value {
        Value::Null => None,
        Value::String(message) => Some(RawError::PlainMessage(message.clone())),
        Value::Object(fields) => Some(normalize_object(fields)),
        _ => Some(RawError::Unknown),
    }
}

fn normalize_object(fields: &Map<String, Value>) -> RawError {
    let rejection = StructuredRejection {
        error_code: fields.get("error_code").and_then(coerce_string),
        reject_code: fields.get("reject_code").and_then(coerce_code),
        reject_message: fields.get("reject_message").and_then(coerce_string),
        message: fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        cause: fields.get("cause").and_then(normalize_error).map(Box::new),
    };

    let structured = rejection.error_code.is_some()
        || rejection.reject_code.is_some()
        || rejection.reject_message.is_some()
        || rejection.cause.is_some();
    if structured {
        return RawError::Rejection(rejection);
    }
    match rejection.message {
        Some(message) => RawError::PlainMessage(message),
        None => RawError::Unknown,
    }
}

// Empty strings count as unset.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn coerce_code(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|code| u32::try_from(code).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Reads the token out of a login reply: a bare string or an optional
/// wrapper `{"__kind__": "Some", "value": ...}`. Blank tokens count as none.
pub fn extract_token(reply: &Value) -> Option<String> {
    match reply {
        Value::String(token) => normalize_token(token),
        Value::Object(fields) if fields.get("__kind__").and_then(Value::as_str) == Some("Some") => {
            fields
                .get("value")
                .and_then(Value::as_str)
                .and_then(normalize_token)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_payload_is_null_then_there_is_no_error() {
        assert_eq!(normalize_error(&Value::Null), None);
    }

    #[test]
    fn when_payload_has_reject_fields_then_normalizes_to_rejection_with_coercion() {
        let payload = json!({
            "error_code": "IC0508",
            "reject_code": "5",
            "reject_message": "Canister is stopped",
            "message": "Call was rejected"
        });

        let error = normalize_error(&payload);

        assert_eq!(
            error,
            Some(RawError::Rejection(StructuredRejection {
                error_code: Some("IC0508".to_string()),
                reject_code: Some(5),
                reject_message: Some("Canister is stopped".to_string()),
                message: Some("Call was rejected".to_string()),
                cause: None,
            }))
        );
    }

    #[test]
    fn when_payload_only_has_message_then_normalizes_to_plain_message() {
        let payload = json!({ "message": "Unauthorized: invalid token" });

        assert_eq!(
            normalize_error(&payload),
            Some(RawError::plain("Unauthorized: invalid token"))
        );
    }

    #[test]
    fn when_payload_has_cause_then_cause_is_normalized_too() {
        let payload = json!({
            "message": "Call failed",
            "cause": { "reject_code": 5 }
        });

        let Some(RawError::Rejection(rejection)) = normalize_error(&payload) else {
            panic!("expected structured rejection");
        };

        assert_eq!(
            rejection.cause.as_deref(),
            Some(&RawError::Rejection(StructuredRejection {
                reject_code: Some(5),
                ..Default::default()
            }))
        );
    }

    #[test]
    fn when_payload_has_no_usable_fields_then_normalizes_to_unknown() {
        assert_eq!(normalize_error(&json!({ "error_code": "" })), Some(RawError::Unknown));
        assert_eq!(normalize_error(&json!(42)), Some(RawError::Unknown));
        assert_eq!(normalize_error(&json!([1, 2])), Some(RawError::Unknown));
    }

    #[test]
    fn when_reject_code_is_out_of_range_then_it_is_dropped() {
        let payload = json!({ "reject_code": 1_u64 << 40, "message": "boom" });

        assert_eq!(normalize_error(&payload), Some(RawError::plain("boom")));
    }

    #[test]
    fn when_login_reply_is_a_string_then_token_is_trimmed() {
        assert_eq!(extract_token(&json!(" abc ")), Some("abc".to_string()));
        assert_eq!(extract_token(&json!("   ")), None);
    }

    #[test]
    fn when_login_reply_is_option_wrapper_then_some_value_is_used() {
        assert_eq!(
            extract_token(&json!({ "__kind__": "Some", "value": "abc" })),
            Some("abc".to_string())
        );
        assert_eq!(extract_token(&json!({ "__kind__": "None" })), None);
        assert_eq!(extract_token(&json!({ "__kind__": "Some", "value": 7 })), None);
        assert_eq!(extract_token(&Value::Null), None);
    }
}
