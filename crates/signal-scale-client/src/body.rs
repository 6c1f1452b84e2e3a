//! Response body decoding.
//!
//! Bodies are always read as text first and only then parsed as JSON, so an
//! empty or non-JSON body never turns into a parse failure.

use serde_json::Value;

use crate::error::ErrorBody;

pub const EMPTY_BODY_NOTICE: &str = "Empty JSON body returned.";

/// Value returned for a successful call whose body held no JSON.
#[must_use]
pub fn empty_body_sentinel() -> Value {
    serde_json::json!({ "ok": true, "notice": EMPTY_BODY_NOTICE })
}

fn parse_json(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(|v| !v.is_null())
}

/// Decodes a 2xx body. Empty, `null` or non-JSON bodies become the sentinel.
pub(crate) fn decode_success(raw: &str) -> Value {
    parse_json(raw).unwrap_or_else(|| {
        if !raw.trim().is_empty() {
            tracing::warn!(bytes = raw.len(), "success response body is not JSON");
        }
        empty_body_sentinel()
    })
}

/// Decodes a non-2xx body. JSON is only attempted when `try_json` is set.
pub(crate) fn decode_error(raw: &str, try_json: bool) -> ErrorBody {
    if try_json {
        if let Some(value) = parse_json(raw) {
            return ErrorBody::Json(value);
        }
    }
    if raw.is_empty() {
        ErrorBody::Empty
    } else {
        ErrorBody::Text(raw.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_success_body_is_sentinel() {
        assert_eq!(decode_success(""), empty_body_sentinel());
        assert_eq!(decode_success("  \n"), empty_body_sentinel());
    }

    #[test]
    fn null_and_non_json_success_bodies_are_sentinel() {
        assert_eq!(decode_success("null"), empty_body_sentinel());
        assert_eq!(decode_success("<html>ok</html>"), empty_body_sentinel());
    }

    #[test]
    fn json_success_body_is_returned() {
        assert_eq!(
            decode_success(r#"{"success":true}"#),
            serde_json::json!({"success": true})
        );
    }

    #[test]
    fn error_body_prefers_json_when_allowed() {
        assert_eq!(
            decode_error(r#"{"detail":"x"}"#, true),
            ErrorBody::Json(serde_json::json!({"detail": "x"}))
        );
        assert_eq!(
            decode_error(r#"{"detail":"x"}"#, false),
            ErrorBody::Text(r#"{"detail":"x"}"#.to_string())
        );
    }

    #[test]
    fn error_body_falls_back_to_text_then_empty() {
        assert_eq!(
            decode_error("Internal Server Error", true),
            ErrorBody::Text("Internal Server Error".to_string())
        );
        assert_eq!(decode_error("", true), ErrorBody::Empty);
    }
}
