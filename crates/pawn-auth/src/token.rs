//! Bearer token validation.
//!
//! Tokens are JSON Web Tokens. The client never verifies signatures (the
//! backend does that on every request); it only reads the payload to decide
//! whether a persisted token is worth presenting at all.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Why a token could not be decoded. Never leaves this module as an error;
/// callers only see `is_valid` return false.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("payload is not base64url: {0}")]
    Base64(String),

    #[error("payload is not a JSON object: {0}")]
    Json(String),

    #[error("payload has no numeric exp claim")]
    MissingExpiry,
}

/// Claims read from a token payload. Recomputed on every validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    /// `exp` claim, seconds since the Unix epoch, fractions kept
    pub expiry: f64,
    /// `sub` claim, if present
    pub subject: Option<String>,
    /// Every claim in the payload, uninterpreted
    pub claims: Map<String, Value>,
}

/// Decode a token's payload without verifying its signature.
pub fn decode(token: &str) -> Result<DecodedToken, TokenDecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::SegmentCount(segments.len()));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenDecodeError::Base64(e.to_string()))?;

    let claims: Map<String, Value> =
        serde_json::from_slice(&bytes).map_err(|e| TokenDecodeError::Json(e.to_string()))?;

    // exp may be serialized as an integer or a float
    let expiry = match claims.get("exp") {
        Some(Value::Number(n)) => n.as_f64().ok_or(TokenDecodeError::MissingExpiry)?,
        _ => return Err(TokenDecodeError::MissingExpiry),
    };

    let subject = claims
        .get("sub")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(DecodedToken {
        expiry,
        subject,
        claims,
    })
}

/// True if the token is present, decodes, and has not expired.
pub fn is_valid(token: Option<&str>) -> bool {
    is_valid_at(token, Utc::now().timestamp_millis() as f64 / 1000.0)
}

/// Like [`is_valid`], evaluated at `now` (fractional seconds since the
/// Unix epoch).
pub fn is_valid_at(token: Option<&str>, now: f64) -> bool {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return false;
    };

    match decode(token) {
        Ok(decoded) => now < decoded.expiry,
        Err(e) => {
            debug!(error = %e, "Treating undecodable token as invalid");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an unsigned token carrying the given payload.
    pub(crate) fn token_with_payload(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    pub(crate) fn token_expiring_at(exp: i64) -> String {
        token_with_payload(&serde_json::json!({ "sub": "user-1", "exp": exp }))
    }

    #[test]
    fn test_absent_and_empty_are_invalid() {
        assert!(!is_valid(None));
        assert!(!is_valid(Some("")));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(!is_valid(Some("garbage")));
        assert!(!is_valid(Some("a.b.c")));
        assert!(!is_valid(Some("...")));
        assert!(!is_valid(Some("header.%%%%.sig")));
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let now = Utc::now().timestamp();
        assert!(is_valid(Some(&token_expiring_at(now + 3600))));
    }

    #[test]
    fn test_past_expiry_is_invalid() {
        let now = Utc::now().timestamp();
        assert!(!is_valid(Some(&token_expiring_at(now - 1))));
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let token = token_expiring_at(1_000);
        assert!(is_valid_at(Some(&token), 999.0));
        assert!(is_valid_at(Some(&token), 999.999));
        assert!(!is_valid_at(Some(&token), 1_000.0));
        assert!(!is_valid_at(Some(&token), 1_001.0));
    }

    #[test]
    fn test_float_expiry_keeps_fraction() {
        let token = token_with_payload(&serde_json::json!({ "exp": 1000.9 }));
        assert_eq!(decode(&token).unwrap().expiry, 1000.9);
        assert!(is_valid_at(Some(&token), 1_000.0));
        assert!(is_valid_at(Some(&token), 1_000.5));
        assert!(!is_valid_at(Some(&token), 1_000.9));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let token = token_expiring_at(2_000);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push_str("==");
        let padded = parts.join(".");

        assert_eq!(decode(&padded).unwrap().expiry, 2_000.0);
    }

    #[test]
    fn test_decode_reads_subject_and_claims() {
        let token = token_with_payload(&serde_json::json!({
            "sub": "5f1c",
            "exp": 1_700_000_000,
            "role": "clerk",
        }));

        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.expiry, 1_700_000_000.0);
        assert_eq!(decoded.subject.as_deref(), Some("5f1c"));
        assert_eq!(decoded.claims["role"], "clerk");
    }

    #[test]
    fn test_missing_expiry_is_a_decode_error() {
        let token = token_with_payload(&serde_json::json!({ "sub": "5f1c" }));
        assert_eq!(decode(&token), Err(TokenDecodeError::MissingExpiry));
        assert!(!is_valid_at(Some(&token), 0.0));
    }

    #[test]
    fn test_string_expiry_is_a_decode_error() {
        let token = token_with_payload(&serde_json::json!({ "exp": "tomorrow" }));
        assert_eq!(decode(&token), Err(TokenDecodeError::MissingExpiry));
    }

    #[test]
    fn test_wrong_segment_count() {
        assert_eq!(decode("only.two"), Err(TokenDecodeError::SegmentCount(2)));
    }

    #[test]
    fn test_non_object_payload() {
        let token = token_with_payload(&serde_json::json!([1, 2, 3]));
        assert!(matches!(decode(&token), Err(TokenDecodeError::Json(_))));
    }
}
