//! Caller identity resolution
//!
//! Verifies the HS256 access token presented in the `access_token` cookie
//! and resolves it to an explicit identity. Token issuance and refresh live
//! in a separate service; any unverifiable token simply means anonymous.

use actix_web::HttpRequest;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::model::Identity;

const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Resolve the caller's identity from the request
///
/// Anonymous callers are keyed by their peer network address for admission
/// control.
pub fn resolve_identity(req: &HttpRequest, secret: &str) -> Identity {
    let user_id = req
        .cookie(ACCESS_TOKEN_COOKIE)
        .and_then(|cookie| verify_access_token(cookie.value(), secret, Utc::now().timestamp()));

    match user_id {
        Some(user_id) => Identity::Authenticated { user_id },
        None => Identity::Anonymous {
            addr: req
                .peer_addr()
                .map(|a| a.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        },
    }
}

/// Verify an HS256 compact token and return its subject
///
/// Returns None for anything malformed, tampered, or expired.
fn verify_access_token(token: &str, secret: &str, now_unix: i64) -> Option<i64> {
    let mut parts = token.splitn(3, '.');
    let header_b64 = parts.next()?;
    let payload_b64 = parts.next()?;
    let signature_b64 = parts.next()?;

    let header: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_b64).ok()?).ok()?;
    if header.get("alg").and_then(Value::as_str) != Some("HS256") {
        return None;
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    mac.verify_slice(&URL_SAFE_NO_PAD.decode(signature_b64).ok()?)
        .ok()?;

    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload_b64).ok()?).ok()?;

    let exp = claims.get("exp").and_then(Value::as_i64)?;
    if exp <= now_unix {
        return None;
    }

    claims.get("sub").and_then(Value::as_str)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_token(header: &Value, claims: &Value, secret: &str) -> String {
        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{header_b64}.{payload_b64}").as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{header_b64}.{payload_b64}.{signature_b64}")
    }

    fn hs256_header() -> Value {
        serde_json::json!({ "alg": "HS256", "typ": "JWT" })
    }

    #[test]
    fn accepts_valid_token() {
        let token = sign_token(
            &hs256_header(),
            &serde_json::json!({ "sub": "42", "exp": 4_000_000_000i64 }),
            "secret",
        );

        assert_eq!(verify_access_token(&token, "secret", 1_000), Some(42));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = sign_token(
            &hs256_header(),
            &serde_json::json!({ "sub": "42", "exp": 4_000_000_000i64 }),
            "other-secret",
        );

        assert_eq!(verify_access_token(&token, "secret", 1_000), None);
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign_token(
            &hs256_header(),
            &serde_json::json!({ "sub": "42", "exp": 500 }),
            "secret",
        );

        assert_eq!(verify_access_token(&token, "secret", 1_000), None);
    }

    #[test]
    fn rejects_unexpected_algorithm() {
        let token = sign_token(
            &serde_json::json!({ "alg": "none" }),
            &serde_json::json!({ "sub": "42", "exp": 4_000_000_000i64 }),
            "secret",
        );

        assert_eq!(verify_access_token(&token, "secret", 1_000), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(verify_access_token("not-a-token", "secret", 1_000), None);
        assert_eq!(verify_access_token("a.b.c", "secret", 1_000), None);
        assert_eq!(verify_access_token("", "secret", 1_000), None);
    }

    #[test]
    fn rejects_non_numeric_subject() {
        let token = sign_token(
            &hs256_header(),
            &serde_json::json!({ "sub": "alice", "exp": 4_000_000_000i64 }),
            "secret",
        );

        assert_eq!(verify_access_token(&token, "secret", 1_000), None);
    }
}
