//! Bearer Token and its untrusted payload
//!
//! The client never verifies token signatures: it holds no key and the
//! API re-validates the token on every request. Decoding the payload is
//! only good for UX (who is logged in, which menu to show, whether the
//! token is obviously expired). The result is therefore typed as
//! [`UntrustedClaims`] and must not be used as proof of anything.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use platform::crypto::from_base64_url;

/// Opaque bearer credential
///
/// `Debug` is redacted so the token never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the payload without verification
    pub fn decode_untrusted(&self) -> Result<UntrustedClaims, TokenDecodeError> {
        decode_untrusted(&self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Why a token payload could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    #[error("Token must have 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("Token payload is not base64url")]
    Base64,

    #[error("Token payload is not UTF-8")]
    Utf8,

    #[error("Token payload is not a JSON object: {0}")]
    Payload(String),
}

/// Claims read from a token payload, NOT verified
///
/// Every field is optional: issuers differ and a missing claim is a
/// decision for the caller, not a decode failure. A claim of the wrong
/// JSON type reads as absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UntrustedClaims {
    pub email: Option<String>,
    pub role: Option<String>,
    /// Expiry, seconds since the Unix epoch (may be fractional)
    pub exp: Option<f64>,
    pub name: Option<String>,
    pub full_name: Option<String>,
}

impl UntrustedClaims {
    fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            email: text("email"),
            role: text("role"),
            exp: object.get("exp").and_then(Value::as_f64),
            name: text("name"),
            full_name: text("full_name").or_else(|| text("fullName")),
        }
    }

    /// `true` iff `exp` is present and strictly earlier than `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp < now.timestamp() as f64)
    }

    /// The `email` claim, when present and not blank
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// Decode a token's payload segment
///
/// Never panics; every malformed input maps to a [`TokenDecodeError`].
pub fn decode_untrusted(token: &str) -> Result<UntrustedClaims, TokenDecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::SegmentCount(segments.len()));
    }

    let bytes = from_base64_url(segments[1]).map_err(|_| TokenDecodeError::Base64)?;
    let text = String::from_utf8(bytes).map_err(|_| TokenDecodeError::Utf8)?;

    let object = serde_json::from_str::<Map<String, Value>>(&text)
        .map_err(|e| TokenDecodeError::Payload(e.to_string()))?;
    Ok(UntrustedClaims::from_object(&object))
}
