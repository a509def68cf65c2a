//! Unverified decoding of a bearer token's payload.
//!
//! The client never checks the signature: claims read here are a display hint
//! for the navbar until the profile call answers, nothing more.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;
use store::Role;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Usually the user's email.
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// The email-like claim, `sub` first.
    pub fn email_claim(&self) -> Option<&str> {
        [self.sub.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token has no payload segment")]
    Malformed,
    #[error("payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the middle segment of `header.payload.signature`.
///
/// Accepts both the URL-safe alphabet JWTs use and the standard one, with or
/// without padding.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let payload = token
        .trim()
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(ClaimsError::Malformed)?;
    let payload = payload.trim_end_matches('=');

    let bytes = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(_) => STANDARD_NO_PAD.decode(payload)?,
    };
    Ok(serde_json::from_slice(&bytes)?)
}

/// Display name derived from an email address: the local part split on `.`,
/// each piece capitalised, joined with spaces.
///
/// `john.smith@x.com` → `John Smith`, `SCFP12345@mitvpu.ac.in` → `Scfp12345`.
/// Returns `None` when nothing usable remains.
pub fn name_from_email(email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or_default();
    let name = local
        .split('.')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    let name = name.trim().to_string();
    (!name.is_empty()).then_some(name)
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an unsigned token around a JSON payload.
    pub(crate) fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_claims() {
        let token = token_with(r#"{"sub":"SCFP12345@mitvpu.ac.in","role":"ADMIN","exp":1700000000}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.email_claim(), Some("SCFP12345@mitvpu.ac.in"));
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(claims.display_name(), None);
    }

    #[test]
    fn test_decode_accepts_padded_standard_alphabet() {
        let payload = base64::engine::general_purpose::STANDARD.encode(r#"{"fullName":"Jane"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode_claims(&token).unwrap().display_name(), Some("Jane"));
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(decode_claims("opaque"), Err(ClaimsError::Malformed)));
        assert!(matches!(decode_claims("a..c"), Err(ClaimsError::Malformed)));
        assert!(matches!(decode_claims("a.!!!.c"), Err(ClaimsError::Encoding(_))));
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("hello"));
        assert!(matches!(decode_claims(&not_json), Err(ClaimsError::Json(_))));
    }

    #[test]
    fn test_name_from_email() {
        assert_eq!(name_from_email("SCFP12345@mitvpu.ac.in").as_deref(), Some("Scfp12345"));
        assert_eq!(name_from_email("john.smith@x.com").as_deref(), Some("John Smith"));
        assert_eq!(name_from_email("a..b@x.com").as_deref(), Some("A B"));
        assert_eq!(name_from_email("@x.com"), None);
        assert_eq!(name_from_email(""), None);
        assert_eq!(name_from_email("no-at-sign").as_deref(), Some("No-at-sign"));
    }
}
