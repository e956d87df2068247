//! Unverified token introspection for display purposes.
//!
//! Decodes the payload segment of a JWT-shaped credential to read display
//! claims (name, email) without any signature verification. This is a
//! convenience read for UI chrome like the admin header greeting.
//!
//! It is NOT an authorization decision and must never be used as one - the
//! only trusted source of role and identity is `TokenValidator`, which asks
//! the backend. Nothing in the session gate or monitor consults these claims.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

/// Claims that may appear in the credential payload. All optional - the
/// token is opaque by contract and any of these may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload of a JWT-shaped token without verifying it.
///
/// Returns `None` for anything that is not three dot-separated base64url
/// segments with a JSON object in the middle. Opaque (non-JWT) tokens are
/// valid credentials that simply yield no display claims.
pub fn peek_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    // A JWT has exactly three segments
    if segments.next().is_none() || segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
