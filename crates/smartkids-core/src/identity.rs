//! Best-effort user identity decoded from the credential payload.
//!
//! Used when the profile lookup fails. Never authoritative and never an
//! error: decoding falls through to a fixed placeholder name.

use crate::types::{Credential, User};
use base64::Engine;

/// Display name used when the credential payload yields nothing usable.
pub const PLACEHOLDER_NAME: &str = "사용자";

const PLACEHOLDER_AVATAR: &str = "/api/placeholder/40/40";

/// Derive a user from the credential's embedded JWT-style payload.
///
/// Takes the second dot-separated segment, base64url-decodes it, and uses
/// the local part of an `email` claim as the display name. Any failure along
/// the way yields the placeholder user instead.
#[must_use]
pub fn user_from_credential(credential: &Credential) -> User {
    let name = decode_email_local_part(credential.as_str())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
    User {
        name,
        profile_image_url: Some(PLACEHOLDER_AVATAR.to_string()),
    }
}

fn decode_email_local_part(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = decode_payload(payload)?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let email = claims.get("email")?.as_str()?;
    let local = email.split('@').next()?;
    if local.is_empty() {
        None
    } else {
        Some(local.to_string())
    }
}

// Payloads are usually base64url without padding, but tokens minted with the
// standard alphabet (or with padding) show up in the wild too.
fn decode_payload(payload: &str) -> Option<Vec<u8>> {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn token_with_claims(claims: &serde_json::Value) -> Credential {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let payload = engine.encode(claims.to_string());
        Credential::new(format!("header.{payload}.signature"))
    }

    #[test]
    fn email_local_part_becomes_name() {
        let cred = token_with_claims(&serde_json::json!({ "email": "parent@example.com" }));
        assert_eq!(user_from_credential(&cred).name, "parent");
    }

    #[test]
    fn missing_email_falls_back_to_placeholder() {
        let cred = token_with_claims(&serde_json::json!({ "sub": "abc" }));
        assert_eq!(user_from_credential(&cred).name, PLACEHOLDER_NAME);
    }

    #[test]
    fn garbage_token_falls_back_to_placeholder() {
        let cred = Credential::new("not-a-jwt");
        assert_eq!(user_from_credential(&cred).name, PLACEHOLDER_NAME);

        let cred = Credential::new("a.%%%.c");
        assert_eq!(user_from_credential(&cred).name, PLACEHOLDER_NAME);
    }

    #[test]
    fn padded_standard_base64_payload_is_accepted() {
        let engine = base64::engine::general_purpose::STANDARD;
        let payload = engine.encode(serde_json::json!({ "email": "pad@example.com" }).to_string());
        let cred = Credential::new(format!("header.{payload}.signature"));
        assert_eq!(user_from_credential(&cred).name, "pad");
    }

    #[test]
    fn empty_local_part_is_rejected() {
        let cred = token_with_claims(&serde_json::json!({ "email": "@example.com" }));
        assert_eq!(user_from_credential(&cred).name, PLACEHOLDER_NAME);
    }
}
