//! HMAC-signed bearer tokens.
//!
//! Format: `base64url(claims JSON) . hex(HMAC-SHA256(payload))`. Stateless —
//! the server verifies the signature and expiry on every request, nothing is
//! stored. Claims carry the same fields the clients already expect from the
//! login response.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use timbrapp_core::types::UserRole;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    /// Unix timestamp (seconds) after which the token is rejected.
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Sign a token for the given claims.
pub fn mint_token(secret: &str, claims: &Claims) -> String {
    // serde_json can't fail on this plain struct
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
    let sig = sign(secret, &payload);
    format!("{}.{}", payload, sig)
}

/// Verify signature and expiry, returning the claims on success.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let (payload, sig) = token.split_once('.').ok_or(TokenError::Malformed)?;

    // Compare via Mac::verify_slice for constant-time behaviour.
    let sig_bytes = hex::decode(sig).map_err(|_| TokenError::BadSignature)?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::BadSignature)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&sig_bytes)
        .map_err(|_| TokenError::BadSignature)?;

    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    let claims: Claims = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    if claims.exp < chrono::Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

fn sign(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset_secs: i64) -> Claims {
        Claims {
            id: 7,
            email: "mario@example.com".to_string(),
            role: UserRole::User,
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        }
    }

    #[test]
    fn round_trip() {
        let token = mint_token("secret", &claims(3600));
        let verified = verify_token("secret", &token).unwrap();
        assert_eq!(verified.id, 7);
        assert_eq!(verified.email, "mario@example.com");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = mint_token("secret", &claims(3600));
        assert_eq!(
            verify_token("other", &token).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn expired_token_rejected() {
        let token = mint_token("secret", &claims(-10));
        assert_eq!(verify_token("secret", &token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = mint_token("secret", &claims(3600));
        let (payload, sig) = token.split_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(payload).unwrap();
        bytes[10] ^= 1;
        let forged = format!("{}.{}", URL_SAFE_NO_PAD.encode(bytes), sig);
        assert_eq!(
            verify_token("secret", &forged).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            verify_token("secret", "not-a-token").unwrap_err(),
            TokenError::Malformed
        );
    }
}
