use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::from_secs(cfg.ttl_days as u64 * 24 * 60 * 60),
        }
    }
}

impl JwtKeys {
    fn sign_with_ttl(&self, user_id: &str, ttl_secs: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(ttl_secs);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn sign(&self, user_id: &str) -> anyhow::Result<String> {
        self.sign_with_ttl(user_id, self.ttl.as_secs() as i64)
    }

    /// Checks signature and expiry only: no issuer, no audience, no
    /// revocation list.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                _ => ApiError::TokenInvalid,
            }
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign("user_abc123def456").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "user_abc123def456");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        let token = keys.sign_with_ttl("user_abc123def456", -3600).expect("sign");
        match keys.verify(&token) {
            Err(ApiError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_rejects_garbage_token() {
        let keys = make_keys();
        match keys.verify("not.a.jwt") {
            Err(ApiError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_rejects_token_signed_with_other_secret() {
        let keys = make_keys();
        let foreign = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            ttl: Duration::from_secs(60),
        };
        let token = foreign.sign("user_abc123def456").expect("sign");
        match keys.verify(&token) {
            Err(ApiError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }
}
