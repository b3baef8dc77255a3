use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;

/// Validity window of a session credential.
pub const SESSION_TTL: Duration = Duration::from_secs(5 * 24 * 60 * 60);

/// JWT payload of a session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,     // user ID
    pub role: String, // role claim for downstream guards
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub jti: Uuid,    // unique per issuance
}

/// A freshly signed token together with the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl SessionKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: SESSION_TTL,
        }
    }

    pub fn sign(&self, user_id: Uuid, role: &str) -> anyhow::Result<IssuedSession> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            id: user_id,
            role: role.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: expires_at.unix_timestamp() as usize,
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, role = %role, "session token signed");
        Ok(IssuedSession { token, expires_at })
    }

    /// Checks signature and expiry. Route guards use this; issuance never does.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = %data.claims.id, "session token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> SessionKeys {
        SessionKeys::from_config(&JwtConfig {
            secret: secret.into(),
        })
    }

    #[test]
    fn sign_and_verify_session_token() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let issued = keys.sign(user_id, "user").expect("sign");
        let claims = keys.verify(&issued.token).expect("verify token");
        assert_eq!(claims.id, user_id);
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn expiry_is_five_days_after_issue() {
        let keys = make_keys("dev-secret");
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let issued = keys.sign(Uuid::new_v4(), "admin").expect("sign");
        let claims = keys.verify(&issued.token).expect("verify");

        assert_eq!(claims.exp - claims.iat, 5 * 24 * 60 * 60);
        let expected = before + 5 * 24 * 60 * 60;
        assert!((claims.exp as i64 - expected).abs() <= 2);
        assert_eq!(issued.expires_at.unix_timestamp(), claims.exp as i64);
    }

    #[test]
    fn each_issuance_is_distinct() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let a = keys.sign(user_id, "user").unwrap();
        let b = keys.sign(user_id, "user").unwrap();
        assert_ne!(a.token, b.token);
        assert!(keys.verify(&a.token).is_ok());
        assert!(keys.verify(&b.token).is_ok());
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let good = make_keys("same-secret");
        let bad = make_keys("other-secret");
        let issued = good.sign(Uuid::new_v4(), "user").unwrap();
        assert!(bad.verify(&issued.token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let past = OffsetDateTime::now_utc().unix_timestamp() as usize - 3600;
        let claims = Claims {
            id: Uuid::new_v4(),
            role: "user".into(),
            iat: past - 60,
            exp: past,
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
