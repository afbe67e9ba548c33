//! Session token encode/decode. The signing secret is injected at
//! construction; decode is a pure function of (token, secret, current time)
//! and never consults the revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Session token claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Owning user id.
    pub user_id: i64,
    /// Unique token identifier, the revocation key.
    pub jti: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a token for `user_id` with a freshly generated jti.
    pub fn encode(&self, user_id: i64) -> Result<(String, Claims), AppError> {
        self.encode_with_jti(user_id, Uuid::new_v4().to_string())
    }

    /// Issue a token carrying the supplied jti.
    pub fn encode_with_jti(&self, user_id: i64, jti: String) -> Result<(String, Claims), AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            jti,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))?;

        Ok((token, claims))
    }

    /// Verify signature, structure, and expiry. Revocation is the caller's
    /// concern.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No clock leeway: a past exp fails immediately, not after the
        // default 60-second grace window.
        validation.leeway = 0;
        // No registered claims beyond exp are mandated.
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn encode_then_decode_roundtrip() {
        let svc = service();
        let (token, issued) = svc.encode(42).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let claims = svc.decode(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn exp_is_about_one_hour_ahead() {
        let svc = service();
        let (token, _) = svc.encode(1).unwrap();
        let claims = svc.decode(&token).unwrap();

        let expected = Utc::now().timestamp() + 3600;
        assert!((claims.exp - expected).abs() <= 5);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn fresh_jti_is_unique() {
        let svc = service();
        let (_, a) = svc.encode(1).unwrap();
        let (_, b) = svc.encode(1).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn supplied_jti_is_kept() {
        let svc = service();
        let (token, _) = svc.encode_with_jti(1, "fixed-jti".to_string()).unwrap();
        assert_eq!(svc.decode(&token).unwrap().jti, "fixed-jti");
    }

    #[test]
    fn expired_token_fails_decode() {
        let svc = JwtService::new("test-secret", -60);
        let (token, _) = svc.encode(1).unwrap();
        assert!(matches!(svc.decode(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn recently_expired_token_fails_decode() {
        // 30 seconds past exp, inside what a default leeway would forgive.
        let svc = JwtService::new("test-secret", -30);
        let (token, _) = svc.encode(1).unwrap();
        assert!(matches!(svc.decode(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn tampered_token_fails_decode() {
        let svc = service();
        let (token, _) = svc.encode(1).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = format!("{}AA", parts[1]);
        let tampered = parts.join(".");
        assert!(matches!(svc.decode(&tampered), Err(AppError::InvalidToken)));
    }

    #[test]
    fn wrong_secret_fails_decode() {
        let (token, _) = service().encode(1).unwrap();
        let other = JwtService::new("other-secret", 3600);
        assert!(matches!(other.decode(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn malformed_token_fails_decode() {
        assert!(matches!(
            service().decode("not.a.token"),
            Err(AppError::InvalidToken)
        ));
    }
}
