//! JWT token generation and validation.
//!
//! Admins receive a single HS256 access token; there is no refresh token and
//! no server-side revocation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin account ID.
    pub sub: Uuid,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expires at (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an admin expiring at `expires_at`.
    #[must_use]
    pub fn new(admin_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: admin_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the admin ID.
    #[must_use]
    pub const fn admin_id(&self) -> Uuid {
        self.sub
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry_secs", &self.config.token_expiry_secs)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a token for an admin using the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token(&self, admin_id: Uuid) -> Result<String, JwtError> {
        let lifetime = i64::try_from(self.config.token_expiry_secs).unwrap_or(i64::MAX);
        let expires_at = Utc::now() + Duration::seconds(lifetime);
        self.generate_token_expiring_at(admin_id, expires_at)
    }

    /// Generates a token with an explicit expiry.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token_expiring_at(
        &self,
        admin_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(admin_id, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or its
    /// signature does not match.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the token lifetime in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> u64 {
        self.config.token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_expiry_secs: 900,
        })
    }

    #[test]
    fn test_generate_and_validate() {
        let service = create_test_service();
        let admin_id = Uuid::new_v4();

        let token = service.generate_token(admin_id).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.admin_id(), admin_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        let result = service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::DecodingError(_))));
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let token = service
            .generate_token_expiring_at(Uuid::new_v4(), Utc::now() - Duration::hours(1))
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = create_test_service();
        let token = service.generate_token(Uuid::new_v4()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let other = service.generate_token(Uuid::new_v4()).unwrap();
        parts[1] = other.split('.').nth(1).unwrap().to_string();
        let forged = parts.join(".");

        assert!(service.validate_token(&forged).is_err());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let service = create_test_service();
        let other = JwtService::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            token_expiry_secs: 900,
        });
        let token = other.generate_token(Uuid::new_v4()).unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", create_test_service());
        assert!(rendered.contains("[hidden]"));
        assert!(!rendered.contains("test-secret-key"));
    }
}
