//! Auth Service
//!
//! Issues and validates signed, time-bounded access tokens (HS256 JWT).
//! The signing secret is loaded once at startup and injected through
//! [`AuthConfig`]; it is never rotated at runtime.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::domain::{Identity, Role};
use crate::error::{PortalError, Result};

/// Name of the HttpOnly session cookie set at login.
pub const SESSION_COOKIE: &str = "hl_session";

/// Process-wide auth configuration, built once in the server binary.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC signing secret.
    pub secret_key: String,
    pub issuer: String,
    pub audience: String,
    pub access_token_expiry_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "dev-only-secret-change-me".to_string(),
            issuer: "hirelane".to_string(),
            audience: "hirelane".to_string(),
            access_token_expiry_secs: 86400,
        }
    }
}

/// Claims embedded in an access token: identity, role, and expiry, nothing
/// else. The token is a bearer credential, not a capability token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Identity id.
    pub sub: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }

    pub fn generate_access_token(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: identity.id.clone(),
            role: identity.role,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now,
            exp: now + self.config.access_token_expiry_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            PortalError::Internal {
                message: format!("token signing failed: {}", e),
            }
        })
    }

    /// Verify signature, issuer, audience, and expiry.
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        match decode::<AccessTokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => PortalError::TokenExpired,
                ErrorKind::InvalidSignature => PortalError::InvalidToken {
                    message: "signature mismatch".to_string(),
                },
                _ => PortalError::InvalidToken {
                    message: "malformed token".to_string(),
                },
            }),
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(AuthConfig::default())
    }

    fn identity() -> Identity {
        Identity::new("Ada Lovelace", "ada@example.com", "555-0100", "$argon2id$stub", Role::Student)
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = service();
        let identity = identity();
        let token = service.generate_access_token(&identity).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, identity.id);
        assert_eq!(claims.role, Role::Student);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = AuthService::new(AuthConfig {
            access_token_expiry_secs: -120,
            ..AuthConfig::default()
        });
        let token = service.generate_access_token(&identity()).unwrap();
        let err = service.validate_token(&token).unwrap_err();
        assert!(matches!(err, PortalError::TokenExpired));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let other = AuthService::new(AuthConfig {
            secret_key: "a-different-secret".to_string(),
            ..AuthConfig::default()
        });
        let token = other.generate_access_token(&identity()).unwrap();
        let err = service.validate_token(&token).unwrap_err();
        assert!(matches!(err, PortalError::InvalidToken { .. }));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let err = service().validate_token("not.a.jwt").unwrap_err();
        assert!(matches!(err, PortalError::InvalidToken { .. }));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
