use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::errors::{CredentialError, InternalError};
use crate::types::db::user;
use crate::types::internal::auth::{AccessClaims, RefreshClaims};

/// Signing configuration for the token service
///
/// Access and refresh tokens use disjoint secrets, so a refresh token can
/// never be accepted where an access token is expected.
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

/// Manages JWT generation and validation for access and refresh tokens
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

/// Extract the credential from an Authorization header value
///
/// Returns `None` unless the header uses the Bearer scheme with a non-empty
/// credential.
pub fn extract_bearer_credential(header: Option<&str>) -> Option<&str> {
    let value = header?.strip_prefix("Bearer ")?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            access_secret: config.access_secret,
            refresh_secret: config.refresh_secret,
            access_ttl_seconds: config.access_ttl_seconds,
            refresh_ttl_seconds: config.refresh_ttl_seconds,
        }
    }

    /// Generate a signed access token for the given user
    ///
    /// Claims carry the email and role at issue time. The role claim is
    /// informational only; authorization always re-reads the role from the
    /// database.
    pub fn issue_access_token(&self, user: &user::Model) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();

        let claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.access_ttl_seconds,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("encode_access_token", e.to_string()))?;

        Ok(token)
    }

    /// Generate a signed refresh token for the given user
    ///
    /// Each refresh token carries a unique `jti` so individual tokens can be
    /// told apart even when issued within the same second.
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();

        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.refresh_ttl_seconds,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("encode_refresh_token", e.to_string()))?;

        Ok(token)
    }

    /// Validate an access token and return its claims
    ///
    /// Distinguishes expiry from all other failures so callers can surface
    /// a precise error message.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, InternalError> {
        Self::verify::<AccessClaims>(token, &self.access_secret, "access")
    }

    /// Validate a refresh token and return its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, InternalError> {
        Self::verify::<RefreshClaims>(token, &self.refresh_secret, "refresh")
    }

    /// Access token lifetime in seconds, for the login response body
    pub fn access_expires_in(&self) -> i64 {
        self.access_ttl_seconds
    }

    fn verify<C: serde::de::DeserializeOwned>(
        token: &str,
        secret: &str,
        token_type: &str,
    ) -> Result<C, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<C>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                CredentialError::ExpiredToken(token_type.to_string())
            }
            _ => CredentialError::InvalidToken {
                token_type: token_type.to_string(),
                reason: e.to_string(),
            },
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ access_ttl: {}s, refresh_ttl: {}s }}",
            self.access_ttl_seconds, self.refresh_ttl_seconds
        )
    }
}
