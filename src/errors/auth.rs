use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

use crate::errors::internal::{CredentialError, InternalError};

/// Standardized error response body for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// API-visible authentication and authorization errors
///
/// Messages are fixed and deliberately identical across internal causes that
/// must not be distinguishable from outside (anti-enumeration).
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Wrong email/password pair; identical whether the email is unknown
    /// or the password is wrong
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Missing, malformed, expired, or signature-invalid bearer credential
    #[oai(status = 401)]
    Unauthenticated(Json<AuthErrorResponse>),

    /// Valid identity, insufficient role
    #[oai(status = 403)]
    Forbidden(Json<AuthErrorResponse>),

    /// Reset token does not exist (or was already redeemed)
    #[oai(status = 400)]
    TokenNotFound(Json<AuthErrorResponse>),

    /// Reset token exists but its validity window has elapsed
    #[oai(status = 400)]
    TokenExpired(Json<AuthErrorResponse>),

    /// The reset email could not be dispatched
    #[oai(status = 502)]
    DeliveryFailure(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(AuthErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    /// Create an Unauthenticated error
    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(AuthErrorResponse {
            error: "unauthenticated".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        AuthError::Forbidden(Json(AuthErrorResponse {
            error: "forbidden".to_string(),
            message: "You are not allowed to perform this action".to_string(),
            status_code: 403,
        }))
    }

    /// Create a TokenNotFound error
    pub fn token_not_found() -> Self {
        AuthError::TokenNotFound(Json(AuthErrorResponse {
            error: "token_not_found".to_string(),
            message: "Invalid reset token".to_string(),
            status_code: 400,
        }))
    }

    /// Create a TokenExpired error
    pub fn token_expired() -> Self {
        AuthError::TokenExpired(Json(AuthErrorResponse {
            error: "token_expired".to_string(),
            message: "Reset token has expired, request a new link".to_string(),
            status_code: 400,
        }))
    }

    /// Create a DeliveryFailure error
    pub fn delivery_failure() -> Self {
        AuthError::DeliveryFailure(Json(AuthErrorResponse {
            error: "delivery_failure".to_string(),
            message: "Failed to send the reset email".to_string(),
            status_code: 502,
        }))
    }

    /// Create an InternalError
    pub fn internal_server_error() -> Self {
        AuthError::InternalError(Json(AuthErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal server error".to_string(),
            status_code: 500,
        }))
    }

    /// Convert an InternalError to an AuthError
    ///
    /// This is the explicit conversion point from internal errors to API
    /// errors. Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials)
            | InternalError::Credential(CredentialError::IncorrectPassword) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::InvalidToken { .. })
            | InternalError::Credential(CredentialError::ExpiredToken(_)) => {
                tracing::debug!("Rejected bearer credential: {}", err);
                Self::unauthenticated()
            }
            InternalError::Credential(CredentialError::ResetTokenNotFound) => {
                Self::token_not_found()
            }
            InternalError::Credential(CredentialError::ResetTokenExpired) => Self::token_expired(),
            InternalError::Credential(CredentialError::DeliveryFailed(reason)) => {
                tracing::error!("Reset email delivery failed: {}", reason);
                Self::delivery_failure()
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::Unauthenticated(json) => json.0.message.clone(),
            AuthError::Forbidden(json) => json.0.message.clone(),
            AuthError::TokenNotFound(json) => json.0.message.clone(),
            AuthError::TokenExpired(json) => json.0.message.clone(),
            AuthError::DeliveryFailure(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
