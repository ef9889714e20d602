use thiserror::Error;

/// Domain errors for the authentication core
///
/// Internal only; the API layer maps these to `AuthError` with fixed,
/// non-leaking messages.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("User id not found: {user_id}")]
    UserIdNotFound { user_id: i64 },

    #[error("Invalid token: {token_type} - {reason}")]
    InvalidToken { token_type: String, reason: String },

    #[error("Expired token: {0}")]
    ExpiredToken(String),

    #[error("Reset token not found")]
    ResetTokenNotFound,

    #[error("Reset token expired")]
    ResetTokenExpired,

    #[error("Reset email delivery failed: {0}")]
    DeliveryFailed(String),
}
