use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::internal::auth::AuthenticatedUser;

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address (matched case-insensitively)
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Public view of a user record
///
/// Never carries the password hash.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserView {
    /// Numeric user id
    pub id: i64,

    /// Email address
    pub email: String,

    /// Display name shown in the dashboard
    pub display_name: String,

    /// Role ("admin" or "editor")
    pub role: String,

    /// Optional avatar reference
    pub avatar_url: Option<String>,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            role: u.role.as_str().to_string(),
            avatar_url: u.avatar_url,
        }
    }
}

impl From<&AuthenticatedUser> for UserView {
    fn from(u: &AuthenticatedUser) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            display_name: u.display_name.clone(),
            role: u.role.as_str().to_string(),
            avatar_url: u.avatar_url.clone(),
        }
    }
}

/// Response model for successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The authenticated user
    pub user: UserView,

    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Request model for password change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password for verification
    pub current_password: String,

    /// New password to set
    pub new_password: String,
}

/// Request model for forgot-password
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email address to send the reset link to
    pub email: String,
}

/// Response model for forgot-password
///
/// Identical whether or not the email is registered.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordResponse {
    /// Always true; registration status is never revealed
    pub ok: bool,
}

/// Request model for redeeming a password reset token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Opaque token from the reset email
    pub token: String,

    /// New password to set
    pub new_password: String,
}

/// Generic success message
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Success message
    pub message: String,
}
