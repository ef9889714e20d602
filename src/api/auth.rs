use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::Api;
use crate::auth::Authenticator;
use crate::coordinators::AuthCoordinator;
use crate::errors::auth::AuthError;
use crate::types::dto::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    LoginResponse, MessageResponse, ResetPasswordRequest, UserView,
};

/// Authentication API endpoints
pub struct AuthApi {
    coordinator: Arc<AuthCoordinator>,
    authenticator: Arc<Authenticator>,
}

impl AuthApi {
    pub fn new(coordinator: Arc<AuthCoordinator>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            coordinator,
            authenticator,
        }
    }
}

impl Api for AuthApi {}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with email and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthError> {
        let ip_address = self.extract_ip_address(req);

        let (user, access_token) = self
            .coordinator
            .login(&body.email, &body.password, ip_address)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(LoginResponse {
            user: UserView::from(user),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.coordinator.access_expires_in(),
        }))
    }

    /// Return the authenticated user's profile
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, req: &Request) -> Result<Json<UserView>, AuthError> {
        let user = self
            .authenticator
            .authenticate(req.header("Authorization"))
            .await?;

        Ok(Json(UserView::from(&user)))
    }

    /// Change the authenticated user's password
    #[oai(
        path = "/change-password",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn change_password(
        &self,
        req: &Request,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let user = self
            .authenticator
            .authenticate(req.header("Authorization"))
            .await?;
        let ip_address = self.extract_ip_address(req);

        self.coordinator
            .change_password(&user, &body.current_password, &body.new_password, ip_address)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(MessageResponse {
            message: "Password changed".to_string(),
        }))
    }

    /// Request a password-reset email
    ///
    /// Responds with `ok: true` whether or not the email belongs to an
    /// account.
    #[oai(
        path = "/forgot-password",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn forgot_password(
        &self,
        req: &Request,
        body: Json<ForgotPasswordRequest>,
    ) -> Result<Json<ForgotPasswordResponse>, AuthError> {
        let ip_address = self.extract_ip_address(req);

        self.coordinator
            .request_password_reset(&body.email, ip_address)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(ForgotPasswordResponse { ok: true }))
    }

    /// Redeem a password-reset token and set a new password
    #[oai(
        path = "/reset-password",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn reset_password(
        &self,
        req: &Request,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ip_address = self.extract_ip_address(req);

        self.coordinator
            .redeem_password_reset(&body.token, &body.new_password, ip_address)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(MessageResponse {
            message: "Password has been reset".to_string(),
        }))
    }
}
