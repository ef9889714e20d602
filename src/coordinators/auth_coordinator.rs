use std::sync::Arc;

use chrono::Utc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::mailer::{Mailer, PasswordResetEmail};
use crate::services::{crypto, PasswordHasher, TokenService};
use crate::stores::{ResetTokenStore, UserStore};
use crate::types::db::user;
use crate::types::internal::auth::AuthenticatedUser;

/// Orchestrates the authentication workflows
///
/// Composes store and service operations for the auth endpoints. Contains
/// no storage or crypto logic of its own.
pub struct AuthCoordinator {
    user_store: Arc<UserStore>,
    reset_token_store: Arc<ResetTokenStore>,
    token_service: Arc<TokenService>,
    password_hasher: PasswordHasher,
    audit_logger: Arc<AuditLogger>,
    mailer: Arc<dyn Mailer>,
    reset_secret: String,
    reset_token_ttl_seconds: i64,
    public_url: String,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: app_data.user_store.clone(),
            reset_token_store: app_data.reset_token_store.clone(),
            token_service: app_data.token_service.clone(),
            password_hasher: app_data.password_hasher.clone(),
            audit_logger: app_data.audit_logger.clone(),
            mailer: app_data.mailer.clone(),
            reset_secret: app_data.secret_manager.reset_token_secret().to_string(),
            reset_token_ttl_seconds: app_data.settings.reset_token_ttl_seconds(),
            public_url: app_data.settings.public_url.clone(),
        }
    }

    /// Verify credentials and issue an access token
    ///
    /// Unknown email and wrong password take the same error path, so the
    /// response never reveals whether an account exists.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: Option<String>,
    ) -> Result<(user::Model, String), InternalError> {
        let user = match self.user_store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                // Burn a bcrypt round so this path costs the same as a
                // wrong password against a real account
                self.burn_password_check(password).await;
                self.audit_logger
                    .log_login_failure(email, ip_address)
                    .await;
                return Err(CredentialError::InvalidCredentials.into());
            }
        };

        if !self.verify_password(password, &user.password_hash).await? {
            self.audit_logger
                .log_login_failure(email, ip_address)
                .await;
            return Err(CredentialError::InvalidCredentials.into());
        }

        let access_token = self.token_service.issue_access_token(&user)?;

        self.audit_logger
            .log_login_success(&AuthenticatedUser::from(user.clone()), ip_address)
            .await;

        Ok((user, access_token))
    }

    /// Change an authenticated user's password
    ///
    /// The current password is re-verified even though the caller already
    /// holds a valid token, so a stolen session cannot lock out the owner.
    pub async fn change_password(
        &self,
        actor: &AuthenticatedUser,
        current_password: &str,
        new_password: &str,
        ip_address: Option<String>,
    ) -> Result<(), InternalError> {
        let user = self
            .user_store
            .find_by_id(actor.id)
            .await?
            .ok_or(CredentialError::UserIdNotFound { user_id: actor.id })?;

        if !self
            .verify_password(current_password, &user.password_hash)
            .await?
        {
            return Err(CredentialError::IncorrectPassword.into());
        }

        let new_hash = self.hash_password(new_password).await?;
        self.user_store
            .update_password_hash(actor.id, &new_hash)
            .await?;

        self.audit_logger
            .log_password_changed(actor, ip_address)
            .await;

        Ok(())
    }

    /// Issue a password-reset token and dispatch the reset email
    ///
    /// Returns `Ok(())` for unknown emails without doing any work, so the
    /// endpoint responds identically whether or not an account exists. Only
    /// a delivery failure for a real account surfaces as an error.
    pub async fn request_password_reset(
        &self,
        email: &str,
        ip_address: Option<String>,
    ) -> Result<(), InternalError> {
        let user = match self.user_store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = crypto::generate_reset_token();
        let token_hash = crypto::hmac_sha256_token(&self.reset_secret, &token);
        let expires_at = Utc::now().timestamp() + self.reset_token_ttl_seconds;

        // Replaces any outstanding token, so at most one link is live per user
        self.reset_token_store
            .replace_for_user(user.id, &token_hash, expires_at)
            .await?;

        let reset_url = format!("{}/admin/reset-password?code={}", self.public_url, token);
        let email_message = PasswordResetEmail {
            to: user.email.clone(),
            display_name: user.display_name.clone(),
            reset_url,
        };

        self.mailer
            .send_password_reset(&email_message)
            .await
            .map_err(|e| CredentialError::DeliveryFailed(e.to_string()))?;

        self.audit_logger
            .log_reset_requested(user.id, ip_address)
            .await;

        Ok(())
    }

    /// Redeem a reset token and set a new password
    ///
    /// The token row is consumed before the password is written. When two
    /// requests race on the same token the delete succeeds for exactly one
    /// of them; the loser gets the same error as a token that never existed.
    pub async fn redeem_password_reset(
        &self,
        token: &str,
        new_password: &str,
        ip_address: Option<String>,
    ) -> Result<(), InternalError> {
        let token_hash = crypto::hmac_sha256_token(&self.reset_secret, token);

        let record = self
            .reset_token_store
            .find(&token_hash)
            .await?
            .ok_or(CredentialError::ResetTokenNotFound)?;

        if record.expires_at < Utc::now().timestamp() {
            // Expired rows are dead either way; failing to remove one now
            // only leaves it for purge_expired
            let _ = self.reset_token_store.consume(&token_hash).await;
            return Err(CredentialError::ResetTokenExpired.into());
        }

        if !self.reset_token_store.consume(&token_hash).await? {
            return Err(CredentialError::ResetTokenNotFound.into());
        }

        let new_hash = self.hash_password(new_password).await?;
        self.user_store
            .update_password_hash(record.user_id, &new_hash)
            .await?;

        self.audit_logger
            .log_reset_redeemed(record.user_id, ip_address)
            .await;

        Ok(())
    }

    /// Access token lifetime in seconds, for the login response body
    pub fn access_expires_in(&self) -> i64 {
        self.token_service.access_expires_in()
    }

    // bcrypt at production cost blocks for tens of milliseconds, keep it
    // off the async workers
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, InternalError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| InternalError::crypto("verify_password", e.to_string()))
    }

    async fn burn_password_check(&self, password: &str) {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        let _ = tokio::task::spawn_blocking(move || hasher.burn_verification(&password)).await;
    }

    async fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?
    }
}
