use std::sync::Arc;

use crate::errors::auth::AuthError;
use crate::services::{extract_bearer_credential, TokenService};
use crate::stores::UserStore;
use crate::types::db::user::Role;
use crate::types::internal::auth::AuthenticatedUser;

/// Resolves bearer tokens into authenticated users and checks roles
///
/// The role is always re-read from the database, never trusted from the
/// token, so demotions and deletions take effect on the next request.
pub struct Authenticator {
    token_service: Arc<TokenService>,
    user_store: Arc<UserStore>,
}

impl Authenticator {
    pub fn new(token_service: Arc<TokenService>, user_store: Arc<UserStore>) -> Self {
        Self {
            token_service,
            user_store,
        }
    }

    /// Authenticate a request from its Authorization header value
    ///
    /// Every failure mode here is 401: missing header, wrong scheme, bad
    /// signature, expired token, or a token whose account no longer exists.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let token = extract_bearer_credential(authorization)
            .ok_or_else(AuthError::unauthenticated)?;

        let claims = self
            .token_service
            .verify_access_token(token)
            .map_err(|_| AuthError::unauthenticated())?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::unauthenticated())?;

        let user = self
            .user_store
            .find_by_id(user_id)
            .await
            .map_err(AuthError::from_internal_error)?
            .ok_or_else(AuthError::unauthenticated)?;

        Ok(AuthenticatedUser::from(user))
    }

    /// Check that an authenticated user holds one of the allowed roles
    ///
    /// Failure here is 403: the caller proved who they are but lacks the
    /// role.
    pub fn authorize(&self, user: &AuthenticatedUser, allowed: &[Role]) -> Result<(), AuthError> {
        if allowed.contains(&user.role) {
            Ok(())
        } else {
            Err(AuthError::forbidden())
        }
    }

    pub fn require_admin(&self, user: &AuthenticatedUser) -> Result<(), AuthError> {
        self.authorize(user, &[Role::Admin])
    }

    pub fn require_editor_or_admin(&self, user: &AuthenticatedUser) -> Result<(), AuthError> {
        self.authorize(user, &[Role::Admin, Role::Editor])
    }
}
