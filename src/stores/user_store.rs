use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::db::user::Role;

/// Repository for user account storage operations
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up a user by primary key
    pub async fn find_by_id(&self, id: i64) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Look up a user by email address, case-insensitively
    ///
    /// Emails are stored lowercased, but the comparison also lowers the
    /// stored column so rows written before that rule still match.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Email)))
                    .eq(email.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Insert a new user account
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();

        let model = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            email: Set(email.to_lowercase()),
            password_hash: Set(password_hash.to_string()),
            display_name: Set(display_name.to_string()),
            role: Set(role),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("create_user", e))
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    /// Returns `CredentialError::UserIdNotFound` when no row matches, so a
    /// password change against a deleted account surfaces instead of
    /// silently succeeding.
    pub async fn update_password_hash(
        &self,
        user_id: i64,
        new_hash: &str,
    ) -> Result<(), InternalError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(new_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_password_hash", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::Credential(CredentialError::UserIdNotFound {
                user_id,
            }));
        }

        Ok(())
    }

    /// Delete a user account
    ///
    /// Outstanding access tokens for the account die with it, since
    /// authentication re-reads the user on every request.
    pub async fn delete(&self, user_id: i64) -> Result<(), InternalError> {
        let result = user::Entity::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::Credential(CredentialError::UserIdNotFound {
                user_id,
            }));
        }

        Ok(())
    }

    /// Count all user accounts
    pub async fn count(&self) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }
}
