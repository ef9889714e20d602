use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::errors::internal::DatabaseError;
use crate::errors::InternalError;
use crate::types::db::password_reset_token;

/// Repository for password-reset token storage operations
///
/// Only token hashes ever reach this store. Consumed tokens are deleted
/// rather than flagged, so presence of a row is the single source of truth
/// for validity.
pub struct ResetTokenStore {
    db: DatabaseConnection,
}

impl ResetTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a token hash for a user, replacing any outstanding one
    ///
    /// Delete and insert run in one transaction so a user can never hold
    /// two live tokens.
    pub async fn replace_for_user(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        password_reset_token::Entity::delete_many()
            .filter(password_reset_token::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_existing_reset_tokens", e))?;

        let model = password_reset_token::ActiveModel {
            token_hash: Set(token_hash.to_string()),
            user_id: Set(user_id),
            created_at: Set(Utc::now().timestamp()),
            expires_at: Set(expires_at),
        };
        model
            .insert(&txn)
            .await
            .map_err(|e| InternalError::database("insert_reset_token", e))?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        Ok(())
    }

    /// Look up a token by its hash
    pub async fn find(
        &self,
        token_hash: &str,
    ) -> Result<Option<password_reset_token::Model>, InternalError> {
        password_reset_token::Entity::find_by_id(token_hash.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_reset_token", e))
    }

    /// Atomically consume a token, returning whether this caller won
    ///
    /// The delete is keyed on the primary key, so when two requests race on
    /// the same token exactly one sees a deleted row.
    pub async fn consume(&self, token_hash: &str) -> Result<bool, InternalError> {
        let result = password_reset_token::Entity::delete_by_id(token_hash.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("consume_reset_token", e))?;

        Ok(result.rows_affected == 1)
    }

    /// Delete all tokens past their expiry
    pub async fn purge_expired(&self) -> Result<u64, InternalError> {
        let result = password_reset_token::Entity::delete_many()
            .filter(password_reset_token::Column::ExpiresAt.lt(Utc::now().timestamp()))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("purge_expired_reset_tokens", e))?;

        Ok(result.rows_affected)
    }
}
