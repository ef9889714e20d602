use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::errors::InternalError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;

/// Repository for audit event storage operations
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit event to the database
    ///
    /// Serializes the data map to JSON and inserts the event into the
    /// audit_events table.
    ///
    /// # Errors
    /// Returns `InternalError` if serialization or the database insert fails
    pub async fn write_event(&self, event: AuditEvent) -> Result<(), InternalError> {
        let data_json = serde_json::to_string(&event.data)
            .map_err(|e| InternalError::parse("audit_data", e.to_string()))?;

        // actor_id is absent for events like login_failure where no account matched
        let model = audit_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            timestamp: Set(Utc::now().to_rfc3339()),
            actor_id: Set(event.actor_id.unwrap_or_else(|| "unknown".to_string())),
            resource: Set(event.resource),
            action: Set(event.action.to_string()),
            ip_address: Set(event.ip_address),
            data: Set(data_json),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("write_audit_event", e))?;

        Ok(())
    }

    /// Fetch the most recent audit events, newest first
    pub async fn recent(&self, limit: u64) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .order_by_desc(audit_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_audit_events", e))
    }
}
