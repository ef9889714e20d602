use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::audit_event;

/// A single audit record as returned by the admin API
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditEventView {
    pub id: i64,
    /// RFC 3339 timestamp of the event
    pub timestamp: String,
    /// User id of the actor, or "unknown" for anonymous attempts
    pub actor_id: String,
    pub resource: String,
    pub action: String,
    pub ip_address: Option<String>,
    /// Event-specific payload (JSON object, serialized)
    pub data: String,
}

impl From<audit_event::Model> for AuditEventView {
    fn from(e: audit_event::Model) -> Self {
        Self {
            id: e.id,
            timestamp: e.timestamp,
            actor_id: e.actor_id,
            resource: e.resource,
            action: e.action,
            ip_address: e.ip_address,
            data: e.data,
        }
    }
}

/// Response model for the audit event listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditEventListResponse {
    pub events: Vec<AuditEventView>,
}
