use std::sync::Arc;

use serde_json::json;

use crate::services::crypto;
use crate::stores::audit_store::AuditStore;
use crate::types::db::user::Role;
use crate::types::internal::audit::{AuditAction, AuditEvent};
use crate::types::internal::auth::AuthenticatedUser;

/// Audit logging provider that handles all audit event creation and writing
///
/// Recording is best-effort: a failed write is logged through tracing and
/// never fails the operation being audited.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    /// Create a new AuditLogger
    ///
    /// # Arguments
    /// * `audit_store` - Reference to the AuditStore for writing events
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Write an event, swallowing storage failures
    pub async fn record(&self, event: AuditEvent) {
        let action = event.action.clone();
        if let Err(e) = self.audit_store.write_event(event).await {
            tracing::error!(action = %action, error = %e, "failed to write audit event");
        }
    }

    /// Log a successful login
    pub async fn log_login_success(&self, user: &AuthenticatedUser, ip_address: Option<String>) {
        let mut event = AuditEvent::new(AuditAction::LoginSuccess, "auth/login");
        event.actor_id = Some(user.id.to_string());
        event.ip_address = ip_address;
        event.data.insert("email".to_string(), json!(user.email));

        self.record(event).await;
    }

    /// Log a failed login attempt
    ///
    /// The attempted email is fingerprinted rather than stored verbatim, so
    /// the audit trail does not accumulate raw identifiers from probes.
    pub async fn log_login_failure(&self, attempted_email: &str, ip_address: Option<String>) {
        let mut event = AuditEvent::new(AuditAction::LoginFailure, "auth/login");
        event.ip_address = ip_address;
        event.data.insert(
            "email_fingerprint".to_string(),
            json!(crypto::sha256_fingerprint(&attempted_email.to_lowercase())),
        );

        self.record(event).await;
    }

    /// Log a password change through the authenticated endpoint
    pub async fn log_password_changed(&self, user: &AuthenticatedUser, ip_address: Option<String>) {
        let mut event = AuditEvent::new(AuditAction::PasswordChanged, "auth/change-password");
        event.actor_id = Some(user.id.to_string());
        event.ip_address = ip_address;

        self.record(event).await;
    }

    /// Log the issue of a password-reset token
    pub async fn log_reset_requested(&self, user_id: i64, ip_address: Option<String>) {
        let mut event = AuditEvent::new(AuditAction::PasswordResetRequested, "auth/forgot-password");
        event.actor_id = Some(user_id.to_string());
        event.ip_address = ip_address;

        self.record(event).await;
    }

    /// Log a successful password-reset redemption
    pub async fn log_reset_redeemed(&self, user_id: i64, ip_address: Option<String>) {
        let mut event = AuditEvent::new(AuditAction::PasswordResetRedeemed, "auth/reset-password");
        event.actor_id = Some(user_id.to_string());
        event.ip_address = ip_address;

        self.record(event).await;
    }

    /// Log an authorization refusal
    pub async fn log_access_denied(
        &self,
        user: &AuthenticatedUser,
        resource: &str,
        required_roles: &[Role],
        ip_address: Option<String>,
    ) {
        let mut event = AuditEvent::new(AuditAction::AccessDenied, resource);
        event.actor_id = Some(user.id.to_string());
        event.ip_address = ip_address;
        event.data.insert("role".to_string(), json!(user.role));
        event.data.insert(
            "required_roles".to_string(),
            json!(required_roles.iter().map(|r| r.as_str()).collect::<Vec<_>>()),
        );

        self.record(event).await;
    }
}
