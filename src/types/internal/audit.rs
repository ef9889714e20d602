use std::collections::HashMap;
use std::fmt;

/// Actions recorded in the audit trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditAction {
    LoginSuccess,
    LoginFailure,
    PasswordChanged,
    PasswordResetRequested,
    PasswordResetRedeemed,
    AccessDenied,
}

impl AuditAction {
    /// String representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailure => "login_failure",
            Self::PasswordChanged => "password_changed",
            Self::PasswordResetRequested => "password_reset_requested",
            Self::PasswordResetRedeemed => "password_reset_redeemed",
            Self::AccessDenied => "access_denied",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit event structure for building and storing audit records
///
/// `actor_id` is the user who performed (or attempted) the action; anonymous
/// actions such as failed logins are recorded with no actor.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub actor_id: Option<String>,
    pub resource: String,
    pub ip_address: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    /// Create a new audit event for the given action and resource
    pub fn new(action: AuditAction, resource: impl Into<String>) -> Self {
        Self {
            action,
            actor_id: None,
            resource: resource.into(),
            ip_address: None,
            data: HashMap::new(),
        }
    }
}
