use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::database::DatabaseConnections;
use crate::config::{AppSettings, SecretManager};
use crate::errors::InternalError;
use crate::mailer::{HttpMailer, LogMailer, Mailer};
use crate::services::{PasswordHasher, TokenConfig, TokenService};
use crate::stores::{AuditStore, ResetTokenStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main and shared across coordinators
/// and API structs behind a single Arc.
pub struct AppData {
    pub connections: DatabaseConnections,
    pub settings: AppSettings,
    pub secret_manager: Arc<SecretManager>,
    pub audit_store: Arc<AuditStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub user_store: Arc<UserStore>,
    pub reset_token_store: Arc<ResetTokenStore>,
    pub token_service: Arc<TokenService>,
    pub password_hasher: PasswordHasher,
    pub mailer: Arc<dyn Mailer>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// Database connections should be initialized and migrated before
    /// calling this. Audit store is created first since everything else
    /// logs through it.
    pub fn init(
        connections: DatabaseConnections,
        settings: AppSettings,
        secret_manager: Arc<SecretManager>,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));

        let user_store = Arc::new(UserStore::new(connections.auth.clone()));
        let reset_token_store = Arc::new(ResetTokenStore::new(connections.auth.clone()));

        let token_service = Arc::new(TokenService::new(TokenConfig {
            access_secret: secret_manager.access_token_secret().to_string(),
            refresh_secret: secret_manager.refresh_token_secret().to_string(),
            access_ttl_seconds: settings.access_token_ttl_seconds(),
            refresh_ttl_seconds: settings.refresh_token_ttl_seconds(),
        }));

        let password_hasher = PasswordHasher::new(settings.bcrypt_cost);

        let mailer: Arc<dyn Mailer> = match &settings.mailer {
            Some(mailer_settings) => Arc::new(HttpMailer::new(mailer_settings.clone())),
            None => {
                tracing::warn!("no mailer configured, reset links will be logged instead");
                Arc::new(LogMailer)
            }
        };

        tracing::info!("AppData initialization complete");

        Ok(Self {
            connections,
            settings,
            secret_manager,
            audit_store,
            audit_logger,
            user_store,
            reset_token_store,
            token_service,
            password_hasher,
            mailer,
        })
    }
}
