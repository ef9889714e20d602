// Common test utilities for integration tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use cms_admin_backend::app_data::AppData;
use cms_admin_backend::audit::AuditLogger;
use cms_admin_backend::auth::Authenticator;
use cms_admin_backend::config::database::DatabaseConnections;
use cms_admin_backend::config::{AppSettings, SecretManager};
use cms_admin_backend::coordinators::AuthCoordinator;
use cms_admin_backend::mailer::{Mailer, MailerError, PasswordResetEmail};
use cms_admin_backend::services::{PasswordHasher, TokenConfig, TokenService};
use cms_admin_backend::stores::{AuditStore, ResetTokenStore, UserStore};
use cms_admin_backend::types::db::user;
use cms_admin_backend::types::db::user::Role;

// Minimum bcrypt cost keeps the test suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Creates a test auth database with migrations applied
pub async fn setup_test_auth_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    AuthMigrator::up(&db, None)
        .await
        .expect("Failed to run auth migrations");

    db
}

/// Creates a test audit database with migrations applied
pub async fn setup_test_audit_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");

    db
}

/// A sent reset email captured for assertions
#[derive(Clone)]
pub struct SentEmail {
    pub to: String,
    pub reset_url: String,
}

impl SentEmail {
    /// Extract the plaintext token from the reset link
    pub fn token(&self) -> String {
        self.reset_url
            .split("code=")
            .nth(1)
            .expect("reset URL carries no code parameter")
            .to_string()
    }
}

/// Mailer double that records deliveries instead of sending them
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentEmail>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, email: &PasswordResetEmail) -> Result<(), MailerError> {
        if self.fail {
            return Err(MailerError::Delivery("simulated outage".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: email.to.clone(),
            reset_url: email.reset_url.clone(),
        });
        Ok(())
    }
}

fn test_settings() -> AppSettings {
    AppSettings {
        database_url: "sqlite::memory:".to_string(),
        audit_database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        public_url: "http://localhost:3000".to_string(),
        access_token_ttl_hours: 24,
        refresh_token_ttl_days: 7,
        reset_token_ttl_minutes: 60,
        bcrypt_cost: TEST_BCRYPT_COST,
        is_production: false,
        mailer: None,
    }
}

/// Fully wired application state over in-memory databases
pub struct TestHarness {
    pub app_data: Arc<AppData>,
    pub coordinator: Arc<AuthCoordinator>,
    pub authenticator: Arc<Authenticator>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_mailer(Arc::new(RecordingMailer::new())).await
    }

    pub async fn with_failing_mailer() -> Self {
        Self::with_mailer(Arc::new(RecordingMailer::failing())).await
    }

    async fn with_mailer(mailer: Arc<RecordingMailer>) -> Self {
        let connections = DatabaseConnections {
            auth: setup_test_auth_db().await,
            audit: setup_test_audit_db().await,
        };
        let settings = test_settings();
        let secret_manager = Arc::new(SecretManager::from_values(
            "test-access-secret-minimum-32-characters",
            "test-refresh-secret-minimum-32-chars-ok",
            "test-reset-secret-minimum-32-chars-okay",
        ));

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

        let app_data = Arc::new(AppData {
            connections,
            settings,
            secret_manager,
            audit_store,
            audit_logger,
            user_store: user_store.clone(),
            reset_token_store,
            token_service: token_service.clone(),
            password_hasher: PasswordHasher::new(TEST_BCRYPT_COST),
            mailer: mailer.clone(),
        });

        let coordinator = Arc::new(AuthCoordinator::new(app_data.clone()));
        let authenticator = Arc::new(Authenticator::new(token_service, user_store));

        Self {
            app_data,
            coordinator,
            authenticator,
            mailer,
        }
    }

    /// Insert a user with the given credentials and role
    pub async fn seed_user(&self, email: &str, password: &str, role: Role) -> user::Model {
        let hash = self
            .app_data
            .password_hasher
            .hash(password)
            .expect("Failed to hash test password");

        self.app_data
            .user_store
            .create_user(email, &hash, "Test User", role)
            .await
            .expect("Failed to seed test user")
    }
}
