use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::AppSettings;
use crate::errors::InternalError;

/// Connections to the auth and audit databases
///
/// Audit events live in their own database so the audit trail survives
/// restores of the auth database and can be retained on a separate schedule.
pub struct DatabaseConnections {
    pub auth: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to both databases
    ///
    /// Does NOT run migrations - call migrate() separately.
    pub async fn init(settings: &AppSettings) -> Result<Self, InternalError> {
        let auth = Database::connect(&settings.database_url)
            .await
            .map_err(|e| InternalError::database("connect_database", e))?;
        tracing::debug!("Connected to auth database: {}", settings.database_url);

        let audit = Database::connect(&settings.audit_database_url)
            .await
            .map_err(|e| InternalError::database("connect_audit_database", e))?;
        tracing::debug!("Connected to audit database: {}", settings.audit_database_url);

        Ok(Self { auth, audit })
    }

    /// Run all pending migrations on both databases
    pub async fn migrate(&self) -> Result<(), InternalError> {
        migrate_auth_database(&self.auth).await?;
        migrate_audit_database(&self.audit).await?;

        Ok(())
    }
}

/// Run migrations on the auth database
pub async fn migrate_auth_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    AuthMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Auth database migrations completed");

    Ok(())
}

/// Run migrations on the audit database
pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|e| InternalError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
