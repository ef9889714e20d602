pub mod database;
pub mod env_provider;
pub mod logging;
pub mod secret_manager;
pub mod settings;

pub use database::DatabaseConnections;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use logging::init_logging;
pub use secret_manager::{SecretError, SecretManager};
pub use settings::{AppSettings, MailerSettings, SettingsError};

#[cfg(test)]
pub use env_provider::MockEnvironment;
