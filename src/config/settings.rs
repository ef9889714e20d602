use std::fmt;

use crate::config::env_provider::EnvironmentProvider;

/// Error type for settings that are present but unusable
#[derive(Debug)]
pub enum SettingsError {
    InvalidSetting { setting_name: String, reason: String },
}

impl SettingsError {
    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { setting_name, reason } => {
                write!(f, "Invalid setting '{}': {}", setting_name, reason)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Outbound email delivery settings
///
/// Absent entirely when MAILER_API_URL is not configured, in which case
/// reset emails are written to the log instead of dispatched.
#[derive(Clone)]
pub struct MailerSettings {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
}

impl fmt::Debug for MailerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Application settings loaded once at startup
#[derive(Clone, Debug)]
pub struct AppSettings {
    pub database_url: String,
    pub audit_database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Externally reachable base URL, used to build password-reset links.
    pub public_url: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
    pub reset_token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub is_production: bool,
    pub mailer: Option<MailerSettings>,
}

impl AppSettings {
    /// Load settings from environment variables, applying defaults where
    /// the variable is unset
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SettingsError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://auth.db?mode=rwc".to_string());
        let audit_database_url = env
            .get_var("AUDIT_DATABASE_URL")
            .unwrap_or_else(|| "sqlite://audit.db?mode=rwc".to_string());
        let server_host = env
            .get_var("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = Self::parse_number(env, "PORT", 3000u16)?;
        let public_url = env
            .get_var("PUBLIC_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let access_token_ttl_hours = Self::parse_number(env, "ACCESS_TOKEN_TTL_HOURS", 24i64)?;
        let refresh_token_ttl_days = Self::parse_number(env, "REFRESH_TOKEN_TTL_DAYS", 7i64)?;
        let reset_token_ttl_minutes = Self::parse_number(env, "RESET_TOKEN_TTL_MINUTES", 60i64)?;
        let bcrypt_cost = Self::parse_number(env, "BCRYPT_COST", 12u32)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(SettingsError::invalid(
                "BCRYPT_COST",
                "must be between 4 and 31",
            ));
        }

        let is_production = env
            .get_var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let mailer = match env.get_var("MAILER_API_URL") {
            Some(api_url) => Some(MailerSettings {
                api_url,
                api_key: env.get_var("MAILER_API_KEY").unwrap_or_default(),
                from_address: env
                    .get_var("MAILER_FROM_ADDRESS")
                    .unwrap_or_else(|| "no-reply@localhost".to_string()),
            }),
            None => None,
        };

        Ok(Self {
            database_url,
            audit_database_url,
            server_host,
            server_port,
            public_url,
            access_token_ttl_hours,
            refresh_token_ttl_days,
            reset_token_ttl_minutes,
            bcrypt_cost,
            is_production,
            mailer,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_hours * 3600
    }

    pub fn refresh_token_ttl_seconds(&self) -> i64 {
        self.refresh_token_ttl_days * 86400
    }

    pub fn reset_token_ttl_seconds(&self) -> i64 {
        self.reset_token_ttl_minutes * 60
    }

    fn parse_number<T: std::str::FromStr>(
        env: &dyn EnvironmentProvider,
        name: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        match env.get_var(name) {
            Some(raw) => raw.parse().map_err(|_| {
                SettingsError::invalid(name, format!("'{}' is not a valid number", raw))
            }),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_provider::MockEnvironment;

    #[test]
    fn test_settings_defaults() {
        let env = MockEnvironment::empty();

        let settings = AppSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url, "sqlite://auth.db?mode=rwc");
        assert_eq!(settings.audit_database_url, "sqlite://audit.db?mode=rwc");
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.public_url, "http://localhost:3000");
        assert_eq!(settings.access_token_ttl_hours, 24);
        assert_eq!(settings.refresh_token_ttl_days, 7);
        assert_eq!(settings.reset_token_ttl_minutes, 60);
        assert_eq!(settings.bcrypt_cost, 12);
        assert!(!settings.is_production);
        assert!(settings.mailer.is_none());
    }

    #[test]
    fn test_settings_overrides() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PUBLIC_URL", "https://cms.example.com/"),
            ("ACCESS_TOKEN_TTL_HOURS", "1"),
            ("RESET_TOKEN_TTL_MINUTES", "15"),
            ("APP_ENV", "production"),
        ]);

        let settings = AppSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url, "sqlite://test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.public_url, "https://cms.example.com");
        assert_eq!(settings.access_token_ttl_seconds(), 3600);
        assert_eq!(settings.reset_token_ttl_seconds(), 900);
        assert!(settings.is_production);
    }

    #[test]
    fn test_settings_invalid_port() {
        let env = MockEnvironment::empty().with_var("PORT", "not_a_number");

        let result = AppSettings::from_env_provider(&env);

        match result.unwrap_err() {
            SettingsError::InvalidSetting { setting_name, .. } => {
                assert_eq!(setting_name, "PORT");
            }
        }
    }

    #[test]
    fn test_settings_bcrypt_cost_out_of_range() {
        let env = MockEnvironment::empty().with_var("BCRYPT_COST", "2");

        let result = AppSettings::from_env_provider(&env);

        assert!(result.is_err());
    }

    #[test]
    fn test_settings_mailer_block() {
        let env = MockEnvironment::empty().with_vars(&[
            ("MAILER_API_URL", "https://mail.example.com/send"),
            ("MAILER_API_KEY", "key-123"),
            ("MAILER_FROM_ADDRESS", "admin@example.com"),
        ]);

        let settings = AppSettings::from_env_provider(&env).unwrap();

        let mailer = settings.mailer.unwrap();
        assert_eq!(mailer.api_url, "https://mail.example.com/send");
        assert_eq!(mailer.api_key, "key-123");
        assert_eq!(mailer.from_address, "admin@example.com");
    }
}
