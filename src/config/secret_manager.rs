use std::fmt;

use crate::config::env_provider::EnvironmentProvider;

const MIN_SECRET_LENGTH: usize = 32;

// Fallback values for local development only. Refused outside of dev.
const DEV_ACCESS_SECRET: &str = "dev-only-access-token-secret-do-not-use-in-prod";
const DEV_REFRESH_SECRET: &str = "dev-only-refresh-token-secret-do-not-use-in-prod";
const DEV_RESET_SECRET: &str = "dev-only-reset-token-secret-do-not-use-in-prod";

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// Holds the three signing keys of the auth subsystem. Access and refresh
/// tokens are signed with disjoint secrets so one class of token can never
/// be presented as the other; the reset secret keys the HMAC applied to
/// password-reset tokens before they are stored.
pub struct SecretManager {
    access_token_secret: String,
    refresh_token_secret: String,
    reset_token_secret: String,
}

impl SecretManager {
    /// Initialize the SecretManager by loading and validating all secrets
    ///
    /// In production every secret must be present and at least 32 characters.
    /// Outside production a missing secret falls back to a well-known dev
    /// value and logs a warning.
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn init(
        env: &dyn EnvironmentProvider,
        is_production: bool,
    ) -> Result<Self, SecretError> {
        let access_token_secret =
            Self::load_secret(env, "ACCESS_TOKEN_SECRET", DEV_ACCESS_SECRET, is_production)?;
        let refresh_token_secret =
            Self::load_secret(env, "REFRESH_TOKEN_SECRET", DEV_REFRESH_SECRET, is_production)?;
        let reset_token_secret =
            Self::load_secret(env, "RESET_TOKEN_SECRET", DEV_RESET_SECRET, is_production)?;

        Ok(Self {
            access_token_secret,
            refresh_token_secret,
            reset_token_secret,
        })
    }

    /// Build a SecretManager from explicit values, bypassing the environment
    ///
    /// Intended for test harnesses that need deterministic keys.
    pub fn from_values(
        access_token_secret: &str,
        refresh_token_secret: &str,
        reset_token_secret: &str,
    ) -> Self {
        Self {
            access_token_secret: access_token_secret.to_string(),
            refresh_token_secret: refresh_token_secret.to_string(),
            reset_token_secret: reset_token_secret.to_string(),
        }
    }

    /// Get the access token signing secret
    pub fn access_token_secret(&self) -> &str {
        &self.access_token_secret
    }

    /// Get the refresh token signing secret
    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }

    /// Get the reset token HMAC secret
    pub fn reset_token_secret(&self) -> &str {
        &self.reset_token_secret
    }

    fn load_secret(
        env: &dyn EnvironmentProvider,
        name: &str,
        dev_default: &str,
        is_production: bool,
    ) -> Result<String, SecretError> {
        let value = match env.get_var(name) {
            Some(v) => v,
            None if is_production => return Err(SecretError::missing(name)),
            None => {
                tracing::warn!(
                    secret = name,
                    "secret not set, falling back to insecure development default"
                );
                dev_default.to_string()
            }
        };

        if value.len() < MIN_SECRET_LENGTH {
            return Err(SecretError::invalid_length(
                name,
                MIN_SECRET_LENGTH,
                value.len(),
            ));
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("reset_token_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_provider::MockEnvironment;

    const VALID_ACCESS: &str = "access-secret-value-with-at-least-32-chars";
    const VALID_REFRESH: &str = "refresh-secret-value-with-at-least-32-chars";
    const VALID_RESET: &str = "reset-secret-value-with-at-least-32-chars";

    fn full_environment() -> MockEnvironment {
        MockEnvironment::empty().with_vars(&[
            ("ACCESS_TOKEN_SECRET", VALID_ACCESS),
            ("REFRESH_TOKEN_SECRET", VALID_REFRESH),
            ("RESET_TOKEN_SECRET", VALID_RESET),
        ])
    }

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let env = full_environment();

        let manager = SecretManager::init(&env, true).unwrap();

        assert_eq!(manager.access_token_secret(), VALID_ACCESS);
        assert_eq!(manager.refresh_token_secret(), VALID_REFRESH);
        assert_eq!(manager.reset_token_secret(), VALID_RESET);
    }

    #[test]
    fn test_error_when_secret_missing_in_production() {
        let env = MockEnvironment::empty().with_vars(&[
            ("ACCESS_TOKEN_SECRET", VALID_ACCESS),
            ("RESET_TOKEN_SECRET", VALID_RESET),
        ]);

        let err = SecretManager::init(&env, true).unwrap_err();
        match err {
            SecretError::Missing { secret_name } => {
                assert_eq!(secret_name, "REFRESH_TOKEN_SECRET");
            }
            _ => panic!("Expected Missing error"),
        }
    }

    #[test]
    fn test_dev_fallback_when_secret_missing_outside_production() {
        let env = MockEnvironment::empty();

        let manager = SecretManager::init(&env, false).unwrap();

        assert_eq!(manager.access_token_secret(), DEV_ACCESS_SECRET);
        assert_eq!(manager.refresh_token_secret(), DEV_REFRESH_SECRET);
        assert_eq!(manager.reset_token_secret(), DEV_RESET_SECRET);
    }

    #[test]
    fn test_error_when_secret_too_short() {
        let env = MockEnvironment::empty().with_vars(&[
            ("ACCESS_TOKEN_SECRET", "short"),
            ("REFRESH_TOKEN_SECRET", VALID_REFRESH),
            ("RESET_TOKEN_SECRET", VALID_RESET),
        ]);

        let err = SecretManager::init(&env, true).unwrap_err();
        match err {
            SecretError::InvalidLength { secret_name, expected, actual } => {
                assert_eq!(secret_name, "ACCESS_TOKEN_SECRET");
                assert_eq!(expected, 32);
                assert_eq!(actual, 5);
            }
            _ => panic!("Expected InvalidLength error"),
        }
    }

    #[test]
    fn test_short_secret_rejected_even_outside_production() {
        let env = MockEnvironment::empty().with_vars(&[
            ("ACCESS_TOKEN_SECRET", VALID_ACCESS),
            ("REFRESH_TOKEN_SECRET", VALID_REFRESH),
            ("RESET_TOKEN_SECRET", "tiny"),
        ]);

        let result = SecretManager::init(&env, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let env = full_environment();
        let manager = SecretManager::init(&env, true).unwrap();

        let debug_output = format!("{:?}", manager);

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains(VALID_ACCESS));
        assert!(!debug_output.contains(VALID_REFRESH));
        assert!(!debug_output.contains(VALID_RESET));
    }

    #[test]
    fn test_display_trait_shows_metadata_only() {
        let env = full_environment();
        let manager = SecretManager::init(&env, true).unwrap();

        let display_output = format!("{}", manager);

        assert!(display_output.contains("secrets_loaded: 3"));
        assert!(!display_output.contains(VALID_ACCESS));
    }
}
