use std::collections::HashMap;

/// Trait for providing environment variable access
///
/// Allows dependency injection of environment variable sources, so tests can
/// supply values without mutating shared global environment state.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production environment provider that reads from the system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test environment provider with configurable variables
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_environment_provider() {
        let provider = MockEnvironment::empty()
            .with_var("TEST_KEY", "test_value")
            .with_vars(&[("KEY1", "value1"), ("KEY2", "value2")]);

        assert_eq!(provider.get_var("TEST_KEY"), Some("test_value".to_string()));
        assert_eq!(provider.get_var("KEY1"), Some("value1".to_string()));
        assert_eq!(provider.get_var("KEY2"), Some("value2".to_string()));
        assert_eq!(provider.get_var("NON_EXISTENT"), None);
    }

    #[test]
    fn test_mock_environment_empty() {
        let provider = MockEnvironment::empty();

        assert_eq!(provider.get_var("ANY_KEY"), None);
    }
}
