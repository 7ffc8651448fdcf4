use crate::errors::ConfigError;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_STORE_PATH: &str = "authstore.json";
pub const DEFAULT_SPLASH_MS: u64 = 2200;

/// Runtime settings for the store and the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Location of the on-device key-value file
    pub store_path: PathBuf,
    /// Remove the persisted session keys on logout.
    ///
    /// When off, a logged-out session comes back on the next startup.
    pub clear_on_logout: bool,
    /// Mirror the user collection into the key-value store and only
    /// restore sessions that belong to a known user.
    pub persist_users: bool,
    pub splash: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            clear_on_logout: true,
            persist_users: false,
            splash: Duration::from_millis(DEFAULT_SPLASH_MS),
        }
    }
}

impl AuthConfig {
    /// Read settings from the process environment (call `dotenvy::dotenv()` first
    /// to pick up a `.env` file).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_path = lookup("AUTH_STORE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let clear_on_logout = match lookup("AUTH_CLEAR_ON_LOGOUT") {
            Some(value) => parse_flag("AUTH_CLEAR_ON_LOGOUT", &value)?,
            None => defaults.clear_on_logout,
        };

        let persist_users = match lookup("AUTH_PERSIST_USERS") {
            Some(value) => parse_flag("AUTH_PERSIST_USERS", &value)?,
            None => defaults.persist_users,
        };

        let splash = match lookup("AUTH_SPLASH_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidDuration {
                    name: "AUTH_SPLASH_MS",
                    value,
                })?,
            None => defaults.splash,
        };

        Ok(Self {
            store_path,
            clear_on_logout,
            persist_users,
            splash,
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AuthConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AuthConfig::default());
        assert!(config.clear_on_logout);
        assert!(!config.persist_users);
        assert_eq!(config.splash, Duration::from_millis(2200));
    }

    #[test]
    fn reads_every_setting() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("AUTH_STORE_PATH", "/tmp/session.json"),
            ("AUTH_CLEAR_ON_LOGOUT", "No"),
            ("AUTH_PERSIST_USERS", "1"),
            ("AUTH_SPLASH_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.store_path, PathBuf::from("/tmp/session.json"));
        assert!(!config.clear_on_logout);
        assert!(config.persist_users);
        assert_eq!(config.splash, Duration::ZERO);
    }

    #[test]
    fn blank_store_path_falls_back_to_default() {
        let config = AuthConfig::from_lookup(lookup_from(&[("AUTH_STORE_PATH", "  ")])).unwrap();
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = AuthConfig::from_lookup(lookup_from(&[("AUTH_PERSIST_USERS", "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidFlag {
                name: "AUTH_PERSIST_USERS",
                ..
            }
        ));

        let err =
            AuthConfig::from_lookup(lookup_from(&[("AUTH_SPLASH_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }
}
