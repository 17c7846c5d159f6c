//! Runtime configuration resolved once at process start.

use crate::l10n::Locale;
use crate::logging::{default_log_level, normalize_level};
use chrono::Duration;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "LATER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "LATER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LATER_LOG_DIR";
pub const ENV_LOCALE: &str = "LATER_LOCALE";
pub const ENV_SESSION_TTL_SECS: &str = "LATER_SESSION_TTL_SECS";
pub const ENV_REQUIRE_EMAIL_CONFIRMATION: &str = "LATER_REQUIRE_EMAIL_CONFIRMATION";

const DEFAULT_DB_FILE_NAME: &str = "later.sqlite3";
const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}=`{}`: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub locale: Locale,
    pub session_ttl: Duration,
    /// Password sign-in requires a confirmed email when set.
    pub require_email_confirmation: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            locale: Locale::default(),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            require_email_confirmation: false,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key source; blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|_| ConfigError {
                key: ENV_LOG_LEVEL,
                value: level.clone(),
                reason: "expected trace|debug|info|warn|error",
            })?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError {
                    key: ENV_LOG_DIR,
                    value: dir.display().to_string(),
                    reason: "must be an absolute path",
                });
            }
            config.log_dir = Some(dir);
        }
        if let Some(tag) = read(ENV_LOCALE) {
            config.locale = Locale::from_tag(&tag).map_err(|_| ConfigError {
                key: ENV_LOCALE,
                value: tag.clone(),
                reason: "expected en|de",
            })?;
        }
        if let Some(raw) = read(ENV_SESSION_TTL_SECS) {
            let secs = raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError {
                    key: ENV_SESSION_TTL_SECS,
                    value: raw.clone(),
                    reason: "expected a positive number of seconds",
                })?;
            config.session_ttl = Duration::seconds(secs);
        }
        if let Some(raw) = read(ENV_REQUIRE_EMAIL_CONFIRMATION) {
            config.require_email_confirmation = parse_flag(&raw).ok_or_else(|| ConfigError {
                key: ENV_REQUIRE_EMAIL_CONFIRMATION,
                value: raw.clone(),
                reason: "expected true|false",
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_LOCALE, ENV_REQUIRE_EMAIL_CONFIRMATION, ENV_SESSION_TTL_SECS};
    use crate::l10n::Locale;
    use chrono::Duration;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CoreConfig, super::ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(config_from(&[]).unwrap(), CoreConfig::default());
    }

    #[test]
    fn values_are_parsed() {
        let config = config_from(&[
            (ENV_LOCALE, "de-DE"),
            (ENV_SESSION_TTL_SECS, "120"),
            (ENV_REQUIRE_EMAIL_CONFIRMATION, "yes"),
        ])
        .unwrap();
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.session_ttl, Duration::seconds(120));
        assert!(config.require_email_confirmation);
    }

    #[test]
    fn invalid_values_name_the_offending_key() {
        let err = config_from(&[(ENV_SESSION_TTL_SECS, "-5")]).unwrap_err();
        assert_eq!(err.key, ENV_SESSION_TTL_SECS);
        assert_eq!(config_from(&[(ENV_LOCALE, "fr")]).unwrap_err().key, ENV_LOCALE);
    }
}
