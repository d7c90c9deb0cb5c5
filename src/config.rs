use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::session::RegistryConfig;
use crate::shutdown::DEFAULT_GRACE;
use crate::weather::config::{DEFAULT_BASE_URL, DEFAULT_LANG};
use crate::weather::WeatherConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Настройки процесса из переменных окружения
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
    pub weather: WeatherConfig,
    pub registry: RegistryConfig,
    pub shutdown_grace: Duration,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        // min: наименьшее допустимое число секунд
        let seconds = |var: &'static str, default: Duration, min: u64| -> Result<Duration, ConfigError> {
            match lookup(var) {
                Some(value) => match value.trim().parse::<u64>() {
                    Ok(secs) if secs >= min => Ok(Duration::from_secs(secs)),
                    _ => Err(ConfigError::Invalid { var, value }),
                },
                None => Ok(default),
            }
        };

        let mut weather = WeatherConfig::new(required("WEATHER_API_KEY")?);
        weather.base_url = lookup("WEATHER_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        weather.lang = lookup("WEATHER_LANG").unwrap_or_else(|| DEFAULT_LANG.to_string());

        let defaults = RegistryConfig::default();
        let queue_capacity = match lookup("SESSION_QUEUE_CAPACITY") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "SESSION_QUEUE_CAPACITY",
                        value,
                    })
                }
            },
            None => defaults.queue_capacity,
        };

        Ok(Self {
            bot_token: required("TELOXIDE_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            weather,
            registry: RegistryConfig {
                idle_timeout: seconds("SESSION_IDLE_TIMEOUT_SECS", defaults.idle_timeout, 1)?,
                queue_capacity,
            },
            shutdown_grace: seconds("SHUTDOWN_GRACE_SECS", DEFAULT_GRACE, 0)?,
            log_dir: lookup("LOG_DIR").filter(|dir| !dir.is_empty()).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("TELOXIDE_TOKEN", "123:abc"),
        ("DATABASE_URL", "postgres://localhost/weather"),
        ("WEATHER_API_KEY", "key"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let config = Config::from_lookup(env(&REQUIRED)).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.weather.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.weather.lang, "ru");
        assert_eq!(config.registry, RegistryConfig::default());
        assert_eq!(config.shutdown_grace, Duration::from_secs(5));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn missing_token_is_reported() {
        let err = Config::from_lookup(env(&REQUIRED[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TELOXIDE_TOKEN"));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("SESSION_IDLE_TIMEOUT_SECS", "120"),
            ("SESSION_QUEUE_CAPACITY", "8"),
            ("SHUTDOWN_GRACE_SECS", " 2 "),
            ("WEATHER_LANG", "en"),
            ("LOG_DIR", "/var/log/weather-bot"),
        ]);
        let config = Config::from_lookup(env(&vars)).unwrap();

        assert_eq!(config.registry.idle_timeout, Duration::from_secs(120));
        assert_eq!(config.registry.queue_capacity, 8);
        assert_eq!(config.shutdown_grace, Duration::from_secs(2));
        assert_eq!(config.weather.lang, "en");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/weather-bot")));
    }

    #[test]
    fn zero_queue_capacity_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION_QUEUE_CAPACITY", "0"));

        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SESSION_QUEUE_CAPACITY", .. }));
    }

    #[test]
    fn garbage_timeout_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION_IDLE_TIMEOUT_SECS", "soon"));

        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "SESSION_IDLE_TIMEOUT_SECS",
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn zero_idle_timeout_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION_IDLE_TIMEOUT_SECS", "0"));

        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SESSION_IDLE_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn zero_grace_is_allowed() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SHUTDOWN_GRACE_SECS", "0"));

        let config = Config::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.shutdown_grace, Duration::ZERO);
    }
}
