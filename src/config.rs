use std::path::PathBuf;

use crate::gateway::DEFAULT_API_URL;

const DEFAULT_USERS_FILE: &str = "users.json";

/// Process configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub bot_token: String,
    pub users_file: PathBuf,
    pub api_url: String,
    /// Port of the health endpoint; disabled when unset.
    pub port: Option<u16>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid PORT value {0:?} (must be an integer between 0 and 65535)")]
    InvalidPort(String),
}

impl Config {
    /// Expects `BOT_TOKEN`; `USERS_FILE`, `HOYOLAB_API_URL` and `PORT` are
    /// optional.
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = var("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        let port = match var("PORT") {
            Some(port) => Some(
                port.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(port))?,
            ),
            None => None,
        };

        Ok(Self {
            bot_token,
            users_file: var("USERS_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_USERS_FILE), PathBuf::from),
            api_url: var("HOYOLAB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[("BOT_TOKEN", "123:abc")]).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.users_file, PathBuf::from("users.json"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.port, None);
    }

    #[test]
    fn missing_token() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::MissingEnvVar("BOT_TOKEN")
        );
        assert_eq!(
            config_from(&[("BOT_TOKEN", "  ")]).unwrap_err(),
            ConfigError::MissingEnvVar("BOT_TOKEN")
        );
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("USERS_FILE", "/data/users.json"),
            ("HOYOLAB_API_URL", "http://localhost:9000"),
            ("PORT", "8000"),
        ])
        .unwrap();

        assert_eq!(config.users_file, PathBuf::from("/data/users.json"));
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.port, Some(8000));
    }

    #[test]
    fn invalid_port() {
        assert_eq!(
            config_from(&[("BOT_TOKEN", "123:abc"), ("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".to_string())
        );
    }
}
