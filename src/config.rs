//! Runtime configuration
//!
//! Everything is sourced from the environment, matching how the bot is
//! deployed (container with `BOT_TOKEN` and `PORT` injected). No config
//! files, no reload.

use crate::error::{Error, Result};

/// Default port for the health endpoint.
const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Runtime configuration for the bot process
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token (`BOT_TOKEN`).
    pub bot_token: String,
    /// Port for the HTTP health endpoint (`PORT`, default 8080).
    pub health_port: u16,
    /// Optional Chromium executable override (`CHROME_BIN`).
    pub chrome_executable: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Fails when `BOT_TOKEN` is missing or empty; everything else has a
    /// default.
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("BOT_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| Error::Config("BOT_TOKEN is not set".to_string()))?;

        let health_port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT is not a valid port number: {raw}")))?,
            Err(_) => DEFAULT_HEALTH_PORT,
        };

        let chrome_executable = std::env::var("CHROME_BIN")
            .ok()
            .filter(|path| !path.trim().is_empty());

        Ok(Self {
            bot_token,
            health_port,
            chrome_executable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_health_port() {
        assert_eq!(DEFAULT_HEALTH_PORT, 8080);
    }

    #[test]
    fn test_config_debug_redacts_nothing_but_is_constructible() {
        let config = Config {
            bot_token: "123:abc".to_string(),
            health_port: 9000,
            chrome_executable: None,
        };
        assert_eq!(config.health_port, 9000);
        assert!(config.chrome_executable.is_none());
    }
}
