//! Error types for Quotesmith

use thiserror::Error;

/// Errors for bot operation, rendering and delivery
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error in '{method}': {description}")]
    Api {
        /// Bot API method that failed (e.g. "sendMessage").
        method: String,
        /// Error description returned by Telegram, or a transport note.
        description: String,
    },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Telegram API rejection for a given method.
    pub fn api(method: impl Into<String>, description: impl Into<String>) -> Self {
        Error::Api {
            method: method.into(),
            description: description.into(),
        }
    }

    /// Browser-side failure (launch, navigation, capture).
    pub fn browser(message: impl std::fmt::Display) -> Self {
        Error::Browser(message.to_string())
    }

    /// Render pipeline failure outside the browser itself.
    pub fn render(message: impl std::fmt::Display) -> Self {
        Error::Render(message.to_string())
    }
}

/// Result type alias for Quotesmith operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("BOT_TOKEN is not set".to_string());
        assert_eq!(format!("{}", err), "Configuration error: BOT_TOKEN is not set");
    }

    #[test]
    fn test_error_display_api() {
        let err = Error::api("sendMessage", "chat not found");
        assert_eq!(
            format!("{}", err),
            "Telegram API error in 'sendMessage': chat not found"
        );
    }

    #[test]
    fn test_error_display_browser() {
        let err = Error::browser("no chrome executable");
        assert_eq!(format!("{}", err), "Browser error: no chrome executable");
    }

    #[test]
    fn test_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
