//! Error type for loading and validating ICE configurations.

use thiserror::Error;

/// Errors that can occur while building or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid ICE URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("ICE server entry has no URLs")]
    EmptyUrls,

    #[error("TURN server {0} requires a non-empty username and credential")]
    MissingCredentials(String),

    #[error("Configuration contains no ICE servers")]
    EmptyServerList,

    #[error("Relay transport policy requires at least one TURN server")]
    NoRelayServers,

    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("TURN {0} must not be empty")]
    EmptyCredential(&'static str),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create peer connection: {0}")]
    PeerConnection(String),
}

impl ConfigError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
