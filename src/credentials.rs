//! TURN credentials supplied at runtime.
//!
//! The relay username and credential are long-lived secrets, so they are read
//! from the environment instead of being compiled into the binary.

use std::fmt;

use crate::error::{ConfigError, Result};

/// Environment variable holding the TURN username
pub const USERNAME_ENV: &str = "METERED_TURN_USERNAME";
/// Environment variable holding the TURN credential
pub const CREDENTIAL_ENV: &str = "METERED_TURN_CREDENTIAL";
/// Generic names, consulted when the Metered-specific ones are unset
pub const TURN_USERNAME_ENV: &str = "TURN_USERNAME";
pub const TURN_PASSWORD_ENV: &str = "TURN_PASSWORD";

/// Username/credential pair shared by every TURN entry of a preset
#[derive(Clone, PartialEq, Eq)]
pub struct TurnCredentials {
    username: String,
    credential: String,
}

impl TurnCredentials {
    pub fn new(username: &str, credential: &str) -> Result<Self> {
        if username.is_empty() {
            return Err(ConfigError::EmptyCredential("username"));
        }
        if credential.is_empty() {
            return Err(ConfigError::EmptyCredential("credential"));
        }
        Ok(Self {
            username: username.to_string(),
            credential: credential.to_string(),
        })
    }

    /// Read credentials from METERED_TURN_USERNAME / METERED_TURN_CREDENTIAL,
    /// falling back to TURN_USERNAME / TURN_PASSWORD
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup(USERNAME_ENV)
            .or_else(|| lookup(TURN_USERNAME_ENV))
            .ok_or(ConfigError::MissingEnv(USERNAME_ENV))?;
        let credential = lookup(CREDENTIAL_ENV)
            .or_else(|| lookup(TURN_PASSWORD_ENV))
            .ok_or(ConfigError::MissingEnv(CREDENTIAL_ENV))?;
        Self::new(username.trim(), credential.trim())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

// Never print the secret itself
impl fmt::Debug for TurnCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnCredentials")
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .finish()
    }
}
