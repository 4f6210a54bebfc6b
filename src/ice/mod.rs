//! ICE (Interactive Connectivity Establishment) configuration.
//!
//! Provides the STUN/TURN server descriptor and helpers for building one.

pub mod url;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use webrtc::ice_transport::ice_server::RTCIceServer;

use crate::error::{ConfigError, Result};

pub use self::url::{IceScheme, IceTransport, IceUrl};

/// ICE server configuration
///
/// Serializes to the browser `RTCIceServer` dictionary shape, so the same
/// JSON can be handed to a JavaScript client unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    #[serde(serialize_with = "serialize_urls", deserialize_with = "deserialize_urls")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    /// Create a STUN-only server config
    pub fn stun(url: &str) -> Self {
        Self {
            urls: vec![url.to_string()],
            username: None,
            credential: None,
        }
    }

    /// Create a TURN server config with credentials
    pub fn turn(url: &str, username: &str, credential: &str) -> Self {
        Self {
            urls: vec![url.to_string()],
            username: Some(username.to_string()),
            credential: Some(credential.to_string()),
        }
    }

    /// Create an entry that lists several URLs sharing one set of credentials
    pub fn with_urls(urls: Vec<String>, username: Option<String>, credential: Option<String>) -> Self {
        Self {
            urls,
            username,
            credential,
        }
    }

    /// Parse every URL of this entry
    pub fn parsed_urls(&self) -> Result<Vec<IceUrl>> {
        self.urls.iter().map(|u| IceUrl::parse(u)).collect()
    }

    /// True when any URL is turn: or turns:
    pub fn requires_credentials(&self) -> bool {
        self.urls
            .iter()
            .filter_map(|u| IceUrl::parse(u).ok())
            .any(|u| u.scheme.is_relay())
    }

    /// True when every URL is turn: or turns:
    pub fn is_relay(&self) -> bool {
        !self.urls.is_empty()
            && self
                .urls
                .iter()
                .all(|u| IceUrl::parse(u).map(|u| u.scheme.is_relay()).unwrap_or(false))
    }

    /// Check URL syntax and the credential invariant.
    pub fn validate(&self) -> Result<()> {
        if self.urls.is_empty() {
            return Err(ConfigError::EmptyUrls);
        }

        let parsed = self.parsed_urls()?;
        let has_creds = is_present(&self.username) && is_present(&self.credential);

        for url in &parsed {
            if url.scheme.is_relay() && !has_creds {
                return Err(ConfigError::MissingCredentials(url.to_string()));
            }
        }

        if !parsed.iter().any(|u| u.scheme.is_relay())
            && (is_present(&self.username) || is_present(&self.credential))
        {
            log::debug!("ICE: credentials on STUN-only entry {:?} are ignored", self.urls);
        }

        Ok(())
    }

    /// Convert to webrtc-rs RTCIceServer
    pub fn to_rtc_ice_server(&self) -> RTCIceServer {
        RTCIceServer {
            urls: self.urls.clone(),
            username: self.username.clone().unwrap_or_default(),
            credential: self.credential.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.is_empty()).unwrap_or(false)
}

/// Create a STUN server config
pub fn stun_server(url: &str) -> IceServerConfig {
    IceServerConfig::stun(url)
}

/// Create a TURN server config with credentials
pub fn turn_server(url: &str, username: &str, credential: &str) -> IceServerConfig {
    IceServerConfig::turn(url, username, credential)
}

// `urls` is a string or a sequence of strings in the RTCIceServer dictionary
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_urls<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(url) => vec![url],
        OneOrMany::Many(urls) => urls,
    })
}

#[allow(clippy::ptr_arg)]
fn serialize_urls<S>(urls: &Vec<String>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match urls.as_slice() {
        [single] => serializer.serialize_str(single),
        many => many.serialize(serializer),
    }
}
