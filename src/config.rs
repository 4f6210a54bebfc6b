//! Peer connection configuration: the ordered ICE server list plus the
//! optional transport policy, in the shape RTCPeerConnection expects.

use std::path::Path;

use serde::{Deserialize, Serialize};
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::policy::ice_transport_policy::RTCIceTransportPolicy;

use crate::error::{ConfigError, Result};
use crate::ice::IceServerConfig;

/// Restricts which ICE candidates are gathered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceTransportPolicy {
    /// Host, server-reflexive and relay candidates (browser default)
    #[default]
    All,
    /// Relay candidates only, forcing traffic through TURN
    Relay,
}

impl IceTransportPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(IceTransportPolicy::All),
            "relay" => Some(IceTransportPolicy::Relay),
            _ => None,
        }
    }

    fn to_rtc(self) -> RTCIceTransportPolicy {
        match self {
            IceTransportPolicy::All => RTCIceTransportPolicy::All,
            IceTransportPolicy::Relay => RTCIceTransportPolicy::Relay,
        }
    }
}

/// Configuration handed to the peer connection constructor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub ice_servers: Vec<IceServerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice_transport_policy: Option<IceTransportPolicy>,
}

impl ConnectionConfig {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            ice_servers,
            ice_transport_policy: None,
        }
    }

    /// Same servers, but only relay candidates will be gathered
    pub fn relay_only(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            ice_servers,
            ice_transport_policy: Some(IceTransportPolicy::Relay),
        }
    }

    pub fn with_policy(mut self, policy: IceTransportPolicy) -> Self {
        self.ice_transport_policy = Some(policy);
        self
    }

    /// Policy in effect, defaulting to `all` when unset
    pub fn policy(&self) -> IceTransportPolicy {
        self.ice_transport_policy.unwrap_or_default()
    }

    /// Validate every descriptor and the policy against the server list.
    pub fn validate(&self) -> Result<()> {
        if self.ice_servers.is_empty() {
            return Err(ConfigError::EmptyServerList);
        }

        for server in &self.ice_servers {
            server.validate()?;
        }

        if self.policy() == IceTransportPolicy::Relay
            && !self.ice_servers.iter().any(|s| s.requires_credentials())
        {
            return Err(ConfigError::NoRelayServers);
        }

        if self.policy() == IceTransportPolicy::Relay {
            let ignored = self.ice_servers.iter().filter(|s| !s.requires_credentials()).count();
            if ignored > 0 {
                log::warn!("ICE: {} STUN-only server(s) unused under relay policy", ignored);
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse without validating
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        config.validate()?;

        log::info!(
            "ICE: loaded {} server(s) from {} (policy: {:?})",
            config.ice_servers.len(),
            path.display(),
            config.policy()
        );

        Ok(config)
    }

    /// Build the webrtc-rs configuration, preserving server order
    pub fn to_rtc_configuration(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self
                .ice_servers
                .iter()
                .map(|s| s.to_rtc_ice_server())
                .collect(),
            ice_transport_policy: self.policy().to_rtc(),
            ..Default::default()
        }
    }
}
