//! Peer connection construction.
//!
//! Wraps the webrtc-rs API setup so a validated `ConnectionConfig` can be
//! turned into an RTCPeerConnection in one call.

use std::sync::Arc;

use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::api::API;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;

use crate::config::ConnectionConfig;
use crate::error::{ConfigError, Result};

/// Build a webrtc-rs API with the default codecs and interceptors.
pub fn build_api() -> Result<API> {
    let mut media_engine = MediaEngine::default();
    media_engine
        .register_default_codecs()
        .map_err(|e| ConfigError::PeerConnection(format!("Failed to register codecs: {}", e)))?;

    let mut registry = Registry::new();
    registry = register_default_interceptors(registry, &mut media_engine).map_err(|e| {
        ConfigError::PeerConnection(format!("Failed to register interceptors: {}", e))
    })?;

    Ok(APIBuilder::new()
        .with_media_engine(media_engine)
        .with_interceptor_registry(registry)
        .build())
}

/// Create a peer connection from a configuration.
///
/// The configuration is validated first so a missing TURN credential is
/// reported by name instead of as a generic webrtc-rs error.
pub async fn new_peer_connection(
    api: &API,
    config: &ConnectionConfig,
) -> Result<Arc<RTCPeerConnection>> {
    config.validate()?;

    log::info!(
        "WebRTC: creating peer connection with {} ICE server(s), policy {:?}",
        config.ice_servers.len(),
        config.policy()
    );

    let peer_connection = api
        .new_peer_connection(config.to_rtc_configuration())
        .await
        .map_err(|e| ConfigError::PeerConnection(e.to_string()))?;

    Ok(Arc::new(peer_connection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ice::stun_server;

    #[tokio::test]
    async fn test_peer_connection_from_config() {
        let api = build_api().unwrap();
        let config = ConnectionConfig::new(vec![stun_server("stun:stun.relay.metered.ca:80")]);

        let pc = new_peer_connection(&api, &config).await.unwrap();
        assert_eq!(pc.get_configuration().ice_servers.len(), 1);
        pc.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_webrtc() {
        let api = build_api().unwrap();
        match new_peer_connection(&api, &ConnectionConfig::default()).await {
            Err(ConfigError::EmptyServerList) => {}
            Err(e) => panic!("Expected EmptyServerList, got {}", e),
            Ok(_) => panic!("Expected an error for an empty server list"),
        }
    }
}
