//! metered-ice - STUN/TURN configuration for WebRTC peer connections
//!
//! Features:
//! - Typed ICE server descriptors with URI and credential validation
//! - Browser-compatible JSON shape (`iceServers`, `iceTransportPolicy`)
//! - Metered relay presets: default, relay-only, mobile
//! - TURN credentials read from the environment, never compiled in
//! - Conversion to webrtc-rs `RTCConfiguration` and peer connection setup

pub mod config;
pub mod credentials;
pub mod error;
pub mod ice;
pub mod metered;
pub mod peer;

pub use config::{ConnectionConfig, IceTransportPolicy};
pub use credentials::TurnCredentials;
pub use error::{ConfigError, Result};
pub use ice::{stun_server, turn_server, IceScheme, IceServerConfig, IceTransport, IceUrl};
pub use metered::Preset;
pub use peer::{build_api, new_peer_connection};
