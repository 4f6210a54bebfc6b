//! Metered relay presets.
//!
//! Protocols offered by the relay network:
//! - STUN on port 80
//! - TURN UDP on port 80
//! - TURN TCP on port 80
//! - TURN UDP on port 443
//! - TURN TLS on port 443

use crate::config::ConnectionConfig;
use crate::credentials::TurnCredentials;
use crate::error::{ConfigError, Result};
use crate::ice::IceServerConfig;

pub const STUN_URL: &str = "stun:stun.relay.metered.ca:80";
pub const TURN_UDP_80_URL: &str = "turn:standard.relay.metered.ca:80";
pub const TURN_TCP_80_URL: &str = "turn:standard.relay.metered.ca:80?transport=tcp";
pub const TURN_UDP_443_URL: &str = "turn:standard.relay.metered.ca:443";
pub const TURNS_TCP_443_URL: &str = "turns:standard.relay.metered.ca:443?transport=tcp";

/// Comma-separated URL list overriding the built-in endpoints
pub const TURN_URLS_ENV: &str = "TURN_URLS";
/// 1/true/yes/on restricts gathering to relay candidates
pub const FORCE_TURN_ENV: &str = "FORCE_TURN";

fn turn(url: &str, creds: &TurnCredentials) -> IceServerConfig {
    IceServerConfig::turn(url, creds.username(), creds.credential())
}

/// All five endpoints, STUN first
pub fn ice_servers(creds: &TurnCredentials) -> Vec<IceServerConfig> {
    vec![
        IceServerConfig::stun(STUN_URL),
        turn(TURN_UDP_80_URL, creds),
        turn(TURN_TCP_80_URL, creds),
        turn(TURN_UDP_443_URL, creds),
        turn(TURNS_TCP_443_URL, creds),
    ]
}

/// Default configuration: every endpoint, transport policy left to the client
pub fn default_config(creds: &TurnCredentials) -> ConnectionConfig {
    ConnectionConfig::new(ice_servers(creds))
}

/// Force TURN: the two UDP relays with `iceTransportPolicy: relay`
pub fn relay_only_config(creds: &TurnCredentials) -> ConnectionConfig {
    ConnectionConfig::relay_only(vec![
        turn(TURN_UDP_80_URL, creds),
        turn(TURN_UDP_443_URL, creds),
    ])
}

/// Mobile clients use the same server list as the default
pub fn mobile_config(creds: &TurnCredentials) -> ConnectionConfig {
    default_config(creds)
}

/// Split a comma-separated URL list, trimming items and dropping empty ones
pub fn parse_url_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Configuration driven by TURN_URLS, FORCE_TURN and the credential variables
pub fn from_env() -> Result<ConnectionConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a single multi-URL entry from a key lookup.
///
/// Without TURN_URLS the built-in endpoints are used. All URLs share one
/// set of credentials, STUN included.
pub fn from_lookup<F>(lookup: F) -> Result<ConnectionConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let creds = TurnCredentials::from_lookup(&lookup)?;

    let urls = match lookup(TURN_URLS_ENV) {
        Some(list) => parse_url_list(&list),
        None => ice_servers(&creds)
            .into_iter()
            .flat_map(|s| s.urls)
            .collect(),
    };
    if urls.is_empty() {
        return Err(ConfigError::EmptyUrls);
    }

    let entry = IceServerConfig::with_urls(
        urls,
        Some(creds.username().to_string()),
        Some(creds.credential().to_string()),
    );

    let force_turn = lookup(FORCE_TURN_ENV).map(|v| parse_flag(&v)).unwrap_or(false);
    let config = if force_turn {
        ConnectionConfig::relay_only(vec![entry])
    } else {
        ConnectionConfig::new(vec![entry])
    };
    config.validate()?;

    log::info!(
        "STUN/TURN configured from environment with {} URL(s), policy {:?}",
        config.ice_servers[0].urls.len(),
        config.policy()
    );
    log::debug!("URLs: {}", config.ice_servers[0].urls.join(", "));

    Ok(config)
}

/// Preset selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default,
    RelayOnly,
    Mobile,
}

impl Preset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "all" => Some(Preset::Default),
            "relay" | "relay-only" | "force-turn" => Some(Preset::RelayOnly),
            "mobile" | "react-native" => Some(Preset::Mobile),
            _ => None,
        }
    }

    pub fn build(&self, creds: &TurnCredentials) -> ConnectionConfig {
        let config = match self {
            Preset::Default => default_config(creds),
            Preset::RelayOnly => relay_only_config(creds),
            Preset::Mobile => mobile_config(creds),
        };
        log::info!("Metered TURN configuration loaded ({:?})", self);
        log::info!("Available ICE servers: {}", config.ice_servers.len());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IceTransportPolicy;
    use crate::ice::{IceScheme, IceTransport, IceUrl};

    fn creds() -> TurnCredentials {
        TurnCredentials::new("relay-user", "relay-secret").unwrap()
    }

    fn single_url(server: &IceServerConfig) -> IceUrl {
        assert_eq!(server.urls.len(), 1);
        IceUrl::parse(&server.urls[0]).unwrap()
    }

    #[test]
    fn test_default_order() {
        let config = default_config(&creds());
        assert!(config.validate().is_ok());
        assert_eq!(config.ice_transport_policy, None);

        let expected = [
            (IceScheme::Stun, 80u16, None),
            (IceScheme::Turn, 80, None),
            (IceScheme::Turn, 80, Some(IceTransport::Tcp)),
            (IceScheme::Turn, 443, None),
            (IceScheme::Turns, 443, Some(IceTransport::Tcp)),
        ];
        assert_eq!(config.ice_servers.len(), expected.len());
        for (server, (scheme, port, transport)) in config.ice_servers.iter().zip(expected) {
            let url = single_url(server);
            assert_eq!(url.scheme, scheme);
            assert_eq!(url.port, port);
            assert_eq!(url.transport, transport);
        }
    }

    #[test]
    fn test_credentials_by_scheme() {
        for server in default_config(&creds()).ice_servers {
            if single_url(&server).scheme.is_relay() {
                assert_eq!(server.username.as_deref(), Some("relay-user"));
                assert_eq!(server.credential.as_deref(), Some("relay-secret"));
            } else {
                assert!(server.username.is_none());
                assert!(server.credential.is_none());
            }
        }
    }

    #[test]
    fn test_relay_only_variant() {
        let config = relay_only_config(&creds());
        assert!(config.validate().is_ok());
        assert_eq!(config.ice_transport_policy, Some(IceTransportPolicy::Relay));
        assert_eq!(config.ice_servers.len(), 2);
        assert!(config.ice_servers.iter().all(|s| s.is_relay()));

        let ports: Vec<u16> = config.ice_servers.iter().map(|s| single_url(s).port).collect();
        assert_eq!(ports, vec![80, 443]);
    }

    #[test]
    fn test_mobile_matches_default() {
        assert_eq!(mobile_config(&creds()), default_config(&creds()));
    }

    #[test]
    fn test_json_round_trip() {
        for preset in [Preset::Default, Preset::RelayOnly, Preset::Mobile] {
            let config = preset.build(&creds());
            let parsed = ConnectionConfig::from_json(&config.to_json().unwrap()).unwrap();
            assert_eq!(parsed, config);
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_url_list_override() {
        let config = from_lookup(env(&[
            (
                "TURN_URLS",
                " stun:stun.relay.metered.ca:80, turn:sg.relay.metered.ca:80,,\
                 turns:sg.relay.metered.ca:443?transport=tcp ,",
            ),
            ("TURN_USERNAME", "sg-user"),
            ("TURN_PASSWORD", "sg-pass"),
        ]))
        .unwrap();

        assert_eq!(config.ice_transport_policy, None);
        assert_eq!(config.ice_servers.len(), 1);
        let entry = &config.ice_servers[0];
        assert_eq!(
            entry.urls,
            vec![
                "stun:stun.relay.metered.ca:80",
                "turn:sg.relay.metered.ca:80",
                "turns:sg.relay.metered.ca:443?transport=tcp",
            ]
        );
        assert_eq!(entry.username.as_deref(), Some("sg-user"));
        assert_eq!(entry.credential.as_deref(), Some("sg-pass"));
    }

    #[test]
    fn test_env_defaults_to_builtin_urls() {
        let config = from_lookup(env(&[
            ("METERED_TURN_USERNAME", "relay-user"),
            ("METERED_TURN_CREDENTIAL", "relay-secret"),
        ]))
        .unwrap();
        let expected: Vec<String> = ice_servers(&creds()).into_iter().flat_map(|s| s.urls).collect();
        assert_eq!(config.ice_servers[0].urls, expected);
        assert_eq!(config.ice_servers[0].urls.len(), 5);
    }

    #[test]
    fn test_force_turn_selects_relay() {
        let base = [("TURN_USERNAME", "u"), ("TURN_PASSWORD", "p")];
        let cases = [("true", true), ("1", true), ("YES", true), ("false", false), ("0", false)];
        for (value, relay) in cases {
            let mut pairs = base.to_vec();
            pairs.push(("FORCE_TURN", value));
            let config = from_lookup(env(&pairs)).unwrap();
            let is_relay = config.ice_transport_policy == Some(IceTransportPolicy::Relay);
            assert_eq!(is_relay, relay, "FORCE_TURN={}", value);
        }
    }

    #[test]
    fn test_env_errors() {
        let empty_list = from_lookup(env(&[
            ("TURN_URLS", " , ,"),
            ("TURN_USERNAME", "u"),
            ("TURN_PASSWORD", "p"),
        ]));
        assert!(matches!(empty_list, Err(ConfigError::EmptyUrls)));

        let bad_url = from_lookup(env(&[
            ("TURN_URLS", "turn:sg.relay.metered.ca:80:90"),
            ("TURN_USERNAME", "u"),
            ("TURN_PASSWORD", "p"),
        ]));
        assert!(matches!(bad_url, Err(ConfigError::InvalidUrl { .. })));

        let no_creds = from_lookup(env(&[("TURN_URLS", "turn:sg.relay.metered.ca:80")]));
        assert!(matches!(no_creds, Err(ConfigError::MissingEnv(_))));
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_str("relay"), Some(Preset::RelayOnly));
        assert_eq!(Preset::from_str("React-Native"), Some(Preset::Mobile));
        assert_eq!(Preset::from_str("ALL"), Some(Preset::Default));
        assert_eq!(Preset::from_str("turn"), None);
    }
}
