//! URL parser for stun:, turn: and turns: ICE server URIs.
//! Format: scheme:host[:port][?transport=udp|tcp]

use std::fmt;

use crate::error::{ConfigError, Result};

// Default ports (RFC 7064 / RFC 7065)
const DEFAULT_PORT: u16 = 3478;
const DEFAULT_TLS_PORT: u16 = 5349;

/// ICE server URI scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceScheme {
    /// Address discovery only, no credentials
    Stun,
    /// Relay over UDP or TCP
    Turn,
    /// Relay over TLS
    Turns,
}

impl IceScheme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stun" => Some(IceScheme::Stun),
            "turn" => Some(IceScheme::Turn),
            "turns" => Some(IceScheme::Turns),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IceScheme::Stun => "stun",
            IceScheme::Turn => "turn",
            IceScheme::Turns => "turns",
        }
    }

    /// TURN and TURNS entries relay media and need credentials
    pub fn is_relay(&self) -> bool {
        matches!(self, IceScheme::Turn | IceScheme::Turns)
    }

    pub fn default_port(&self) -> u16 {
        match self {
            IceScheme::Turns => DEFAULT_TLS_PORT,
            _ => DEFAULT_PORT,
        }
    }
}

/// Transport requested through the `?transport=` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceTransport {
    Udp,
    Tcp,
}

impl IceTransport {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "udp" => Some(IceTransport::Udp),
            "tcp" => Some(IceTransport::Tcp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IceTransport::Udp => "udp",
            IceTransport::Tcp => "tcp",
        }
    }
}

/// Parsed ICE server URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceUrl {
    pub scheme: IceScheme,
    pub host: String,
    pub port: u16,
    /// Only set when the URI carried an explicit transport parameter
    pub transport: Option<IceTransport>,
}

impl IceUrl {
    // Parse a stun:/turn:/turns: URI
    pub fn parse(url: &str) -> Result<Self> {
        let (scheme, rest) = match url.find(':') {
            Some(idx) => (&url[..idx], &url[idx + 1..]),
            None => return Err(ConfigError::invalid_url(url, "missing scheme")),
        };

        let scheme = IceScheme::from_str(scheme).ok_or_else(|| {
            ConfigError::invalid_url(url, format!("unsupported scheme '{}'", scheme))
        })?;

        // Split host:port from query string
        let (host_port, query) = match rest.find('?') {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
            None => (rest, None),
        };

        // Bracketed IPv6 literal: [::1]:3478
        let bracketed = host_port.starts_with('[');
        let (host, port) = if let Some(stripped) = host_port.strip_prefix('[') {
            let end = stripped
                .find(']')
                .ok_or_else(|| ConfigError::invalid_url(url, "unterminated IPv6 literal"))?;
            let after = &stripped[end + 1..];
            let port = match after.strip_prefix(':') {
                Some(p) => Some(p),
                None if after.is_empty() => None,
                None => return Err(ConfigError::invalid_url(url, "unexpected text after host")),
            };
            (&stripped[..end], port)
        } else if let Some(idx) = host_port.rfind(':') {
            (&host_port[..idx], Some(&host_port[idx + 1..]))
        } else {
            (host_port, None)
        };

        if host.is_empty() {
            return Err(ConfigError::invalid_url(url, "host cannot be empty"));
        }
        if host.starts_with("//") {
            return Err(ConfigError::invalid_url(url, "ICE URIs take no '//' authority prefix"));
        }
        // Unbracketed hosts are names or IPv4 addresses only
        let bad_char = |c: char| c == ':' || c == '/' || c == '@' || c.is_whitespace();
        if !bracketed && host.contains(bad_char) {
            return Err(ConfigError::invalid_url(
                url,
                format!("invalid host '{}' (IPv6 literals must be bracketed)", host),
            ));
        }

        let port = match port {
            Some(p) => match p.parse::<u16>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError::invalid_url(url, format!("invalid port '{}'", p)))
                }
                Ok(p) => p,
            },
            None => scheme.default_port(),
        };

        let mut transport = None;
        if let Some(query) = query {
            for param in query.split('&') {
                if param.is_empty() {
                    continue;
                }

                let (key, value) = match param.find('=') {
                    Some(idx) => (&param[..idx], &param[idx + 1..]),
                    None => (param, ""),
                };

                if key.eq_ignore_ascii_case("transport") {
                    if scheme == IceScheme::Stun {
                        return Err(ConfigError::invalid_url(
                            url,
                            "stun URIs do not take a transport parameter",
                        ));
                    }
                    transport = Some(IceTransport::from_str(value).ok_or_else(|| {
                        ConfigError::invalid_url(url, format!("unknown transport '{}'", value))
                    })?);
                } else {
                    return Err(ConfigError::invalid_url(
                        url,
                        format!("unknown query parameter '{}'", key),
                    ));
                }
            }
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            transport,
        })
    }
}

impl fmt::Display for IceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "{}:[{}]:{}", self.scheme.as_str(), self.host, self.port)?;
        } else {
            write!(f, "{}:{}:{}", self.scheme.as_str(), self.host, self.port)?;
        }
        if let Some(transport) = self.transport {
            write!(f, "?transport={}", transport.as_str())?;
        }
        Ok(())
    }
}
