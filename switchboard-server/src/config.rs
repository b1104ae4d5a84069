//! Relay configuration.
//!
//! Values come from an optional JSON file and are then overridden by the
//! command line / environment in the binary.

use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use switchboard_core::IceServerConfig;

pub const DEFAULT_PORT: u16 = 4000;

/// How room presence is announced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceMode {
    /// `user-joined` to the room members only.
    #[default]
    Arrival,
    /// Additionally, the full roster to every connection after each change.
    Roster,
}

impl FromStr for PresenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arrival" => Ok(Self::Arrival),
            "roster" => Ok(Self::Roster),
            other => Err(format!(
                "unknown presence mode '{other}' (expected 'arrival' or 'roster')"
            )),
        }
    }
}

impl fmt::Display for PresenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => f.write_str("arrival"),
            Self::Roster => f.write_str("roster"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub host: IpAddr,
    pub port: u16,
    pub presence: PresenceMode,
    /// STUN/TURN server advertised to clients in the welcome frame.
    pub turn_url: Option<String>,
    pub turn_username: Option<String>,
    pub turn_credential: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            presence: PresenceMode::default(),
            turn_url: None,
            turn_username: None,
            turn_credential: None,
        }
    }
}

impl RelayConfig {
    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let text = std::fs::read_to_string(path).map_err(|source| RelayError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| RelayError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// TURN credentials are meaningless without a server to use them on.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.turn_url.is_none()
            && (self.turn_username.is_some() || self.turn_credential.is_some())
        {
            return Err(RelayError::InvalidConfig(
                "turn_username/turn_credential set without turn_url".to_string(),
            ));
        }

        if self
            .turn_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(RelayError::InvalidConfig(
                "turn_url cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        self.turn_url
            .iter()
            .map(|url| IceServerConfig {
                urls: vec![url.clone()],
                username: self.turn_username.clone(),
                credential: self.turn_credential.clone(),
            })
            .collect()
    }
}
