use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque, stable identifier of one participant.
///
/// On the wire this doubles as the netcode client id of a joiner; the host
/// draws its own at session creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl PeerId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for PeerId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s.trim(), 16)
            .map(PeerId)
            .map_err(|_| IdParseError::InvalidPeer(s.to_string()))
    }
}

/// Room identity: the host's channel address.
///
/// Rendered as `<host-peer-hex>@<ip:port>` so a joiner knows both where to
/// dial and which peer answers there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoomId {
    pub host: PeerId,
    pub addr: SocketAddr,
}

/// Query parameter carrying the room id in a shareable link.
pub const ROOM_QUERY_KEY: &str = "room";

impl RoomId {
    pub const fn new(host: PeerId, addr: SocketAddr) -> Self {
        Self { host, addr }
    }

    /// Shareable link: `base` with any existing query replaced by `?room=<id>`.
    pub fn to_url(&self, base: &str) -> String {
        let base = base.split('?').next().unwrap_or(base);
        format!("{base}?{ROOM_QUERY_KEY}={self}")
    }

    /// Resolve a room from a link produced by [`RoomId::to_url`], or from a
    /// bare room id.
    pub fn from_url(url: &str) -> Result<Self, IdParseError> {
        let Some((_, query)) = url.split_once('?') else {
            return url.parse();
        };

        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == ROOM_QUERY_KEY)
            .map(|(_, value)| value.parse())
            .unwrap_or_else(|| Err(IdParseError::MissingRoom(url.to_string())))
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.host, self.addr)
    }
}

impl FromStr for RoomId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, addr) = s
            .split_once('@')
            .ok_or_else(|| IdParseError::InvalidRoom(s.to_string()))?;
        let host = host.parse()?;
        let addr = addr
            .parse()
            .map_err(|_| IdParseError::InvalidRoom(s.to_string()))?;
        Ok(Self { host, addr })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("invalid peer id: {0}")]
    InvalidPeer(String),
    #[error("invalid room id: {0}")]
    InvalidRoom(String),
    #[error("no `room` query parameter in {0}")]
    MissingRoom(String),
}
