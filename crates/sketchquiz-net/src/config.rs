//! Session configuration

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sketchquiz_core::{ConfigError, GameConfig};

/// Session configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Address the host binds; port 0 picks a free one
    pub bind_address: SocketAddr,
    /// Address advertised in the room id when the bind address is a wildcard
    pub public_address: Option<SocketAddr>,
    /// Maximum joiners the host accepts
    pub max_clients: usize,
    /// How long batched traffic waits before it is flushed
    pub flush_interval_ms: u64,
    /// Transport pump period
    pub tick_interval_ms: u64,
    /// Game rules
    pub game: GameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 7777)),
            public_address: None,
            max_clients: 5,
            flush_interval_ms: 16,
            tick_interval_ms: 16,
            game: GameConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.game = config.game.validate();
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
