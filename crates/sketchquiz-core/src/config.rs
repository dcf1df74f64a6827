//! Game configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Rules for one game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds a drawer has per turn
    pub round_duration_secs: u32,
    /// Full rotations through the turn order
    pub total_rounds: u32,
    /// Elapsed seconds at which the first and second hint are revealed
    pub hint_after_secs: [u32; 2],
    /// Roster cap
    pub max_players: usize,
    /// Players needed to start
    pub min_players: usize,
    /// Pause between a turn ending and the next one starting
    pub turn_end_delay_secs: u32,
    /// Candidate words offered to the drawer
    pub word_choices: usize,
    /// Replaces the built-in word bank when set
    pub word_bank: Option<Vec<String>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_duration_secs: 180,
            total_rounds: 3,
            hint_after_secs: [30, 60],
            max_players: 6,
            min_players: 2,
            turn_end_delay_secs: 2,
            word_choices: 3,
            word_bank: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.validate())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Clamp values the engine cannot run with instead of rejecting them.
    pub fn validate(mut self) -> Self {
        if self.round_duration_secs == 0 {
            warn!("round_duration_secs must be positive; using 1");
            self.round_duration_secs = 1;
        }
        if self.total_rounds == 0 {
            warn!("total_rounds must be positive; using 1");
            self.total_rounds = 1;
        }
        if self.hint_after_secs[0] > self.hint_after_secs[1] {
            self.hint_after_secs.swap(0, 1);
        }
        if self.min_players < 2 {
            self.min_players = 2;
        }
        if self.max_players < self.min_players {
            warn!(
                "max_players {} below min_players {}; raising",
                self.max_players, self.min_players
            );
            self.max_players = self.min_players;
        }
        if let Some(bank) = &mut self.word_bank {
            bank.retain(|w| !w.trim().is_empty());
            if bank.is_empty() {
                warn!("configured word bank is empty; using the built-in bank");
                self.word_bank = None;
            }
        }
        self
    }
}
