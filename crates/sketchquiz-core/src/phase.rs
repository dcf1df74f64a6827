use serde::{Deserialize, Serialize};

/// Where the game is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Gathering players, no game running
    #[default]
    Lobby,
    /// Drawer chosen, waiting for a word
    Playing,
    /// Word selected, countdown running
    TurnActive,
    /// Turn over, intermission before the next drawer
    TurnEnd,
    GameEnd,
}

impl GamePhase {
    /// A game has started and not yet ended.
    pub fn in_game(self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::TurnActive | GamePhase::TurnEnd
        )
    }
}

/// Tag passed to `GameObserver::on_game_state_change`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEvent {
    TurnStart,
    Drawing,
    Hint,
    TurnEnd,
    GameEnd,
}

impl GameEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            GameEvent::TurnStart => "turnStart",
            GameEvent::Drawing => "drawing",
            GameEvent::Hint => "hint",
            GameEvent::TurnEnd => "turnEnd",
            GameEvent::GameEnd => "gameEnd",
        }
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
