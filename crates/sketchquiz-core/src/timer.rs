//! The single per-session timer slot.
//!
//! The engine is driven by one-second ticks from outside. Each timer instance
//! gets a fresh token; a tick carrying any other token is stale and ignored,
//! so at most one countdown can ever advance the game.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Turn countdown; the remaining time lives on the engine state
    Countdown,
    /// Pause after a turn ends
    Intermission { remaining: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
}

#[derive(Clone, Debug, Default)]
pub struct TimerSlot {
    next_token: u64,
    active: Option<ActiveTimer>,
}

impl TimerSlot {
    /// Cancels whatever was running and starts a new instance.
    pub fn start(&mut self, kind: TimerKind) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.active = Some(ActiveTimer { token, kind });
        token
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<ActiveTimer> {
        self.active
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.active.map(|t| t.token)
    }

    /// Mutable view of the running timer, only if `token` is current.
    pub fn current_mut(&mut self, token: TimerToken) -> Option<&mut ActiveTimer> {
        self.active.as_mut().filter(|t| t.token == token)
    }
}
