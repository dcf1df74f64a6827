//! Observer registration for UI layers.
//!
//! The engine never depends on an observer being present: with nothing
//! subscribed every notification is a no-op.

use crate::phase::GameEvent;

/// Hooks fired by the engine. Every method defaults to doing nothing, so an
/// observer only implements what it cares about.
pub trait GameObserver {
    fn on_timer_update(&mut self, _seconds_remaining: u32) {}

    fn on_score_update(&mut self) {}

    fn on_game_state_change(&mut self, _event: GameEvent) {}
}

/// Handle returned by `ObserverRegistry::subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn GameObserver>)>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscribed", &self.observers.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn timer_update(&mut self, seconds_remaining: u32) {
        for (_, observer) in &mut self.observers {
            observer.on_timer_update(seconds_remaining);
        }
    }

    pub fn score_update(&mut self) {
        for (_, observer) in &mut self.observers {
            observer.on_score_update();
        }
    }

    pub fn game_state_change(&mut self, event: GameEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_game_state_change(event);
        }
    }
}
