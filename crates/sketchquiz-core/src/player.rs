use serde::{Deserialize, Serialize};
use sketchquiz_protocol::{PeerId, Profile};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub peer_id: PeerId,
    pub nickname: String,
    pub score: u32,
    /// Reset at the start of every turn
    pub has_guessed: bool,
    pub profile: Profile,
}

impl Player {
    pub fn new(peer_id: PeerId, nickname: impl Into<String>, profile: Profile) -> Self {
        Self {
            peer_id,
            nickname: nickname.into(),
            score: 0,
            has_guessed: false,
            profile,
        }
    }
}

/// One row of `GameEngine::ranking`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub peer_id: PeerId,
    pub nickname: String,
    pub score: u32,
}

/// Players in join order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, peer_id: PeerId) -> bool {
        self.get(peer_id).is_some()
    }

    pub fn get(&self, peer_id: PeerId) -> Option<&Player> {
        self.players.iter().find(|p| p.peer_id == peer_id)
    }

    pub fn get_mut(&mut self, peer_id: PeerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.peer_id == peer_id)
    }

    /// Appends `player` unless its id is already present.
    pub fn insert(&mut self, player: Player) -> bool {
        if self.contains(player.peer_id) {
            return false;
        }
        self.players.push(player);
        true
    }

    pub fn remove(&mut self, peer_id: PeerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.peer_id == peer_id)?;
        Some(self.players.remove(index))
    }

    pub fn ids(&self) -> Vec<PeerId> {
        self.players.iter().map(|p| p.peer_id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> + Clone {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> + Clone {
        self.players.iter().map(|p| &p.profile)
    }

    pub fn clear_guesses(&mut self) {
        for player in &mut self.players {
            player.has_guessed = false;
        }
    }

    /// True when every player except `drawer` has guessed. False when there
    /// is nobody but the drawer.
    pub fn all_guessed_except(&self, drawer: PeerId) -> bool {
        let mut guessers = self.players.iter().filter(|p| p.peer_id != drawer).peekable();
        guessers.peek().is_some() && guessers.all(|p| p.has_guessed)
    }

    /// Descending score; ties keep join order.
    pub fn ranking(&self) -> Vec<RankEntry> {
        let mut entries: Vec<RankEntry> = self
            .players
            .iter()
            .map(|p| RankEntry {
                peer_id: p.peer_id,
                nickname: p.nickname.clone(),
                score: p.score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u64, score: u32) -> Player {
        let mut p = Player::new(
            PeerId(id),
            format!("p{id}"),
            Profile {
                avatar: "🐶".to_string(),
                color: "#FF6B6B".to_string(),
            },
        );
        p.score = score;
        p
    }

    #[test]
    fn insert_rejects_duplicates_and_keeps_order() {
        let mut roster = Roster::default();
        assert!(roster.insert(player(3, 0)));
        assert!(roster.insert(player(1, 0)));
        assert!(!roster.insert(player(3, 0)));
        assert_eq!(roster.ids(), vec![PeerId(3), PeerId(1)]);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mut roster = Roster::default();
        roster.insert(player(1, 100));
        roster.insert(player(2, 150));
        roster.insert(player(3, 100));
        let order: Vec<PeerId> = roster.ranking().iter().map(|r| r.peer_id).collect();
        assert_eq!(order, vec![PeerId(2), PeerId(1), PeerId(3)]);
    }

    #[test]
    fn all_guessed_ignores_the_drawer() {
        let mut roster = Roster::default();
        roster.insert(player(1, 0));
        roster.insert(player(2, 0));
        assert!(!roster.all_guessed_except(PeerId(1)));
        if let Some(p) = roster.get_mut(PeerId(2)) {
            p.has_guessed = true;
        }
        assert!(roster.all_guessed_except(PeerId(1)));

        roster.remove(PeerId(2));
        assert!(!roster.all_guessed_except(PeerId(1)));
    }
}
