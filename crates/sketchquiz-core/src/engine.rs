//! Turn-based quiz state machine.
//!
//! Every replica runs its own engine and feeds it the same ordered stream of
//! roster changes, word selections and chat lines, so the replicas agree on
//! turns and scores without a central authority. Time only enters through
//! `tick`, called once per second with the token of the running timer.

use serde::{Deserialize, Serialize};
use sketchquiz_protocol::{PeerId, Profile};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::hint::{mask_word, HintLevel};
use crate::observer::{GameObserver, ObserverId, ObserverRegistry};
use crate::phase::{GameEvent, GamePhase};
use crate::player::{Player, RankEntry, Roster};
use crate::profile::assign_profile;
use crate::rng::GameRng;
use crate::timer::{ActiveTimer, TimerKind, TimerSlot, TimerToken};
use crate::words::{pick_words, WORD_BANK};

const BASE_SCORE: u32 = 100;
const MAX_TIME_BONUS: u32 = 50;

/// Outcome of `GameEngine::check_answer`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResult {
    pub correct: bool,
    /// Points awarded, only on a correct guess
    pub score: Option<u32>,
    pub already_guessed: bool,
}

impl GuessResult {
    fn wrong() -> Self {
        Self::default()
    }

    fn already() -> Self {
        Self {
            already_guessed: true,
            ..Self::default()
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Points for a correct guess with `time_left` of `duration` seconds remaining.
pub fn guess_score(time_left: u32, duration: u32) -> u32 {
    if duration == 0 {
        return BASE_SCORE;
    }
    let left = u64::from(time_left.min(duration));
    let bonus = left * u64::from(MAX_TIME_BONUS) / u64::from(duration);
    BASE_SCORE + bonus as u32
}

#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    rng: GameRng,
    roster: Roster,
    /// Joined while a game was running; seated when it ends.
    waiting: Vec<Player>,
    local_player: Option<PeerId>,

    phase: GamePhase,
    current_round: u32,
    turn_order: Vec<PeerId>,
    turn_index: usize,
    current_drawer: Option<PeerId>,
    current_word: Option<String>,
    time_left: u32,
    hint_level: HintLevel,

    timer: TimerSlot,
    observers: ObserverRegistry,
}

impl GameEngine {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.validate();
        let time_left = config.round_duration_secs;
        Self {
            config,
            rng: GameRng::seed_from_u64(seed),
            roster: Roster::default(),
            waiting: Vec::new(),
            local_player: None,
            phase: GamePhase::Lobby,
            current_round: 0,
            turn_order: Vec::new(),
            turn_index: 0,
            current_drawer: None,
            current_word: None,
            time_left,
            hint_level: HintLevel::Hidden,
            timer: TimerSlot::default(),
            observers: ObserverRegistry::new(),
        }
    }

    // ---- observers ----

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ---- roster ----

    /// Record who this replica plays as, adding them to the roster.
    pub fn set_local_player(&mut self, peer_id: PeerId, nickname: &str) -> bool {
        self.local_player = Some(peer_id);
        self.add_player(peer_id, nickname)
    }

    /// Adds a player with a freshly assigned profile.
    ///
    /// False if the player is already present or the roster is full. A
    /// player arriving mid-game waits for the next game and this also
    /// returns false; see [`GameEngine::is_waiting`].
    pub fn add_player(&mut self, peer_id: PeerId, nickname: &str) -> bool {
        if !self.can_add(peer_id) {
            return false;
        }
        let profile = assign_profile(&mut self.rng, self.roster.profiles());
        self.seat_or_wait(Player::new(peer_id, nickname, profile))
    }

    /// Adds a player with the profile they announced themselves.
    pub fn add_player_with_profile(
        &mut self,
        peer_id: PeerId,
        nickname: &str,
        profile: Profile,
    ) -> bool {
        if !self.can_add(peer_id) {
            return false;
        }
        self.seat_or_wait(Player::new(peer_id, nickname, profile))
    }

    fn can_add(&self, peer_id: PeerId) -> bool {
        if self.roster.contains(peer_id) || self.is_waiting(peer_id) {
            return false;
        }
        if self.roster.len() + self.waiting.len() >= self.config.max_players {
            warn!(
                "Roster full ({} players), rejecting {}",
                self.config.max_players, peer_id
            );
            return false;
        }
        true
    }

    /// The turn order is fixed for the length of a game: a late joiner never
    /// saw `start-game`, so its own engine could not take a turn.
    fn seat_or_wait(&mut self, player: Player) -> bool {
        if self.phase.in_game() {
            info!(
                "Player {} ({}) joined mid-game, seated for the next game",
                player.nickname, player.peer_id
            );
            self.waiting.push(player);
            return false;
        }
        self.insert_player(player)
    }

    fn insert_player(&mut self, player: Player) -> bool {
        let (nickname, peer_id) = (player.nickname.clone(), player.peer_id);
        if !self.roster.insert(player) {
            return false;
        }
        info!("Player {} joined as {}", nickname, peer_id);
        self.refresh_turn_order();
        self.observers.score_update();
        true
    }

    fn seat_waiting(&mut self) {
        for player in std::mem::take(&mut self.waiting) {
            self.insert_player(player);
        }
    }

    /// True for a player who joined mid-game and sits out until it ends.
    pub fn is_waiting(&self, peer_id: PeerId) -> bool {
        self.waiting.iter().any(|p| p.peer_id == peer_id)
    }

    /// Turn order is the roster's ids in ascending order, so every replica
    /// derives the same order whatever order it learned of the players in.
    fn refresh_turn_order(&mut self) {
        let mut ids = self.roster.ids();
        ids.sort_unstable();
        self.turn_order = ids;
    }

    /// Drops a player. A drawer leaving mid-turn ends that turn early; the
    /// player who slides into the drawer's slot draws next.
    pub fn remove_player(&mut self, peer_id: PeerId) -> bool {
        if let Some(pos) = self.waiting.iter().position(|p| p.peer_id == peer_id) {
            let player = self.waiting.remove(pos);
            info!("Player {} ({}) left before being seated", player.nickname, peer_id);
            return true;
        }
        let Some(player) = self.roster.remove(peer_id) else {
            return false;
        };
        info!("Player {} ({}) left", player.nickname, peer_id);

        if let Some(pos) = self.turn_order.iter().position(|&id| id == peer_id) {
            if pos < self.turn_index {
                self.turn_index -= 1;
            }
        }
        self.refresh_turn_order();
        self.observers.score_update();

        let was_drawer = self.current_drawer == Some(peer_id);
        match self.phase {
            GamePhase::Playing | GamePhase::TurnActive if was_drawer => {
                info!("Drawer {} left, ending turn", peer_id);
                self.finish_turn(false);
            }
            GamePhase::TurnActive => {
                if let Some(drawer) = self.current_drawer {
                    if self.roster.len() <= 1 {
                        info!("Nobody left to guess, ending turn");
                        self.finish_turn(true);
                    } else if self.roster.all_guessed_except(drawer) {
                        self.finish_turn(true);
                    }
                }
            }
            _ => {}
        }
        true
    }

    // ---- turn flow ----

    /// False with fewer than `min_players`, or while a game is running.
    pub fn start_game(&mut self) -> bool {
        if self.phase.in_game() {
            warn!("Cannot start: a game is already running");
            return false;
        }
        if self.roster.len() < self.config.min_players {
            warn!(
                "Cannot start: {} of {} players",
                self.roster.len(),
                self.config.min_players
            );
            return false;
        }

        for player in self.roster.iter_mut() {
            player.score = 0;
            player.has_guessed = false;
        }
        self.current_round = 1;
        self.turn_index = 0;
        self.refresh_turn_order();
        self.phase = GamePhase::Playing;
        info!("Starting game with {} players", self.roster.len());
        self.observers.score_update();

        self.start_new_turn();
        true
    }

    /// Hands the turn to the next drawer, rolling over into the next round
    /// or ending the game as needed.
    pub fn start_new_turn(&mut self) {
        if self.turn_order.is_empty() {
            warn!("No players left to take a turn");
            return;
        }

        if self.turn_index >= self.turn_order.len() {
            self.turn_index = 0;
            if self.current_round >= self.config.total_rounds {
                self.end_game();
                return;
            }
            self.current_round += 1;
        }

        let drawer = self.turn_order[self.turn_index];
        self.timer.stop();
        self.current_drawer = Some(drawer);
        self.current_word = None;
        self.time_left = self.config.round_duration_secs;
        self.hint_level = HintLevel::Hidden;
        self.roster.clear_guesses();
        self.phase = GamePhase::Playing;

        info!(
            "Round {}/{}: {} is drawing",
            self.current_round, self.config.total_rounds, drawer
        );
        self.observers.game_state_change(GameEvent::TurnStart);
    }

    /// Fresh candidate words for the drawer.
    pub fn word_choices(&mut self) -> Vec<String> {
        let count = self.config.word_choices;
        match &self.config.word_bank {
            Some(bank) => pick_words(&mut self.rng, bank, count),
            None => pick_words(&mut self.rng, WORD_BANK, count),
        }
    }

    /// Sets the secret word and starts the countdown. Only valid while a
    /// drawer is waiting for a word.
    pub fn select_word(&mut self, word: &str) -> bool {
        let word = word.trim();
        if self.phase != GamePhase::Playing || word.is_empty() {
            debug!("Ignoring word selection in {:?}", self.phase);
            return false;
        }

        self.current_word = Some(word.to_string());
        self.time_left = self.config.round_duration_secs;
        self.hint_level = HintLevel::Hidden;
        self.timer.start(TimerKind::Countdown);
        self.phase = GamePhase::TurnActive;

        info!("Word selected, {}s on the clock", self.time_left);
        self.observers.game_state_change(GameEvent::Drawing);
        true
    }

    /// Ends the current turn early. No-op outside a turn.
    pub fn end_turn(&mut self) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::TurnActive) {
            self.finish_turn(true);
        }
    }

    fn finish_turn(&mut self, advance: bool) {
        self.timer.stop();
        if advance {
            self.turn_index += 1;
        }
        self.phase = GamePhase::TurnEnd;
        info!("Turn over");
        self.observers.game_state_change(GameEvent::TurnEnd);

        match self.config.turn_end_delay_secs {
            0 => self.start_new_turn(),
            remaining => {
                self.timer.start(TimerKind::Intermission { remaining });
            }
        }
    }

    fn end_game(&mut self) {
        self.timer.stop();
        self.phase = GamePhase::GameEnd;
        self.current_drawer = None;
        info!("Game over after {} rounds", self.current_round);
        self.observers.game_state_change(GameEvent::GameEnd);
        self.seat_waiting();
    }

    /// Back to the lobby with the roster intact. Scores are kept until the
    /// next `start_game`.
    pub fn reset_to_lobby(&mut self) {
        self.timer.stop();
        self.phase = GamePhase::Lobby;
        self.current_round = 0;
        self.turn_index = 0;
        self.current_drawer = None;
        self.current_word = None;
        self.time_left = self.config.round_duration_secs;
        self.hint_level = HintLevel::Hidden;
        self.roster.clear_guesses();
        self.seat_waiting();
    }

    // ---- timer ----

    /// The timer instance the host loop should be ticking, if any.
    pub fn active_timer(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    /// Advances the timer identified by `token` by one second. Returns false
    /// for a stale or cancelled token.
    pub fn tick(&mut self, token: TimerToken) -> bool {
        let Some(ActiveTimer { kind, .. }) = self.timer.current_mut(token).copied() else {
            return false;
        };

        match kind {
            TimerKind::Countdown => self.countdown_tick(),
            TimerKind::Intermission { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.timer.stop();
                    self.start_new_turn();
                } else if let Some(timer) = self.timer.current_mut(token) {
                    timer.kind = TimerKind::Intermission { remaining };
                }
            }
        }
        true
    }

    fn countdown_tick(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);

        let elapsed = self.config.round_duration_secs - self.time_left;
        for threshold in self.config.hint_after_secs {
            if elapsed == threshold && self.hint_level != HintLevel::FirstAndMiddle {
                self.hint_level = self.hint_level.raised();
                debug!("Hint level {}", self.hint_level.as_u8());
                self.observers.game_state_change(GameEvent::Hint);
            }
        }

        self.observers.timer_update(self.time_left);

        if self.time_left == 0 {
            info!("Turn timer expired");
            self.finish_turn(true);
        }
    }

    // ---- guessing ----

    /// Validates a chat line as a guess from `peer_id`. Trimmed and
    /// case-folded on both sides, then compared exactly.
    pub fn check_answer(&mut self, peer_id: PeerId, guess: &str) -> GuessResult {
        let Some(drawer) = self.current_drawer else {
            return GuessResult::wrong();
        };
        if peer_id == drawer {
            return GuessResult::wrong();
        }
        let Some(player) = self.roster.get(peer_id) else {
            return GuessResult::wrong();
        };
        if player.has_guessed {
            return GuessResult::already();
        }
        if self.phase != GamePhase::TurnActive {
            return GuessResult::wrong();
        }
        let Some(word) = &self.current_word else {
            return GuessResult::wrong();
        };

        if normalize(guess) != normalize(word) {
            return GuessResult::wrong();
        }

        let score = guess_score(self.time_left, self.config.round_duration_secs);
        if let Some(player) = self.roster.get_mut(peer_id) {
            player.score += score;
            player.has_guessed = true;
            info!("{} guessed the word for {} points", player.nickname, score);
        }
        self.observers.score_update();

        if self.roster.all_guessed_except(drawer) {
            info!("Everyone guessed");
            self.finish_turn(true);
        }

        GuessResult {
            correct: true,
            score: Some(score),
            already_guessed: false,
        }
    }

    /// Masked word at the current hint level, empty with no word.
    pub fn hint(&self) -> String {
        match &self.current_word {
            Some(word) => mask_word(word, self.hint_level),
            None => String::new(),
        }
    }

    /// True when `text` is the word of the running turn. Lets chat that would
    /// give the answer away be held back without revealing the word itself.
    pub fn reveals_word(&self, text: &str) -> bool {
        self.phase == GamePhase::TurnActive
            && self
                .current_word
                .as_deref()
                .is_some_and(|word| normalize(word) == normalize(text))
    }

    /// The word itself, only for the drawer or once the turn is over.
    pub fn secret_word(&self) -> Option<&str> {
        let revealed = self.is_my_turn()
            || matches!(self.phase, GamePhase::TurnEnd | GamePhase::GameEnd);
        if revealed {
            self.current_word.as_deref()
        } else {
            None
        }
    }

    pub fn ranking(&self) -> Vec<RankEntry> {
        self.roster.ranking()
    }

    pub fn is_my_turn(&self) -> bool {
        self.local_player.is_some() && self.current_drawer == self.local_player
    }

    // ---- accessors ----

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.config.total_rounds
    }

    pub fn turn_order(&self) -> &[PeerId] {
        &self.turn_order
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn current_drawer(&self) -> Option<PeerId> {
        self.current_drawer
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn hint_level(&self) -> HintLevel {
        self.hint_level
    }

    pub fn local_player(&self) -> Option<PeerId> {
        self.local_player
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn player(&self, peer_id: PeerId) -> Option<&Player> {
        self.roster.get(peer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(players: &[u64]) -> GameEngine {
        let mut engine = GameEngine::new(GameConfig::default(), 1);
        for &id in players {
            assert!(engine.add_player(PeerId(id), &format!("p{id}")));
        }
        engine
    }

    fn tick_seconds(engine: &mut GameEngine, seconds: u32) {
        for _ in 0..seconds {
            let token = engine.active_timer().expect("timer running");
            assert!(engine.tick(token));
        }
    }

    #[test]
    fn score_formula_bounds() {
        assert_eq!(guess_score(180, 180), 150);
        assert_eq!(guess_score(0, 180), 100);
        assert_eq!(guess_score(90, 180), 125);
        assert_eq!(guess_score(1, 180), 100);
    }

    #[test]
    fn roster_cap_is_enforced() {
        let mut engine = engine_with(&[1, 2, 3, 4, 5, 6]);
        assert!(!engine.add_player(PeerId(7), "late"));
        assert!(!engine.add_player(PeerId(1), "dupe"));
        assert_eq!(engine.roster().len(), 6);
    }

    #[test]
    fn start_game_needs_two_players() {
        let mut engine = engine_with(&[1]);
        assert!(!engine.start_game());
        assert_eq!(engine.phase(), GamePhase::Lobby);

        engine.add_player(PeerId(2), "p2");
        assert!(engine.start_game());
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.current_round(), 1);
        assert_eq!(engine.current_drawer(), Some(PeerId(1)));
        assert!(!engine.start_game());
    }

    #[test]
    fn select_word_only_while_waiting_for_one() {
        let mut engine = engine_with(&[1, 2]);
        assert!(!engine.select_word("사과"));
        engine.start_game();
        assert!(!engine.select_word("   "));
        assert!(engine.select_word("사과"));
        assert_eq!(engine.phase(), GamePhase::TurnActive);
        assert!(!engine.select_word("바나나"));
        assert_eq!(engine.hint(), "_ _");
    }

    #[test]
    fn hints_follow_elapsed_thresholds() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.select_word("컴퓨터");

        tick_seconds(&mut engine, 29);
        assert_eq!(engine.hint_level(), HintLevel::Hidden);
        tick_seconds(&mut engine, 1);
        assert_eq!(engine.hint_level(), HintLevel::FirstLetter);
        assert_eq!(engine.hint(), "컴 _ _");
        tick_seconds(&mut engine, 30);
        assert_eq!(engine.hint_level(), HintLevel::FirstAndMiddle);
        assert_eq!(engine.hint(), "컴 퓨 _");
        assert_eq!(engine.time_left(), 120);
    }

    #[test]
    fn countdown_expiry_ends_turn_then_intermission_starts_next() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.select_word("달");

        tick_seconds(&mut engine, 180);
        assert_eq!(engine.phase(), GamePhase::TurnEnd);
        assert_eq!(engine.turn_index(), 1);

        tick_seconds(&mut engine, 2);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.current_drawer(), Some(PeerId(2)));
        assert!(engine.active_timer().is_none());
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.select_word("별");
        let countdown = engine.active_timer().expect("countdown");
        engine.end_turn();

        assert!(!engine.tick(countdown));
        assert_eq!(engine.time_left(), 180);
        assert_ne!(engine.active_timer(), Some(countdown));
    }

    #[test]
    fn drawer_cannot_guess_and_guessers_score_once() {
        let mut engine = engine_with(&[1, 2, 3]);
        engine.start_game();
        engine.select_word("Pizza");

        assert!(!engine.check_answer(PeerId(1), "pizza").correct);

        let first = engine.check_answer(PeerId(2), "  PIZZA ");
        assert!(first.correct);
        assert_eq!(first.score, Some(150));

        let again = engine.check_answer(PeerId(2), "pizza");
        assert!(!again.correct);
        assert!(again.already_guessed);
        assert_eq!(engine.player(PeerId(2)).map(|p| p.score), Some(150));
        assert_eq!(engine.phase(), GamePhase::TurnActive);
    }

    #[test]
    fn wrong_guess_and_unknown_player() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.select_word("pizza");
        assert_eq!(engine.check_answer(PeerId(2), "pasta"), GuessResult::wrong());
        assert_eq!(engine.check_answer(PeerId(9), "pizza"), GuessResult::wrong());
    }

    #[test]
    fn all_guessed_ends_turn() {
        let mut engine = engine_with(&[1, 2, 3]);
        engine.start_game();
        engine.select_word("cat");
        engine.check_answer(PeerId(2), "cat");
        engine.check_answer(PeerId(3), "cat");
        assert_eq!(engine.phase(), GamePhase::TurnEnd);
        assert_eq!(engine.secret_word(), Some("cat"));
    }

    #[test]
    fn secret_word_hidden_from_guessers() {
        let mut drawer = GameEngine::new(GameConfig::default(), 1);
        drawer.set_local_player(PeerId(1), "d");
        drawer.add_player(PeerId(2), "g");
        let mut guesser = GameEngine::new(GameConfig::default(), 2);
        guesser.add_player(PeerId(1), "d");
        guesser.set_local_player(PeerId(2), "g");

        for engine in [&mut drawer, &mut guesser] {
            engine.start_game();
            engine.select_word("moon");
        }
        assert!(drawer.is_my_turn());
        assert_eq!(drawer.secret_word(), Some("moon"));
        assert!(!guesser.is_my_turn());
        assert_eq!(guesser.secret_word(), None);
        assert_eq!(guesser.hint(), "_ _ _ _");
    }

    #[test]
    fn drawer_leaving_hands_turn_to_next_in_line() {
        let mut engine = engine_with(&[1, 2, 3]);
        engine.start_game();
        engine.select_word("cat");

        assert!(engine.remove_player(PeerId(1)));
        assert_eq!(engine.phase(), GamePhase::TurnEnd);
        assert_eq!(engine.turn_order(), &[PeerId(2), PeerId(3)]);

        tick_seconds(&mut engine, 2);
        assert_eq!(engine.current_drawer(), Some(PeerId(2)));
    }

    #[test]
    fn word_choices_come_from_configured_bank() {
        let config = GameConfig {
            word_bank: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            ..GameConfig::default()
        };
        let mut engine = GameEngine::new(config, 4);
        let choices = engine.word_choices();
        assert_eq!(choices.len(), 3);
        assert!(choices.iter().all(|w| ["a", "b", "c", "d"].contains(&w.as_str())));
    }

    #[test]
    fn reset_to_lobby_allows_a_new_game() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.select_word("cat");
        engine.reset_to_lobby();
        assert_eq!(engine.phase(), GamePhase::Lobby);
        assert!(engine.active_timer().is_none());
        assert!(engine.start_game());
    }

    #[test]
    fn mid_game_joiner_waits_for_the_next_game() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();

        assert!(!engine.add_player(PeerId(3), "late"));
        assert!(engine.is_waiting(PeerId(3)));
        assert!(!engine.roster().contains(PeerId(3)));
        assert_eq!(engine.turn_order(), &[PeerId(1), PeerId(2)]);
        assert!(!engine.add_player(PeerId(3), "late"));

        engine.end_game();
        assert!(!engine.is_waiting(PeerId(3)));
        assert_eq!(engine.turn_order(), &[PeerId(1), PeerId(2), PeerId(3)]);

        engine.reset_to_lobby();
        assert!(engine.start_game());
        assert_eq!(engine.turn_order().len(), 3);
    }

    #[test]
    fn waiting_player_can_leave_before_being_seated() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.add_player(PeerId(3), "late");

        assert!(engine.remove_player(PeerId(3)));
        engine.reset_to_lobby();
        assert!(!engine.roster().contains(PeerId(3)));
        assert_eq!(engine.turn_order(), &[PeerId(1), PeerId(2)]);
    }

    #[test]
    fn drawer_left_alone_ends_the_turn() {
        let mut engine = engine_with(&[1, 2]);
        engine.start_game();
        engine.select_word("cat");

        assert!(engine.remove_player(PeerId(2)));
        assert_eq!(engine.phase(), GamePhase::TurnEnd);
    }

    #[test]
    fn reveals_word_only_during_the_turn() {
        let mut engine = engine_with(&[1, 2, 3]);
        engine.start_game();
        assert!(!engine.reveals_word("cat"));

        engine.select_word("Cat");
        assert!(engine.reveals_word("  cAT "));
        assert!(!engine.reveals_word("cats"));

        engine.end_turn();
        assert!(!engine.reveals_word("cat"));
    }
}
