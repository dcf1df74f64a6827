//! Full game flows through the public engine API.

use std::cell::RefCell;
use std::rc::Rc;

use sketchquiz_core::{
    GameConfig, GameEngine, GameEvent, GameObserver, GamePhase, GameRng, HintLevel,
};
use sketchquiz_protocol::{PeerId, Profile};

fn quick_config() -> GameConfig {
    GameConfig {
        round_duration_secs: 10,
        total_rounds: 2,
        hint_after_secs: [3, 6],
        turn_end_delay_secs: 2,
        ..GameConfig::default()
    }
}

fn run_ticks(engine: &mut GameEngine, seconds: u32) {
    for _ in 0..seconds {
        let token = engine.active_timer().expect("a timer should be running");
        assert!(engine.tick(token));
    }
}

fn sorted(mut ids: Vec<PeerId>) -> Vec<PeerId> {
    ids.sort();
    ids
}

#[derive(Default)]
struct Log {
    events: Vec<GameEvent>,
    timer: Vec<u32>,
    scores: usize,
}

struct LogObserver(Rc<RefCell<Log>>);

impl GameObserver for LogObserver {
    fn on_timer_update(&mut self, seconds_remaining: u32) {
        self.0.borrow_mut().timer.push(seconds_remaining);
    }

    fn on_score_update(&mut self) {
        self.0.borrow_mut().scores += 1;
    }

    fn on_game_state_change(&mut self, event: GameEvent) {
        self.0.borrow_mut().events.push(event);
    }
}

/// Two rounds with two players: four turns, then the game ends.
#[test]
fn game_runs_every_round_then_ends() {
    let mut engine = GameEngine::new(quick_config(), 7);
    engine.add_player(PeerId(1), "Alice");
    engine.add_player(PeerId(2), "Bob");
    assert!(engine.start_game());

    let mut drawers = Vec::new();
    while engine.phase() != GamePhase::GameEnd {
        assert_eq!(engine.phase(), GamePhase::Playing);
        drawers.push(engine.current_drawer().expect("drawer"));
        let word = engine.word_choices().remove(0);
        assert!(engine.select_word(&word));
        run_ticks(&mut engine, 10 + 2);
    }

    assert_eq!(drawers, vec![PeerId(1), PeerId(2), PeerId(1), PeerId(2)]);
    assert_eq!(engine.current_round(), 2);
    assert!(engine.active_timer().is_none());
}

/// Joins and leaves between turns keep the turn order a permutation of the
/// roster.
#[test]
fn turn_order_tracks_roster_changes() {
    let mut engine = GameEngine::new(quick_config(), 3);
    let mut rng = GameRng::seed_from_u64(42);
    for id in 1..=3 {
        engine.add_player(PeerId(id), &format!("p{id}"));
    }
    assert!(engine.start_game());

    let mut next_id = 4;
    for _ in 0..6 {
        assert_eq!(
            sorted(engine.turn_order().to_vec()),
            sorted(engine.roster().ids())
        );
        if engine.phase() == GamePhase::GameEnd {
            break;
        }

        if rng.index(2) == 0 && engine.roster().len() > 2 {
            let ids = engine.roster().ids();
            let victim = ids[rng.index(ids.len())];
            engine.remove_player(victim);
        } else {
            engine.add_player(PeerId(next_id), "late");
            next_id += 1;
        }

        if engine.phase() == GamePhase::Playing {
            engine.select_word("tree");
        }
        if engine.phase() == GamePhase::TurnActive {
            engine.end_turn();
        }
        run_ticks(&mut engine, 2);
    }
}

#[test]
fn guess_scoring_uses_remaining_time() {
    let mut engine = GameEngine::new(quick_config(), 9);
    engine.add_player(PeerId(1), "drawer");
    engine.add_player(PeerId(2), "fast");
    engine.add_player(PeerId(3), "slow");
    engine.start_game();
    engine.select_word("나무");

    assert_eq!(engine.check_answer(PeerId(2), "나무").score, Some(150));
    run_ticks(&mut engine, 9);
    assert_eq!(engine.check_answer(PeerId(3), " 나무 ").score, Some(105));
    assert_eq!(engine.phase(), GamePhase::TurnEnd);

    let ranking = engine.ranking();
    assert_eq!(ranking[0].peer_id, PeerId(2));
    assert_eq!(ranking[1].peer_id, PeerId(3));
    assert_eq!(ranking[2].score, 0);
}

#[test]
fn observers_see_the_turn_lifecycle_until_unsubscribed() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut engine = GameEngine::new(quick_config(), 5);
    let id = engine.subscribe(Box::new(LogObserver(log.clone())));

    engine.add_player(PeerId(1), "a");
    engine.add_player(PeerId(2), "b");
    engine.start_game();
    engine.select_word("cat");
    run_ticks(&mut engine, 10);

    {
        let log = log.borrow();
        assert_eq!(
            log.events,
            vec![
                GameEvent::TurnStart,
                GameEvent::Drawing,
                GameEvent::Hint,
                GameEvent::Hint,
                GameEvent::TurnEnd,
            ]
        );
        assert_eq!(log.timer, (0..10).rev().collect::<Vec<u32>>());
        assert!(log.scores >= 3);
    }

    assert!(engine.unsubscribe(id));
    run_ticks(&mut engine, 2);
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(log.borrow().events.len(), 5);
}

#[test]
fn hint_level_never_goes_backwards_within_a_turn() {
    let mut engine = GameEngine::new(quick_config(), 2);
    engine.add_player(PeerId(1), "a");
    engine.add_player(PeerId(2), "b");
    engine.start_game();
    engine.select_word("apple");

    let mut last = HintLevel::Hidden;
    for _ in 0..9 {
        run_ticks(&mut engine, 1);
        assert!(engine.hint_level() >= last);
        last = engine.hint_level();
    }
    assert_eq!(engine.hint(), "a _ p _ _");
}

#[test]
fn announced_profiles_are_kept_verbatim() {
    let mut engine = GameEngine::new(GameConfig::default(), 1);
    let profile = Profile {
        avatar: "🦊".into(),
        color: "#2A9D8F".into(),
    };
    assert!(engine.add_player_with_profile(PeerId(5), "fox", profile.clone()));
    assert!(!engine.add_player_with_profile(PeerId(5), "fox", profile.clone()));
    assert_eq!(engine.player(PeerId(5)).map(|p| &p.profile), Some(&profile));
}

#[test]
fn guesses_outside_an_active_turn_are_ignored() {
    let mut engine = GameEngine::new(quick_config(), 1);
    engine.add_player(PeerId(1), "a");
    engine.add_player(PeerId(2), "b");
    assert!(!engine.check_answer(PeerId(2), "anything").correct);
    engine.start_game();
    assert!(!engine.check_answer(PeerId(2), "").correct);
    assert_eq!(engine.hint(), "");
}
