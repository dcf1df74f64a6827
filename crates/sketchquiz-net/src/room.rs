//! One participant's view of a game room.
//!
//! `Room` is the context value threaded through every handler: it owns the
//! relay, this replica's engine and the rendering collaborator. Inbound
//! deliveries are dispatched exhaustively; local actions update the local
//! engine first and then go out through the relay.

use std::time::{Duration, Instant};

use sketchquiz_core::{GameEngine, GamePhase, TimerToken};
use sketchquiz_protocol::{Message, PeerId};
use tracing::{debug, info, warn};

use crate::canvas::{Brush, Canvas};
use crate::link::{Transport, TransportEvent};
use crate::relay::{Delivery, Relay, SessionEvent};

const TICK: Duration = Duration::from_secs(1);

/// What the UI layer needs to hear about beyond engine observer hooks.
#[derive(Clone, Debug, PartialEq)]
pub enum RoomEvent {
    Chat {
        origin: PeerId,
        nickname: String,
        message: String,
    },
    /// A correct answer; the text itself is withheld so the word stays secret
    CorrectGuess {
        origin: PeerId,
        nickname: String,
        score: u32,
    },
    /// Chat that would give the word away, from someone who already knows
    /// it; shown without the text
    Withheld { origin: PeerId, nickname: String },
    PeerCount(usize),
    HostLost,
}

#[derive(Clone, Copy, Debug)]
struct TickSchedule {
    token: TimerToken,
    due: Instant,
}

pub struct Room<T, C> {
    relay: Relay<T>,
    engine: GameEngine,
    canvas: C,
    nickname: String,
    tick: Option<TickSchedule>,
    last_count: usize,
}

impl<T: Transport, C: Canvas> Room<T, C> {
    pub fn new(relay: Relay<T>, mut engine: GameEngine, canvas: C, nickname: &str) -> Self {
        engine.set_local_player(relay.local_peer(), nickname);
        let last_count = relay.participant_count();
        Self {
            relay,
            engine,
            canvas,
            nickname: nickname.to_string(),
            tick: None,
            last_count,
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.relay.local_peer()
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn relay(&self) -> &Relay<T> {
        &self.relay
    }

    pub fn relay_mut(&mut self) -> &mut Relay<T> {
        &mut self.relay
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    // ---- inbound ----

    /// Feed one transport event through the relay and dispatch the result.
    pub fn handle_transport(&mut self, event: TransportEvent, now: Instant) -> Vec<RoomEvent> {
        let session_events = self.relay.handle(event);
        let mut out = Vec::new();
        for event in session_events {
            out.extend(self.handle_session(event, now));
        }
        self.push_peer_count(&mut out);
        out
    }

    pub fn handle_session(&mut self, event: SessionEvent, now: Instant) -> Vec<RoomEvent> {
        match event {
            SessionEvent::Message(delivery) => self.dispatch(delivery, now),
            SessionEvent::PeerConnected(_) => {
                self.announce(now);
                Vec::new()
            }
            SessionEvent::PeerDisconnected(peer) => {
                self.peer_departed(peer);
                Vec::new()
            }
            SessionEvent::HostLost => {
                self.tick = None;
                vec![RoomEvent::HostLost]
            }
        }
    }

    fn dispatch(&mut self, delivery: Delivery, now: Instant) -> Vec<RoomEvent> {
        let Delivery { origin, message } = delivery;
        match message {
            Message::DrawStart {
                x,
                y,
                color,
                size,
                eraser,
            } => {
                let brush = Brush {
                    color,
                    size,
                    eraser,
                };
                self.canvas.stroke_start(origin, x, y, &brush);
            }
            Message::Draw { x, y } => self.canvas.stroke_to(origin, x, y),
            Message::DrawEnd => self.canvas.stroke_end(origin),
            Message::Clear => self.canvas.clear(),
            Message::CursorMove { x, y, color } => {
                self.canvas.cursor_moved(origin, x, y, &color)
            }
            Message::PeerList { .. } | Message::PeerJoined { .. } => self.announce(now),
            Message::PeerLeft { peer_id } => self.peer_departed(peer_id),
            Message::PlayerJoin {
                peer_id,
                nickname,
                profile,
            } => {
                if peer_id != origin {
                    debug!("player-join for {} relayed from {}", peer_id, origin);
                }
                let added = match profile {
                    Some(profile) => self.engine.add_player_with_profile(origin, &nickname, profile),
                    None => self.engine.add_player(origin, &nickname),
                };
                let seated = self.engine.roster().contains(origin);
                if !added && !seated && !self.engine.is_waiting(origin) {
                    warn!("Could not seat {} ({})", nickname, origin);
                }
            }
            Message::StartGame => {
                if origin != self.relay.room_id().host {
                    warn!("Ignoring start-game from non-host {}", origin);
                } else if self.engine.phase() == GamePhase::GameEnd {
                    self.engine.reset_to_lobby();
                    self.engine.start_game();
                } else {
                    self.engine.start_game();
                }
            }
            Message::Chat { nickname, message } => {
                let result = self.engine.check_answer(origin, &message);
                return match result.score {
                    Some(score) if result.correct => vec![RoomEvent::CorrectGuess {
                        origin,
                        nickname,
                        score,
                    }],
                    _ if self.engine.reveals_word(&message) => {
                        debug!("Withholding answer repeated by {}", origin);
                        vec![RoomEvent::Withheld { origin, nickname }]
                    }
                    _ => vec![RoomEvent::Chat {
                        origin,
                        nickname,
                        message,
                    }],
                };
            }
            Message::WordSelected { word } => {
                if self.engine.current_drawer() == Some(origin) {
                    self.engine.select_word(&word);
                } else {
                    warn!("Ignoring word selection from non-drawer {}", origin);
                }
            }
        }
        Vec::new()
    }

    fn peer_departed(&mut self, peer: PeerId) {
        self.canvas.cursor_removed(peer);
        self.engine.remove_player(peer);
    }

    // ---- local actions ----

    /// Tell everyone who this participant is.
    pub fn announce(&mut self, now: Instant) {
        let local = self.local_peer();
        let profile = self.engine.player(local).map(|p| p.profile.clone());
        self.relay.send(
            Message::PlayerJoin {
                peer_id: local,
                nickname: self.nickname.clone(),
                profile,
            },
            true,
            now,
        );
    }

    /// Host only. Starts the local game and tells every replica to follow.
    pub fn start_game(&mut self, now: Instant) -> bool {
        if !self.relay.is_host() {
            warn!("Only the host can start the game");
            return false;
        }
        if self.engine.phase() == GamePhase::GameEnd {
            self.engine.reset_to_lobby();
        }
        if !self.engine.start_game() {
            return false;
        }
        self.relay.send(Message::StartGame, true, now);
        true
    }

    /// Drawer only. Commits the word locally and announces it.
    pub fn choose_word(&mut self, word: &str, now: Instant) -> bool {
        if !self.engine.is_my_turn() {
            warn!("Not this participant's turn to pick a word");
            return false;
        }
        if !self.engine.select_word(word) {
            return false;
        }
        self.relay.send(
            Message::WordSelected {
                word: word.trim().to_string(),
            },
            true,
            now,
        );
        true
    }

    /// Send a chat line, checking it as a guess first. The word typed by
    /// someone who already knows it (the drawer, or a player who guessed) is
    /// swallowed.
    pub fn submit_chat(&mut self, text: &str, now: Instant) -> Option<RoomEvent> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let local = self.local_peer();
        let knows_word = self.engine.is_my_turn()
            || self.engine.player(local).is_some_and(|p| p.has_guessed);
        if knows_word && self.engine.reveals_word(text) {
            info!("Not sending the secret word as chat");
            return None;
        }

        let result = self.engine.check_answer(local, text);
        self.relay.send(
            Message::Chat {
                nickname: self.nickname.clone(),
                message: text.to_string(),
            },
            true,
            now,
        );

        Some(match result.score {
            Some(score) if result.correct => RoomEvent::CorrectGuess {
                origin: local,
                nickname: self.nickname.clone(),
                score,
            },
            _ => RoomEvent::Chat {
                origin: local,
                nickname: self.nickname.clone(),
                message: text.to_string(),
            },
        })
    }

    pub fn draw_start(&mut self, x: f32, y: f32, brush: Brush, now: Instant) {
        self.relay.send(
            Message::DrawStart {
                x,
                y,
                color: brush.color,
                size: brush.size,
                eraser: brush.eraser,
            },
            false,
            now,
        );
    }

    pub fn draw_to(&mut self, x: f32, y: f32, now: Instant) {
        self.relay.send(Message::Draw { x, y }, false, now);
    }

    pub fn draw_end(&mut self, now: Instant) {
        self.relay.send(Message::DrawEnd, false, now);
    }

    pub fn clear(&mut self, now: Instant) {
        self.relay.send(Message::Clear, false, now);
    }

    pub fn move_cursor(&mut self, x: f32, y: f32, color: &str, now: Instant) {
        self.relay.send(
            Message::CursorMove {
                x,
                y,
                color: color.to_string(),
            },
            false,
            now,
        );
    }

    // ---- time ----

    /// Drive the flush deadline and the engine's one-second timer.
    pub fn poll(&mut self, now: Instant) -> Vec<RoomEvent> {
        self.relay.poll(now);

        loop {
            let Some(token) = self.engine.active_timer() else {
                self.tick = None;
                break;
            };
            match self.tick {
                Some(schedule) if schedule.token == token => {
                    if schedule.due > now {
                        break;
                    }
                    self.tick = Some(TickSchedule {
                        token,
                        due: schedule.due + TICK,
                    });
                    self.engine.tick(token);
                }
                _ => {
                    self.tick = Some(TickSchedule {
                        token,
                        due: now + TICK,
                    });
                    break;
                }
            }
        }

        let mut out = Vec::new();
        self.push_peer_count(&mut out);
        out
    }

    /// Earliest instant `poll` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let tick = self.tick.map(|t| t.due);
        match (self.relay.next_flush(), tick) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Leave the session. Safe to call more than once.
    pub fn disconnect(&mut self) {
        self.tick = None;
        self.relay.disconnect();
    }

    fn push_peer_count(&mut self, out: &mut Vec<RoomEvent>) {
        let count = self.relay.participant_count();
        if count != self.last_count {
            self.last_count = count;
            out.push(RoomEvent::PeerCount(count));
        }
    }
}

impl<T, C> std::fmt::Debug for Room<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("relay", &self.relay)
            .field("engine", &self.engine)
            .field("nickname", &self.nickname)
            .finish()
    }
}
