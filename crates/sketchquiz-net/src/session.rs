//! Async entry points: host a room or join one.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use rand::Rng;
use sketchquiz_core::GameEngine;
use sketchquiz_protocol::{PeerId, RoomId};
use thiserror::Error;
use tracing::info;

use crate::canvas::Canvas;
use crate::config::SessionConfig;
use crate::relay::Relay;
use crate::room::{Room, RoomEvent};
use crate::transport::{Endpoint, HostTransport, JoinTransport, TransportError};

/// Session establishment failed. Surfaced to the caller, never retried.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not reach host at {0}")]
    HostUnreachable(SocketAddr),
}

fn random_peer_id() -> PeerId {
    PeerId(rand::thread_rng().gen())
}

/// Take the host role on a fresh endpoint. The room id is the advertised
/// endpoint address plus the host's own peer id.
pub async fn create_session(
    config: &SessionConfig,
) -> Result<Relay<HostTransport>, ConnectionError> {
    let transport = HostTransport::bind(config)?;
    let room = RoomId::new(random_peer_id(), transport.public_address());
    info!("Hosting room {}", room);
    Ok(Relay::host(transport, room, config.flush_interval()))
}

/// Open a channel to the host of `room`. Resolves once the handshake
/// completes; fails if the host refuses or never answers.
pub async fn join_session(
    room: RoomId,
    config: &SessionConfig,
) -> Result<Relay<JoinTransport>, ConnectionError> {
    let local = random_peer_id();
    let mut transport = JoinTransport::connect(room, local)?;
    let tick = config.tick_interval();
    let mut interval = tokio::time::interval(tick);

    loop {
        interval.tick().await;
        transport.update(tick);
        transport.send_packets();

        if transport.is_connected() {
            info!("Joined room {} as {}", room, local);
            return Ok(Relay::joiner(transport, local, room, config.flush_interval()));
        }
        if transport.is_disconnected() {
            return Err(ConnectionError::HostUnreachable(room.addr));
        }
    }
}

/// A fresh engine seeded from the thread rng, for a room built on `config`.
pub fn new_engine(config: &SessionConfig) -> GameEngine {
    GameEngine::new(config.game.clone(), rand::thread_rng().gen())
}

impl<T: Endpoint, C: Canvas> Room<T, C> {
    /// One transport cycle: receive, dispatch, run timers, send.
    pub fn pump(&mut self, delta: Duration, now: Instant) -> Vec<RoomEvent> {
        let mut out = Vec::new();
        let events = self.relay_mut().transport_mut().pump(delta);
        for event in events {
            out.extend(self.handle_transport(event, now));
        }
        out.extend(self.poll(now));
        self.relay_mut().transport_mut().send_packets();
        out
    }
}
