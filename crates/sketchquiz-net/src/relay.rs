//! Star-topology session core.
//!
//! The host holds one link per joiner; a joiner holds a single link to the
//! host. The host re-broadcasts everything a joiner sends (except roster
//! snapshots) to every other joiner, so all participants see one stream.
//!
//! Outbound traffic has two tiers. Immediate messages are written to every
//! open link on the spot. Batched messages wait in a FIFO queue drained by a
//! single flush deadline, armed by the first queued message and never pushed
//! back by later ones. The relay is sans-IO: time enters through `now`
//! arguments and bytes leave through a [`Transport`].

use std::time::{Duration, Instant};

use sketchquiz_protocol::{decode_frame, encode_frame, Frame, Message, PeerId, RoomId, Tier};
use tracing::{debug, info, warn};

use crate::channels::Lane;
use crate::link::{LinkError, PeerLink, Transport, TransportEvent};

pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(16);

/// A decoded message and the participant that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub origin: PeerId,
    pub message: Message,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Message(Delivery),
    /// A link opened: a joiner on the host, the host on a joiner
    PeerConnected(PeerId),
    /// A joiner's link to the host closed
    PeerDisconnected(PeerId),
    /// The host link closed; the session is over
    HostLost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Host,
    Joiner,
}

pub struct Relay<T> {
    transport: T,
    local: PeerId,
    room: RoomId,
    role: Role,
    links: Vec<PeerLink>,
    /// Joiner's count, fed only by infrastructure messages
    participants: usize,
    pending: Vec<(Lane, Vec<u8>)>,
    flush_at: Option<Instant>,
    flush_interval: Duration,
    closed: bool,
}

impl<T: Transport> Relay<T> {
    /// Session owned by the local participant, reachable at `room`.
    pub fn host(transport: T, room: RoomId, flush_interval: Duration) -> Self {
        Self::new(transport, room.host, room, Role::Host, flush_interval)
    }

    /// Session joined through `room` as `local`.
    pub fn joiner(transport: T, local: PeerId, room: RoomId, flush_interval: Duration) -> Self {
        Self::new(transport, local, room, Role::Joiner, flush_interval)
    }

    fn new(transport: T, local: PeerId, room: RoomId, role: Role, flush_interval: Duration) -> Self {
        Self {
            transport,
            local,
            room,
            role,
            links: Vec::new(),
            participants: 1,
            pending: Vec::new(),
            flush_at: None,
            flush_interval,
            closed: false,
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.local
    }

    pub fn room_id(&self) -> RoomId {
        self.room
    }

    pub fn is_host(&self) -> bool {
        self.role == Role::Host
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Participants in the session, the local one included.
    pub fn participant_count(&self) -> usize {
        match self.role {
            Role::Host => self.open_links().count() + 1,
            Role::Joiner => self.participants,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Route one transport event to the matching handler.
    pub fn handle(&mut self, event: TransportEvent) -> Vec<SessionEvent> {
        match event {
            TransportEvent::LinkOpened(peer) => self.link_opened(peer),
            TransportEvent::LinkClosed(peer) => self.link_closed(peer),
            TransportEvent::Data { from, bytes } => self.receive(from, &bytes),
            TransportEvent::LinkError(err) => {
                self.link_failed(err);
                Vec::new()
            }
        }
    }

    pub fn link_opened(&mut self, peer: PeerId) -> Vec<SessionEvent> {
        if self.closed {
            self.transport.close(peer);
            return Vec::new();
        }
        if self.links.iter().any(|l| l.peer_id == peer) {
            return Vec::new();
        }
        self.links.push(PeerLink {
            peer_id: peer,
            open: true,
        });
        info!("Link to {} opened", peer);

        if self.is_host() {
            // Snapshot first, so the newcomer never sees itself announced
            // before it knows the roster.
            let peers: Vec<PeerId> = self.open_links().collect();
            self.send_to(peer, Message::PeerList { peers });
            self.broadcast_from(
                self.local,
                Message::PeerJoined { peer_id: peer },
                Some(peer),
            );
        }
        vec![SessionEvent::PeerConnected(peer)]
    }

    pub fn link_closed(&mut self, peer: PeerId) -> Vec<SessionEvent> {
        let before = self.links.len();
        self.links.retain(|l| l.peer_id != peer);
        if self.links.len() == before || self.closed {
            return Vec::new();
        }
        info!("Link to {} closed", peer);

        match self.role {
            Role::Host => {
                self.broadcast_from(self.local, Message::PeerLeft { peer_id: peer }, None);
                vec![SessionEvent::PeerDisconnected(peer)]
            }
            Role::Joiner => {
                warn!("Lost the host {}, session over", peer);
                self.pending.clear();
                self.flush_at = None;
                self.closed = true;
                self.participants = 1;
                self.transport.shutdown();
                vec![SessionEvent::HostLost]
            }
        }
    }

    pub fn link_failed(&mut self, err: LinkError) {
        warn!("{}", err);
    }

    /// Decode one inbound payload, relay it if hosting, and hand it back for
    /// local dispatch. Undecodable payloads are dropped.
    pub fn receive(&mut self, from: PeerId, bytes: &[u8]) -> Vec<SessionEvent> {
        if self.closed {
            return Vec::new();
        }
        let frame = match decode_frame(bytes) {
            Ok(frame) => frame,
            Err(err) => {
                debug!("Dropping undecodable frame from {}: {}", from, err);
                return Vec::new();
            }
        };

        match self.role {
            Role::Host => {
                if frame.message.is_infrastructure() {
                    debug!("Ignoring {} from joiner {}", frame.message.kind(), from);
                    return Vec::new();
                }
                // A joiner can only speak for itself.
                let delivery = Delivery {
                    origin: from,
                    message: frame.message,
                };
                self.broadcast_from(from, delivery.message.clone(), Some(from));
                vec![SessionEvent::Message(delivery)]
            }
            Role::Joiner => {
                if frame.origin == self.local {
                    return Vec::new();
                }
                self.track_infrastructure(&frame.message);
                vec![SessionEvent::Message(Delivery {
                    origin: frame.origin,
                    message: frame.message,
                })]
            }
        }
    }

    fn track_infrastructure(&mut self, message: &Message) {
        match message {
            Message::PeerList { peers } => self.participants = 1 + peers.len(),
            Message::PeerJoined { .. } => self.participants += 1,
            Message::PeerLeft { .. } => {
                self.participants = self.participants.saturating_sub(1).max(1);
            }
            _ => {}
        }
    }

    /// Send a locally produced message. `immediate` forces the immediate tier
    /// for messages that would otherwise be batched.
    pub fn send(&mut self, message: Message, immediate: bool, now: Instant) {
        if self.closed {
            debug!("Dropping {} on a closed session", message.kind());
            return;
        }
        if immediate || message.tier() == Tier::Immediate {
            self.broadcast_from(self.local, message, None);
            return;
        }

        let lane = Lane::for_message(&message);
        let Some(bytes) = self.encode(self.local, message) else {
            return;
        };
        self.pending.push((lane, bytes));
        if self.flush_at.is_none() {
            self.flush_at = Some(now + self.flush_interval);
        }
    }

    /// Flush if the deadline has passed.
    pub fn poll(&mut self, now: Instant) {
        if self.flush_at.is_some_and(|at| at <= now) {
            self.flush();
        }
    }

    /// Drain the batched queue to every open link in FIFO order.
    pub fn flush(&mut self) {
        self.flush_at = None;
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        for (lane, bytes) in pending {
            self.write_all(lane, &bytes, None);
        }
    }

    /// When the armed flush is due, if any.
    pub fn next_flush(&self) -> Option<Instant> {
        self.flush_at
    }

    /// Flush what remains, close every link and release the endpoint.
    /// Calling it again does nothing.
    pub fn disconnect(&mut self) {
        if self.closed {
            return;
        }
        self.flush();
        for link in &mut self.links {
            link.open = false;
            self.transport.close(link.peer_id);
        }
        self.links.clear();
        self.transport.shutdown();
        self.closed = true;
        info!("Session {} disconnected", self.room);
    }

    fn open_links(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.links.iter().filter(|l| l.open).map(|l| l.peer_id)
    }

    fn encode(&self, origin: PeerId, message: Message) -> Option<Vec<u8>> {
        match encode_frame(&Frame::new(origin, message)) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!("Failed to encode frame: {}", err);
                None
            }
        }
    }

    fn send_to(&mut self, peer: PeerId, message: Message) {
        let lane = Lane::for_message(&message);
        if let Some(bytes) = self.encode(self.local, message) {
            if let Err(err) = self.transport.send(peer, lane, bytes) {
                self.link_failed(err);
            }
        }
    }

    fn broadcast_from(&mut self, origin: PeerId, message: Message, except: Option<PeerId>) {
        let lane = Lane::for_message(&message);
        if let Some(bytes) = self.encode(origin, message) {
            self.write_all(lane, &bytes, except);
        }
    }

    fn write_all(&mut self, lane: Lane, bytes: &[u8], except: Option<PeerId>) {
        let targets: Vec<PeerId> = self.open_links().filter(|&p| Some(p) != except).collect();
        for peer in targets {
            if let Err(err) = self.transport.send(peer, lane, bytes.to_vec()) {
                self.link_failed(err);
            }
        }
    }
}

impl<T> std::fmt::Debug for Relay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("local", &self.local)
            .field("room", &self.room)
            .field("role", &self.role)
            .field("links", &self.links)
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .finish()
    }
}
