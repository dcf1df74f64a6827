//! The seam between the relay and whatever moves bytes between peers.

use sketchquiz_protocol::PeerId;
use thiserror::Error;

use crate::channels::Lane;

/// Per-link failure. Reported and dropped, never retried.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link to {0} is not open")]
    NotOpen(PeerId),
    #[error("link to {peer} failed: {reason}")]
    Failed { peer: PeerId, reason: String },
}

/// Something that happened on the transport since the last pump.
#[derive(Debug)]
pub enum TransportEvent {
    LinkOpened(PeerId),
    LinkClosed(PeerId),
    Data { from: PeerId, bytes: Vec<u8> },
    LinkError(LinkError),
}

/// Bidirectional, reliable, ordered channels to named peers.
pub trait Transport {
    fn send(&mut self, peer: PeerId, lane: Lane, bytes: Vec<u8>) -> Result<(), LinkError>;

    /// Close one link. Closing an unknown peer is a no-op.
    fn close(&mut self, peer: PeerId);

    /// Close every link and release the endpoint.
    fn shutdown(&mut self);
}

/// Relay-side record of one open link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerLink {
    pub peer_id: PeerId,
    pub open: bool,
}
