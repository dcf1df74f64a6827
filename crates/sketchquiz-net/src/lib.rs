//! Sketch Quiz session layer
//!
//! Host-relay star topology over renet: the host accepts joiners, relays
//! their traffic to each other, and every participant runs its own game
//! engine fed by the shared message stream.

pub mod canvas;
pub mod channels;
pub mod config;
pub mod link;
pub mod relay;
pub mod room;
pub mod session;
pub mod transport;

pub use canvas::{Brush, Canvas, NullCanvas};
pub use channels::*;
pub use config::SessionConfig;
pub use link::{LinkError, PeerLink, Transport, TransportEvent};
pub use relay::{Delivery, Relay, SessionEvent, DEFAULT_FLUSH_INTERVAL};
pub use room::{Room, RoomEvent};
pub use session::{create_session, join_session, new_engine, ConnectionError};
pub use transport::{Endpoint, HostTransport, JoinTransport, TransportError, PROTOCOL_ID};
