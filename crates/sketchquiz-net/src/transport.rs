//! Transport layer using renet_netcode for UDP communication.
//!
//! The host runs a `RenetServer`; every joiner runs a `RenetClient` pointed
//! at the room address. Both sides translate renet activity into
//! [`TransportEvent`]s for the relay.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use renet::{ConnectionConfig, RenetClient, RenetServer, ServerEvent};
use renet_netcode::{
    ClientAuthentication, NetcodeClientTransport, NetcodeServerTransport, ServerAuthentication,
    ServerConfig,
};
use sketchquiz_protocol::{PeerId, RoomId};
use tracing::{error, info};

use crate::channels::{create_channel_configs, Lane};
use crate::config::SessionConfig;
use crate::link::{LinkError, Transport, TransportEvent};

/// Protocol ID for Sketch Quiz (must match between host and joiners)
pub const PROTOCOL_ID: u64 = 0x534B_5143_0001;

/// Transport error types
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to bind socket to {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Failed to determine bound address for {0}: {1}")]
    LocalAddrFailed(SocketAddr, std::io::Error),

    #[error("Failed to configure socket: {0}")]
    SocketConfig(std::io::Error),

    #[error("Failed to create transport: {0}")]
    TransportCreation(String),
}

fn connection_config() -> ConnectionConfig {
    ConnectionConfig {
        available_bytes_per_tick: 60_000,
        server_channels_config: create_channel_configs(),
        client_channels_config: create_channel_configs(),
    }
}

fn current_time() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

fn bind_socket(addr: SocketAddr) -> Result<(UdpSocket, SocketAddr), TransportError> {
    let socket = UdpSocket::bind(addr).map_err(|e| TransportError::BindFailed(addr, e))?;
    let bound = socket
        .local_addr()
        .map_err(|e| TransportError::LocalAddrFailed(addr, e))?;
    socket
        .set_nonblocking(true)
        .map_err(TransportError::SocketConfig)?;
    Ok((socket, bound))
}

/// Address joiners should dial. A wildcard bind is advertised on loopback
/// unless a public address is configured.
fn advertised_address(config: &SessionConfig, bound: SocketAddr) -> SocketAddr {
    if let Some(public) = config.public_address {
        return public;
    }
    if bound.ip().is_unspecified() {
        SocketAddr::from(([127, 0, 0, 1], bound.port()))
    } else {
        bound
    }
}

/// A [`Transport`] backed by real sockets that must be pumped every tick.
pub trait Endpoint: Transport {
    /// Receive packets and report what changed since the last pump.
    fn pump(&mut self, delta: Duration) -> Vec<TransportEvent>;

    /// Write queued messages to the network.
    fn send_packets(&mut self);
}

/// Host end: one renet connection per joiner.
pub struct HostTransport {
    server: RenetServer,
    transport: NetcodeServerTransport,
    public_address: SocketAddr,
    shut_down: bool,
}

impl HostTransport {
    pub fn bind(config: &SessionConfig) -> Result<Self, TransportError> {
        let (socket, bound) = bind_socket(config.bind_address)?;
        let public_address = advertised_address(config, bound);

        let server_config = ServerConfig {
            current_time: current_time(),
            max_clients: config.max_clients,
            protocol_id: PROTOCOL_ID,
            public_addresses: vec![public_address],
            authentication: ServerAuthentication::Unsecure,
        };

        let transport = NetcodeServerTransport::new(server_config, socket)
            .map_err(|e| TransportError::TransportCreation(e.to_string()))?;

        info!(
            "Transport bound to {} (max {} clients, protocol {:016x})",
            bound, config.max_clients, PROTOCOL_ID
        );

        Ok(Self {
            server: RenetServer::new(connection_config()),
            transport,
            public_address,
            shut_down: false,
        })
    }

    /// Address advertised in the room id
    pub fn public_address(&self) -> SocketAddr {
        self.public_address
    }

    fn receive(&mut self, delta: Duration) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        if self.shut_down {
            return events;
        }

        self.server.update(delta);
        if let Err(e) = self.transport.update(delta, &mut self.server) {
            error!("Transport update error: {}", e);
        }

        while let Some(event) = self.server.get_event() {
            match event {
                ServerEvent::ClientConnected { client_id } => {
                    info!("Client {:016x} connected", client_id);
                    events.push(TransportEvent::LinkOpened(PeerId(client_id)));
                }
                ServerEvent::ClientDisconnected { client_id, reason } => {
                    info!("Client {:016x} disconnected: {:?}", client_id, reason);
                    events.push(TransportEvent::LinkClosed(PeerId(client_id)));
                }
            }
        }

        for client_id in self.server.clients_id() {
            for lane in Lane::ALL {
                while let Some(bytes) = self.server.receive_message(client_id, lane.channel_id()) {
                    events.push(TransportEvent::Data {
                        from: PeerId(client_id),
                        bytes: bytes.to_vec(),
                    });
                }
            }
        }

        events
    }
}

impl Endpoint for HostTransport {
    fn pump(&mut self, delta: Duration) -> Vec<TransportEvent> {
        self.receive(delta)
    }

    fn send_packets(&mut self) {
        if !self.shut_down {
            self.transport.send_packets(&mut self.server);
        }
    }
}

impl Transport for HostTransport {
    fn send(&mut self, peer: PeerId, lane: Lane, bytes: Vec<u8>) -> Result<(), LinkError> {
        if self.shut_down || !self.server.is_connected(peer.raw()) {
            return Err(LinkError::NotOpen(peer));
        }
        self.server.send_message(peer.raw(), lane.channel_id(), bytes);
        Ok(())
    }

    fn close(&mut self, peer: PeerId) {
        self.server.disconnect(peer.raw());
    }

    fn shutdown(&mut self) {
        if !self.shut_down {
            self.transport.disconnect_all(&mut self.server);
            self.shut_down = true;
        }
    }
}

/// Joiner end: a single renet connection to the host.
pub struct JoinTransport {
    client: RenetClient,
    transport: NetcodeClientTransport,
    host: PeerId,
    events: Vec<TransportEvent>,
    opened: bool,
    closed: bool,
}

impl JoinTransport {
    pub fn connect(room: RoomId, local: PeerId) -> Result<Self, TransportError> {
        let bind_addr = if room.addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let (socket, _) = bind_socket(bind_addr)?;

        let authentication = ClientAuthentication::Unsecure {
            client_id: local.raw(),
            protocol_id: PROTOCOL_ID,
            server_addr: room.addr,
            user_data: None,
        };

        let transport = NetcodeClientTransport::new(current_time(), authentication, socket)
            .map_err(|e| TransportError::TransportCreation(e.to_string()))?;

        info!(
            "Connecting to {} (protocol {:016x})",
            room.addr, PROTOCOL_ID
        );

        Ok(Self {
            client: RenetClient::new(connection_config()),
            transport,
            host: room.host,
            events: Vec::new(),
            opened: false,
            closed: false,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub fn is_disconnected(&self) -> bool {
        self.client.is_disconnected()
    }

    /// Exchange packets with the host. Events are queued until the next
    /// [`Endpoint::pump`], so nothing is lost while the handshake is polled.
    pub fn update(&mut self, delta: Duration) {
        if self.closed {
            return;
        }

        self.client.update(delta);
        if let Err(e) = self.transport.update(delta, &mut self.client) {
            self.events.push(TransportEvent::LinkError(LinkError::Failed {
                peer: self.host,
                reason: e.to_string(),
            }));
        }

        if !self.opened && self.client.is_connected() {
            self.opened = true;
            self.events.push(TransportEvent::LinkOpened(self.host));
        }

        if self.opened {
            for lane in Lane::ALL {
                while let Some(bytes) = self.client.receive_message(lane.channel_id()) {
                    self.events.push(TransportEvent::Data {
                        from: self.host,
                        bytes: bytes.to_vec(),
                    });
                }
            }
        }

        if self.client.is_disconnected() {
            self.closed = true;
            info!(
                "Disconnected from host: {:?}",
                self.client.disconnect_reason()
            );
            if self.opened {
                self.events.push(TransportEvent::LinkClosed(self.host));
            }
        }
    }

}

impl Endpoint for JoinTransport {
    fn pump(&mut self, delta: Duration) -> Vec<TransportEvent> {
        self.update(delta);
        std::mem::take(&mut self.events)
    }

    fn send_packets(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.transport.send_packets(&mut self.client) {
            error!("Failed to send packets: {}", e);
        }
    }
}

impl Transport for JoinTransport {
    fn send(&mut self, peer: PeerId, lane: Lane, bytes: Vec<u8>) -> Result<(), LinkError> {
        if peer != self.host || self.closed || !self.client.is_connected() {
            return Err(LinkError::NotOpen(peer));
        }
        self.client.send_message(lane.channel_id(), bytes);
        Ok(())
    }

    fn close(&mut self, peer: PeerId) {
        if peer == self.host {
            self.shutdown();
        }
    }

    fn shutdown(&mut self) {
        if !self.closed {
            self.transport.disconnect();
            self.closed = true;
        }
    }
}
