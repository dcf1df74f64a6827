//! Renet channel configuration for peer links.
//!
//! Channel 0: ReliableOrdered - roster, game control, chat
//! Channel 1: ReliableOrdered - strokes and cursor previews

use std::time::Duration;

use renet::{ChannelConfig, SendType};
use sketchquiz_protocol::{Message, Tier};

/// Channel IDs for different message types
pub mod channel_id {
    /// Infrastructure and game messages
    pub const CONTROL: u8 = 0;
    /// Batched drawing traffic
    pub const STROKE: u8 = 1;
}

/// Maximum bytes per channel
const MAX_CHANNEL_MEMORY: usize = 5 * 1024 * 1024; // 5 MB

/// Logical lane a frame travels on. Each lane keeps its own order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    Control,
    Stroke,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Control, Lane::Stroke];

    pub fn for_message(message: &Message) -> Self {
        match message.tier() {
            Tier::Immediate => Lane::Control,
            Tier::Batched => Lane::Stroke,
        }
    }

    pub fn channel_id(self) -> u8 {
        match self {
            Lane::Control => channel_id::CONTROL,
            Lane::Stroke => channel_id::STROKE,
        }
    }
}

/// Create channel configurations shared by host and joiners
pub fn create_channel_configs() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            channel_id: channel_id::CONTROL,
            max_memory_usage_bytes: MAX_CHANNEL_MEMORY,
            send_type: SendType::ReliableOrdered {
                resend_time: Duration::from_millis(300),
            },
        },
        // Strokes resend faster; a dropped segment stalls the whole lane
        ChannelConfig {
            channel_id: channel_id::STROKE,
            max_memory_usage_bytes: MAX_CHANNEL_MEMORY,
            send_type: SendType::ReliableOrdered {
                resend_time: Duration::from_millis(100),
            },
        },
    ]
}
