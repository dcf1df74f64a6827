use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::PeerId;
use crate::message::Message;

/// Unit written to a peer link: a message plus the peer that produced it.
///
/// The origin survives relaying, so a joiner can attribute traffic the host
/// forwarded on someone else's behalf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: PeerId,
    pub message: Message,
}

impl Frame {
    pub fn new(origin: PeerId, message: Message) -> Self {
        Self { origin, message }
    }
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
}

/// Encode a frame as MessagePack with named fields.
///
/// Named fields keep the `type` discriminator addressable, which the
/// internally tagged `Message` needs to decode.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec_named(frame)?)
}

/// Decode a frame. Unknown message types and truncated payloads both surface
/// as [`WireError::Decode`].
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, WireError> {
    Ok(decode::from_slice(bytes)?)
}
