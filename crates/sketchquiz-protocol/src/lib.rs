//! Sketch Quiz wire protocol.
//!
//! Shared by every peer: identifiers, the closed message vocabulary with its
//! delivery tiers, and the MessagePack frame codec.

mod ids;
mod message;
pub mod wire;

pub use crate::ids::*;
pub use crate::message::*;
pub use crate::wire::{decode_frame, encode_frame, Frame, WireError};
