//! Rendering collaborator.
//!
//! The session never paints anything itself. Remote drawing traffic is
//! handed to a [`Canvas`], keyed by the peer that produced it.

use sketchquiz_protocol::PeerId;

/// Pen settings carried by `draw-start`.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    pub color: String,
    pub size: f32,
    pub eraser: bool,
}

pub trait Canvas {
    fn stroke_start(&mut self, peer: PeerId, x: f32, y: f32, brush: &Brush);

    fn stroke_to(&mut self, peer: PeerId, x: f32, y: f32);

    fn stroke_end(&mut self, peer: PeerId);

    fn clear(&mut self);

    fn cursor_moved(&mut self, peer: PeerId, x: f32, y: f32, color: &str);

    /// Drop the peer's cursor indicator, e.g. after it left.
    fn cursor_removed(&mut self, peer: PeerId);
}

/// Canvas for headless participants.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn stroke_start(&mut self, _peer: PeerId, _x: f32, _y: f32, _brush: &Brush) {}

    fn stroke_to(&mut self, _peer: PeerId, _x: f32, _y: f32) {}

    fn stroke_end(&mut self, _peer: PeerId) {}

    fn clear(&mut self) {}

    fn cursor_moved(&mut self, _peer: PeerId, _x: f32, _y: f32, _color: &str) {}

    fn cursor_removed(&mut self, _peer: PeerId) {}
}
