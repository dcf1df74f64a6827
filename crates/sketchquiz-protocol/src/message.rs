//! Messages exchanged over peer links.
//!
//! One closed enum covers drawing traffic, session infrastructure and game
//! coordination. It is decoded once at the relay boundary; everything
//! downstream matches on the variants.

use serde::{Deserialize, Serialize};

use crate::ids::PeerId;

/// Avatar/color pair shown next to a player's nickname.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub avatar: String,
    pub color: String,
}

/// Delivery tier used by the sender's scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Written to every open link as soon as it is sent.
    Immediate,
    /// Queued and drained on the next flush.
    Batched,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    /// Pen down.
    DrawStart {
        x: f32,
        y: f32,
        color: String,
        size: f32,
        #[serde(default)]
        eraser: bool,
    },
    /// Pen moved while down.
    Draw { x: f32, y: f32 },
    /// Pen up.
    DrawEnd,
    /// Wipe the canvas.
    Clear,
    /// Pointer preview for other participants.
    CursorMove { x: f32, y: f32, color: String },
    /// Roster snapshot sent by the host to a newcomer.
    PeerList { peers: Vec<PeerId> },
    /// Someone connected to the host.
    #[serde(rename_all = "camelCase")]
    PeerJoined { peer_id: PeerId },
    /// Someone's link to the host closed.
    #[serde(rename_all = "camelCase")]
    PeerLeft { peer_id: PeerId },
    /// A participant announces itself to the game.
    #[serde(rename_all = "camelCase")]
    PlayerJoin {
        peer_id: PeerId,
        nickname: String,
        #[serde(default)]
        profile: Option<Profile>,
    },
    StartGame,
    Chat { nickname: String, message: String },
    /// The drawer picked this turn's word.
    WordSelected { word: String },
}

impl Message {
    /// Tier this message uses unless the caller forces immediate delivery.
    pub fn tier(&self) -> Tier {
        match self {
            Message::DrawStart { .. }
            | Message::Draw { .. }
            | Message::DrawEnd
            | Message::Clear
            | Message::CursorMove { .. } => Tier::Batched,
            Message::PeerList { .. }
            | Message::PeerJoined { .. }
            | Message::PeerLeft { .. }
            | Message::PlayerJoin { .. }
            | Message::StartGame
            | Message::Chat { .. }
            | Message::WordSelected { .. } => Tier::Immediate,
        }
    }

    /// Session bookkeeping produced by the host, not by players.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Message::PeerList { .. } | Message::PeerJoined { .. } | Message::PeerLeft { .. }
        )
    }

    /// Wire tag, useful in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::DrawStart { .. } => "draw-start",
            Message::Draw { .. } => "draw",
            Message::DrawEnd => "draw-end",
            Message::Clear => "clear",
            Message::CursorMove { .. } => "cursor-move",
            Message::PeerList { .. } => "peer-list",
            Message::PeerJoined { .. } => "peer-joined",
            Message::PeerLeft { .. } => "peer-left",
            Message::PlayerJoin { .. } => "player-join",
            Message::StartGame => "start-game",
            Message::Chat { .. } => "chat",
            Message::WordSelected { .. } => "word-selected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_traffic_is_batched() {
        let batched = [
            Message::DrawStart {
                x: 1.0,
                y: 2.0,
                color: "#000000".into(),
                size: 3.0,
                eraser: false,
            },
            Message::Draw { x: 1.0, y: 2.0 },
            Message::DrawEnd,
            Message::Clear,
            Message::CursorMove {
                x: 0.0,
                y: 0.0,
                color: "#FF6B6B".into(),
            },
        ];
        for msg in &batched {
            assert_eq!(msg.tier(), Tier::Batched, "{}", msg.kind());
        }
    }

    #[test]
    fn coordination_traffic_is_immediate() {
        let immediate = [
            Message::PeerList { peers: vec![] },
            Message::PeerJoined { peer_id: PeerId(1) },
            Message::PeerLeft { peer_id: PeerId(1) },
            Message::PlayerJoin {
                peer_id: PeerId(1),
                nickname: "민수".into(),
                profile: None,
            },
            Message::StartGame,
            Message::Chat {
                nickname: "민수".into(),
                message: "사과".into(),
            },
            Message::WordSelected { word: "사과".into() },
        ];
        for msg in &immediate {
            assert_eq!(msg.tier(), Tier::Immediate, "{}", msg.kind());
        }
    }

    #[test]
    fn json_shape_uses_type_discriminator() {
        let json = serde_json::to_value(Message::PeerJoined { peer_id: PeerId(7) }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "peer-joined", "peerId": 7 }));

        let json = serde_json::to_value(Message::DrawEnd).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "draw-end" }));
    }

    #[test]
    fn draw_start_without_eraser_flag_decodes() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "type": "draw-start", "x": 1.0, "y": 2.0, "color": "#000000", "size": 3.0
        }))
        .unwrap();
        assert!(matches!(msg, Message::DrawStart { eraser: false, .. }));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_value(serde_json::json!({ "type": "teleport" }));
        assert!(result.is_err());
    }
}
