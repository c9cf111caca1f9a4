use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_core::PlayerId;
use cardroom_core::ID;
use serde::Deserialize;

use crate::event::Event;
use crate::message::ServerMessage;

/// Inbound client frames (§6). Room-management frames and gameplay moves
/// share one wire shape; [`crate::scheduler::Scheduler`] routes each to the
/// right handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientFrame {
    Authenticate { token: String },
    JoinRoom { code: String, nickname: String },
    LeaveRoom,
    AddBot,
    RemoveBot { bot: PlayerId },
    Kick { player: PlayerId },
    StartGame,
    PlayCard {
        card: ID<Card>,
        #[serde(default)]
        declared_color: Option<Color>,
        #[serde(default)]
        call_one: bool,
    },
    DrawCard,
    CallOne,
    CatchOne { target: PlayerId },
}

/// Malformed inbound frame (§7 — distinct from [`cardroom_engine::EngineError`],
/// which covers frames that parsed fine but are illegal to apply).
#[derive(Debug, Clone)]
pub struct ProtocolError(pub String);

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed frame: {}", self.0)
    }
}

impl std::error::Error for ProtocolError {}

/// Stateless translation between internal [`Event`]s and wire
/// [`ServerMessage`]s, and between raw client text and [`ClientFrame`]s.
pub struct Protocol;

impl Protocol {
    /// Every `Event` has a wire representation, unlike a pure broadcast bus
    /// that might filter some out before reaching the client.
    pub fn encode(room: &str, event: &Event, at: u64) -> ServerMessage {
        let room = room.to_string();
        match event.clone() {
            Event::PlayerJoined { player, nickname, is_bot } => {
                ServerMessage::PlayerJoined { room, at, player, nickname, is_bot }
            }
            Event::PlayerLeft { player, was_replaced } => {
                ServerMessage::PlayerLeft { room, at, player, was_replaced }
            }
            Event::LeadershipTransferred { new_leader } => {
                ServerMessage::LeadershipTransferred { room, at, new_leader }
            }
            Event::PlayerKicked { player } => ServerMessage::PlayerKicked { room, at, player },
            Event::RoomStateChanged { status } => ServerMessage::RoomStateChanged { room, at, status },
            Event::GameStarted { hand_size } => ServerMessage::GameStarted { room, at, hand_size },
            Event::CardPlayed { player, card } => ServerMessage::CardPlayed { room, at, player, card },
            Event::CardDrawn { player, count } => ServerMessage::CardDrawn { room, at, player, count },
            Event::OneCalled { player } => ServerMessage::OneCalled { room, at, player },
            Event::OnePenalty { player, cards } => ServerMessage::OnePenalty { room, at, player, cards },
            Event::TurnChanged { player } => ServerMessage::TurnChanged { room, at, player },
            Event::DirectionReversed { clockwise } => ServerMessage::DirectionReversed { room, at, clockwise },
            Event::PlayerSkipped { player } => ServerMessage::PlayerSkipped { room, at, player },
            Event::ColorChanged { color } => ServerMessage::ColorChanged { room, at, color },
            Event::PlayerDisconnected { player } => ServerMessage::PlayerDisconnected { room, at, player },
            Event::PlayerReconnected { player } => ServerMessage::PlayerReconnected { room, at, player },
            Event::GamePaused => ServerMessage::GamePaused { room, at },
            Event::GameResumed => ServerMessage::GameResumed { room, at },
            Event::GameEnded { winner, reason } => ServerMessage::GameEnded { room, at, winner, reason },
            Event::HandSnapshot { hand, .. } => ServerMessage::HandSnapshot { room, at, hand },
            Event::Error { error, .. } => {
                ServerMessage::Error { room, at, code: error.code(), message: error.to_string() }
            }
        }
    }

    /// Parses a raw client text frame into a [`ClientFrame`].
    pub fn decode(raw: &str) -> Result<ClientFrame, ProtocolError> {
        serde_json::from_str(raw).map_err(|e| ProtocolError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_play_card_frame() {
        let card = ID::<Card>::default();
        let raw = format!(
            r#"{{"type":"PLAY_CARD","card":"{card}","declared_color":"RED","call_one":true}}"#
        );
        let frame = Protocol::decode(&raw).unwrap();
        assert!(matches!(frame, ClientFrame::PlayCard { call_one: true, .. }));
    }

    #[test]
    fn decodes_leave_room_with_no_body() {
        let frame = Protocol::decode(r#"{"type":"LEAVE_ROOM"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::LeaveRoom));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Protocol::decode("not json").is_err());
    }

    #[test]
    fn encodes_turn_changed_with_room_and_timestamp() {
        let player = PlayerId::default();
        let message = Protocol::encode("ABC123", &Event::TurnChanged { player }, 42);
        match message {
            ServerMessage::TurnChanged { room, at, player: p } => {
                assert_eq!(room, "ABC123");
                assert_eq!(at, 42);
                assert_eq!(p, player);
            }
            _ => panic!("expected TurnChanged"),
        }
    }
}
