use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_core::PlayerId;
use cardroom_room::RoomStatus;
use serde::Serialize;

/// Messages sent from server to client over the websocket (§6). Every
/// variant carries the originating room code and a send-time timestamp
/// (milliseconds since the epoch) so a client can order events and ignore
/// stale ones after a reconnect.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ServerMessage {
    PlayerJoined { room: String, at: u64, player: PlayerId, nickname: String, is_bot: bool },
    PlayerLeft { room: String, at: u64, player: PlayerId, was_replaced: bool },
    LeadershipTransferred { room: String, at: u64, new_leader: PlayerId },
    PlayerKicked { room: String, at: u64, player: PlayerId },
    RoomStateChanged { room: String, at: u64, status: RoomStatus },
    GameStarted { room: String, at: u64, hand_size: usize },
    CardPlayed { room: String, at: u64, player: PlayerId, card: Card },
    CardDrawn { room: String, at: u64, player: PlayerId, count: u32 },
    OneCalled { room: String, at: u64, player: PlayerId },
    OnePenalty { room: String, at: u64, player: PlayerId, cards: u32 },
    TurnChanged { room: String, at: u64, player: PlayerId },
    DirectionReversed { room: String, at: u64, clockwise: bool },
    PlayerSkipped { room: String, at: u64, player: PlayerId },
    ColorChanged { room: String, at: u64, color: Color },
    PlayerDisconnected { room: String, at: u64, player: PlayerId },
    PlayerReconnected { room: String, at: u64, player: PlayerId },
    GamePaused { room: String, at: u64 },
    GameResumed { room: String, at: u64 },
    GameEnded { room: String, at: u64, winner: Option<PlayerId>, reason: String },
    HandSnapshot { room: String, at: u64, hand: Vec<Card> },
    Error { room: String, at: u64, code: &'static str, message: String },
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("server message always serializes")
    }
}
