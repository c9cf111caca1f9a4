use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_core::PlayerId;
use cardroom_engine::EngineError;

/// Events broadcast by a room's scheduler to its subscribers (§4.8). Each
/// variant is scoped to the room that raised it; [`crate::table::Table`]
/// does the broadcasting, so `Event` itself carries no room code.
#[derive(Clone, Debug)]
pub enum Event {
    PlayerJoined { player: PlayerId, nickname: String, is_bot: bool },
    PlayerLeft { player: PlayerId, was_replaced: bool },
    LeadershipTransferred { new_leader: PlayerId },
    PlayerKicked { player: PlayerId },
    RoomStateChanged { status: cardroom_room::RoomStatus },
    GameStarted { hand_size: usize },
    CardPlayed { player: PlayerId, card: Card },
    CardDrawn { player: PlayerId, count: u32 },
    OneCalled { player: PlayerId },
    OnePenalty { player: PlayerId, cards: u32 },
    TurnChanged { player: PlayerId },
    DirectionReversed { clockwise: bool },
    PlayerSkipped { player: PlayerId },
    ColorChanged { color: Color },
    PlayerDisconnected { player: PlayerId },
    PlayerReconnected { player: PlayerId },
    GamePaused,
    GameResumed,
    GameEnded { winner: Option<PlayerId>, reason: String },
    /// Private: a player's own hand, sent only to them (§4.9 reconnection).
    HandSnapshot { player: PlayerId, hand: Vec<Card> },
    Error { player: PlayerId, error: EngineError },
}

impl Event {
    /// The seat this event is unicast to, if it is not meant for broadcast.
    pub fn recipient(&self) -> Option<PlayerId> {
        match self {
            Event::HandSnapshot { player, .. } => Some(*player),
            Event::Error { player, .. } => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::PlayerJoined { nickname, .. } => write!(f, "{nickname} joined"),
            Event::PlayerLeft { player, .. } => write!(f, "{player} left"),
            Event::LeadershipTransferred { new_leader } => {
                write!(f, "leadership passed to {new_leader}")
            }
            Event::PlayerKicked { player } => write!(f, "{player} was kicked"),
            Event::RoomStateChanged { status } => write!(f, "room is now {status:?}"),
            Event::GameStarted { hand_size } => write!(f, "game started, hand size {hand_size}"),
            Event::CardPlayed { player, card } => write!(f, "{player} played {card}"),
            Event::CardDrawn { player, count } => write!(f, "{player} drew {count}"),
            Event::OneCalled { player } => write!(f, "{player} called ONE"),
            Event::OnePenalty { player, cards } => write!(f, "{player} caught for {cards}"),
            Event::TurnChanged { player } => write!(f, "{player}'s turn"),
            Event::DirectionReversed { clockwise } => write!(f, "direction reversed, clockwise={clockwise}"),
            Event::PlayerSkipped { player } => write!(f, "{player} skipped"),
            Event::ColorChanged { color } => write!(f, "color declared {color}"),
            Event::PlayerDisconnected { player } => write!(f, "{player} disconnected"),
            Event::PlayerReconnected { player } => write!(f, "{player} reconnected"),
            Event::GamePaused => write!(f, "game paused"),
            Event::GameResumed => write!(f, "game resumed"),
            Event::GameEnded { winner, reason } => write!(f, "game ended ({reason}), winner={winner:?}"),
            Event::HandSnapshot { player, hand } => write!(f, "{player} hand snapshot ({} cards)", hand.len()),
            Event::Error { player, error } => write!(f, "{player}: {error}"),
        }
    }
}
