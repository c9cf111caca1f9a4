/// Stable, wire-facing error catalog (§7). Each variant maps to a single
/// `Error` event with a stable code string; the connection is never closed
/// and state is left unchanged on any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    AuthRequired,
    InvalidToken,
    UnknownRoom,
    RoomFull,
    RoomCodeCollision,
    AlreadyJoined,
    Kicked,
    NotLeader,
    InvalidState(&'static str),
    NotYourTurn,
    IllegalCard,
    IllegalDeclaredColor,
    CannotCallOne,
    CannotCatchOne,
    PendingDrawUnresolved,
    InternalError(String),
}

impl EngineError {
    /// Stable code string carried on the wire `Error` event.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::AuthRequired => "AUTH_REQUIRED",
            EngineError::InvalidToken => "INVALID_TOKEN",
            EngineError::UnknownRoom => "UNKNOWN_ROOM",
            EngineError::RoomFull => "ROOM_FULL",
            EngineError::RoomCodeCollision => "ROOM_CODE_COLLISION",
            EngineError::AlreadyJoined => "ALREADY_JOINED",
            EngineError::Kicked => "KICKED",
            EngineError::NotLeader => "NOT_LEADER",
            EngineError::InvalidState(_) => "INVALID_STATE",
            EngineError::NotYourTurn => "NOT_YOUR_TURN",
            EngineError::IllegalCard => "ILLEGAL_CARD",
            EngineError::IllegalDeclaredColor => "ILLEGAL_DECLARED_COLOR",
            EngineError::CannotCallOne => "CANNOT_CALL_ONE",
            EngineError::CannotCatchOne => "CANNOT_CATCH_ONE",
            EngineError::PendingDrawUnresolved => "PENDING_DRAW_UNRESOLVED",
            EngineError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::AuthRequired => write!(f, "authentication required"),
            EngineError::InvalidToken => write!(f, "invalid or expired token"),
            EngineError::UnknownRoom => write!(f, "no room with that code"),
            EngineError::RoomFull => write!(f, "room is full"),
            EngineError::RoomCodeCollision => write!(f, "room code collision, retry"),
            EngineError::AlreadyJoined => write!(f, "already joined this room"),
            EngineError::Kicked => write!(f, "you have been kicked from this room"),
            EngineError::NotLeader => write!(f, "only the room leader may do that"),
            EngineError::InvalidState(s) => write!(f, "invalid state: {s}"),
            EngineError::NotYourTurn => write!(f, "it is not your turn"),
            EngineError::IllegalCard => write!(f, "that card cannot be played"),
            EngineError::IllegalDeclaredColor => write!(f, "a valid declared color is required"),
            EngineError::CannotCallOne => write!(f, "you cannot call ONE right now"),
            EngineError::CannotCatchOne => write!(f, "there is no ONE violation to catch"),
            EngineError::PendingDrawUnresolved => {
                write!(f, "you must stack or draw the pending cards first")
            }
            EngineError::InternalError(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(EngineError::NotYourTurn.code(), "NOT_YOUR_TURN");
        assert_eq!(EngineError::IllegalCard.code(), "ILLEGAL_CARD");
    }
}
