use cardroom_core::PlayerId;
use cardroom_core::Points;
use serde::Deserialize;
use serde::Serialize;

/// Liveness of a human seat (§3 "Player"). Bots have no connection of their
/// own and so carry no status of this kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Reconnecting,
    ReplacedByBot,
}

/// A human seat: a real connection, optionally backed by an identity-service
/// user (§3 "Player", §6 "Identity service").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanPlayer {
    id: PlayerId,
    nickname: String,
    identity_user: Option<String>,
    email: String,
    score: Points,
    status: ConnectionStatus,
    is_leader: bool,
}

impl HumanPlayer {
    pub fn new(nickname: impl Into<String>, identity_user: Option<String>, email: impl Into<String>) -> Self {
        Self {
            id: PlayerId::default(),
            nickname: nickname.into(),
            identity_user,
            email: email.into(),
            score: 0,
            status: ConnectionStatus::Connected,
            is_leader: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn identity_user(&self) -> Option<&str> {
        self.identity_user.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn score(&self) -> Points {
        self.score
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    pub fn add_score(&mut self, points: Points) {
        self.score += points;
    }

    pub fn set_leader(&mut self, is_leader: bool) {
        self.is_leader = is_leader;
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }
}

/// A bot seat (§4.6 "Bot Driver"). A `temporary` bot stands in for a
/// disconnected human and keeps that human's own id, so the turn ring and
/// the session's hand map never need to be re-keyed (§4.9 disconnect grace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotPlayer {
    id: PlayerId,
    nickname: String,
    score: Points,
    temporary: bool,
    replaced: Option<PlayerId>,
}

impl BotPlayer {
    pub fn permanent(nickname: impl Into<String>) -> Self {
        Self {
            id: PlayerId::default(),
            nickname: nickname.into(),
            score: 0,
            temporary: false,
            replaced: None,
        }
    }

    /// Takes over `human`'s seat, carrying the id and accumulated score so
    /// the game session sees no discontinuity across the substitution.
    pub fn temporary_for(human: &HumanPlayer) -> Self {
        Self {
            id: human.id(),
            nickname: format!("{} (bot)", human.nickname()),
            score: human.score(),
            temporary: true,
            replaced: Some(human.id()),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn score(&self) -> Points {
        self.score
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    pub fn replaced(&self) -> Option<PlayerId> {
        self.replaced
    }

    pub fn add_score(&mut self, points: Points) {
        self.score += points;
    }
}

/// A seated member, human or bot — the unified view `Room::members`
/// exposes over its two separate rosters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Player {
    Human(HumanPlayer),
    Bot(BotPlayer),
}

impl Player {
    pub fn id(&self) -> PlayerId {
        match self {
            Player::Human(h) => h.id(),
            Player::Bot(b) => b.id(),
        }
    }

    pub fn nickname(&self) -> &str {
        match self {
            Player::Human(h) => h.nickname(),
            Player::Bot(b) => b.nickname(),
        }
    }

    pub fn score(&self) -> Points {
        match self {
            Player::Human(h) => h.score(),
            Player::Bot(b) => b.score(),
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Player::Bot(_))
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Player::Human(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_bot_inherits_id_and_score() {
        let mut human = HumanPlayer::new("ada", None, "ada@example.com");
        human.add_score(40);
        let bot = BotPlayer::temporary_for(&human);
        assert_eq!(bot.id(), human.id());
        assert_eq!(bot.score(), 40);
        assert!(bot.is_temporary());
        assert_eq!(bot.replaced(), Some(human.id()));
    }

    #[test]
    fn permanent_bot_has_its_own_id() {
        let bot = BotPlayer::permanent("table-bot");
        assert!(!bot.is_temporary());
        assert!(bot.replaced().is_none());
    }
}
