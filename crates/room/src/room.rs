use std::collections::HashSet;

use cardroom_cards::Color;
use cardroom_core::PlayerId;
use cardroom_core::Points;
use cardroom_engine::EngineError;
use cardroom_engine::GameSession;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::config::RoomConfig;
use crate::player::BotPlayer;
use crate::player::HumanPlayer;
use crate::player::Player;

/// Room lifecycle (§3 "Room").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Starting,
    InProgress,
    Finished,
}

/// What happened to a seat that left (§4.5 "Leave").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// No members remain; the registry should drop this room.
    RoomEmptied,
    /// The leaver's seat was converted to a temporary bot for the round.
    ReplacedByBot(PlayerId),
    /// The seat was removed outright and the round ended as a result
    /// (fewer than two seats remained); carries the sole survivor, if any.
    RoundEnded(Option<PlayerId>),
    /// The seat was removed and the room continues.
    SeatRemoved,
}

/// A lobby and its active round (§3 "Room"). Exclusively owns its
/// [`GameSession`] and member rosters; the session in turn owns the
/// per-round hands, turn order, and command log.
#[derive(Debug, Clone)]
pub struct Room {
    code: String,
    name: Option<String>,
    private: bool,
    config: RoomConfig,
    humans: Vec<HumanPlayer>,
    bots: Vec<BotPlayer>,
    kicked: HashSet<String>,
    leader: Option<PlayerId>,
    status: RoomStatus,
    session: Option<GameSession>,
}

impl Room {
    pub fn new(
        code: impl Into<String>,
        name: Option<String>,
        private: bool,
        config: RoomConfig,
    ) -> Self {
        Self {
            code: code.into(),
            name,
            private,
            config,
            humans: Vec::new(),
            bots: Vec::new(),
            kicked: HashSet::new(),
            leader: None,
            status: RoomStatus::Waiting,
            session: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn leader(&self) -> Option<PlayerId> {
        self.leader
    }

    pub fn humans(&self) -> &[HumanPlayer] {
        &self.humans
    }

    pub fn bots(&self) -> &[BotPlayer] {
        &self.bots
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    pub fn total_seats(&self) -> usize {
        self.humans.len() + self.bots.len()
    }

    pub fn is_full(&self) -> bool {
        self.total_seats() >= self.config.max_players
    }

    /// Every current seat, human and bot alike, in join/add order.
    pub fn members(&self) -> Vec<Player> {
        self.humans
            .iter()
            .cloned()
            .map(Player::Human)
            .chain(self.bots.iter().cloned().map(Player::Bot))
            .collect()
    }

    pub fn member_ids(&self) -> Vec<PlayerId> {
        self.humans
            .iter()
            .map(HumanPlayer::id)
            .chain(self.bots.iter().map(BotPlayer::id))
            .collect()
    }

    pub fn find_human(&self, id: PlayerId) -> Option<&HumanPlayer> {
        self.humans.iter().find(|h| h.id() == id)
    }

    /// Finds a seat by its identity-service user id, so a disconnected human
    /// returning with a freshly authenticated socket can be matched back to
    /// their existing seat instead of minting a new one (§6 "Identity
    /// service", §4.9 "disconnect grace").
    pub fn find_human_by_identity_user(&self, identity_user: &str) -> Option<PlayerId> {
        self.humans
            .iter()
            .find(|h| h.identity_user() == Some(identity_user))
            .map(HumanPlayer::id)
    }

    pub fn set_connection_status(&mut self, player: PlayerId, status: crate::player::ConnectionStatus) {
        if let Some(human) = self.humans.iter_mut().find(|h| h.id() == player) {
            human.set_status(status);
        }
    }

    pub fn declared_color(&self) -> Option<Color> {
        self.session.as_ref().and_then(GameSession::declared_color)
    }

    /// §4.5 "Join". `email` identifies the joining human against the kicked
    /// set; the first human to join becomes leader.
    pub fn join_human(
        &mut self,
        nickname: impl Into<String>,
        identity_user: Option<String>,
        email: &str,
    ) -> Result<PlayerId, EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::InvalidState("room is not accepting new players"));
        }
        if self.is_full() {
            return Err(EngineError::RoomFull);
        }
        if self.kicked.contains(email) {
            return Err(EngineError::Kicked);
        }
        let mut human = HumanPlayer::new(nickname, identity_user, email);
        let id = human.id();
        if self.leader.is_none() {
            human.set_leader(true);
            self.leader = Some(id);
        }
        self.humans.push(human);
        Ok(id)
    }

    /// §4.5 "Join" bot-seat addition: leader-only, Waiting-only,
    /// capacity-checked against both `max_bots` and `max_players`.
    pub fn add_bot(
        &mut self,
        requester: PlayerId,
        nickname: impl Into<String>,
    ) -> Result<PlayerId, EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::InvalidState("room is not accepting new players"));
        }
        if self.leader != Some(requester) {
            return Err(EngineError::NotLeader);
        }
        if !self.config.allow_bots {
            return Err(EngineError::InvalidState("bots are not allowed in this room"));
        }
        if self.bots.len() >= self.config.max_bots || self.is_full() {
            return Err(EngineError::RoomFull);
        }
        let bot = BotPlayer::permanent(nickname);
        let id = bot.id();
        self.bots.push(bot);
        Ok(id)
    }

    pub fn remove_bot(&mut self, requester: PlayerId, bot_id: PlayerId) -> Result<(), EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::InvalidState("room is not accepting changes"));
        }
        if self.leader != Some(requester) {
            return Err(EngineError::NotLeader);
        }
        let before = self.bots.len();
        self.bots.retain(|b| b.id() != bot_id);
        if self.bots.len() == before {
            return Err(EngineError::UnknownRoom);
        }
        Ok(())
    }

    /// §4.5 "Kick". Only the leader may kick, and cannot kick themselves.
    /// The target's own stored email seeds the kicked set, so a caller only
    /// needs to name who to kick, not reproduce their contact details.
    pub fn kick(&mut self, requester: PlayerId, target: PlayerId) -> Result<(), EngineError> {
        if self.leader != Some(requester) {
            return Err(EngineError::NotLeader);
        }
        if target == requester {
            return Err(EngineError::NotLeader);
        }
        let target_email = self
            .find_human(target)
            .ok_or(EngineError::UnknownRoom)?
            .email()
            .to_string();
        let before = self.humans.len();
        self.humans.retain(|h| h.id() != target);
        if self.humans.len() == before {
            return Err(EngineError::UnknownRoom);
        }
        self.kicked.insert(target_email);
        Ok(())
    }

    /// §4.5 "Leave". Humans leaving mid-round become a temporary bot unless
    /// tournament mode is on, in which case the seat is removed outright.
    pub fn leave(&mut self, player: PlayerId) -> Result<LeaveOutcome, EngineError> {
        let was_leader = self.leader == Some(player);
        let in_progress = self.status == RoomStatus::InProgress;

        if let Some(pos) = self.humans.iter().position(|h| h.id() == player) {
            let human = self.humans.remove(pos);

            if in_progress && !self.config.tournament {
                let bot = BotPlayer::temporary_for(&human);
                let bot_id = bot.id();
                self.bots.push(bot);
                if let Some(session) = self.session.as_mut() {
                    session.replace_seat(human.id(), bot_id);
                }
                self.transfer_leadership_if_needed(was_leader);
                return Ok(LeaveOutcome::ReplacedByBot(bot_id));
            }

            if in_progress {
                if let Some(session) = self.session.as_mut() {
                    let survivor = session.remove_seat(player);
                    if session.seats().len() < 2 {
                        self.status = RoomStatus::Finished;
                        self.transfer_leadership_if_needed(was_leader);
                        return Ok(LeaveOutcome::RoundEnded(survivor));
                    }
                }
            }

            if self.humans.is_empty() && self.bots.is_empty() {
                return Ok(LeaveOutcome::RoomEmptied);
            }
            self.transfer_leadership_if_needed(was_leader);
            return Ok(LeaveOutcome::SeatRemoved);
        }

        if let Some(pos) = self.bots.iter().position(|b| b.id() == player) {
            self.bots.remove(pos);
            if in_progress {
                if let Some(session) = self.session.as_mut() {
                    session.remove_seat(player);
                }
            }
            if self.humans.is_empty() && self.bots.is_empty() {
                return Ok(LeaveOutcome::RoomEmptied);
            }
            return Ok(LeaveOutcome::SeatRemoved);
        }

        Err(EngineError::UnknownRoom)
    }

    /// Hands leadership to the next human in join order if `was_leader`.
    fn transfer_leadership_if_needed(&mut self, was_leader: bool) {
        if !was_leader {
            return;
        }
        self.leader = self.humans.first().map(HumanPlayer::id);
        let leader_id = self.leader;
        for human in self.humans.iter_mut() {
            human.set_leader(Some(human.id()) == leader_id);
        }
    }

    /// §4.4 Lobby → Dealing → Playing transition. Requires Waiting and at
    /// least two total seats.
    pub fn start(&mut self, rng: &mut impl Rng) -> Result<(), EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::InvalidState("room has already started"));
        }
        if self.total_seats() < 2 {
            return Err(EngineError::InvalidState(
                "at least two seats are required to start",
            ));
        }
        self.status = RoomStatus::Starting;
        let mut session =
            GameSession::new(self.member_ids(), self.config.stacking, self.config.tournament);
        session.deal(self.config.hand_size, rng)?;
        self.session = Some(session);
        self.status = RoomStatus::InProgress;
        Ok(())
    }

    /// Applies a round's winner score to the human or bot roster (§4.4 "End
    /// round"); called by the scheduler once a `PlayOutcome` carries a
    /// `ScoreDelta`. Transitions the room to Finished.
    pub fn apply_round_result(&mut self, winner: PlayerId, points: Points) {
        self.status = RoomStatus::Finished;
        if let Some(human) = self.humans.iter_mut().find(|h| h.id() == winner) {
            human.add_score(points);
        } else if let Some(bot) = self.bots.iter_mut().find(|b| b.id() == winner) {
            bot.add_score(points);
        }
    }

    /// Whether the match is over: any roster member has reached the
    /// configured points-to-win target (§4.4 Open Questions — left to the
    /// Room as a policy hook rather than the session).
    pub fn match_won(&self) -> Option<PlayerId> {
        self.humans
            .iter()
            .find(|h| h.score() >= self.config.points_to_win)
            .map(HumanPlayer::id)
            .or_else(|| {
                self.bots
                    .iter()
                    .find(|b| b.score() >= self.config.points_to_win)
                    .map(BotPlayer::id)
            })
    }

    /// Resets a Finished room back to Waiting for a new round, preserving
    /// configuration and roster membership but dropping all temporary bots
    /// and per-round session state (§4.5 "Round reset").
    pub fn reset_round(&mut self) {
        self.bots.retain(|b| !b.is_temporary());
        self.session = None;
        self.status = RoomStatus::Waiting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(3)
    }

    #[test]
    fn first_human_to_join_becomes_leader() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let id = room.join_human("ada", None, "ada@example.com").unwrap();
        assert_eq!(room.leader(), Some(id));
    }

    #[test]
    fn join_rejected_once_kicked() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let leader = room.join_human("ada", None, "ada@example.com").unwrap();
        let target = room.join_human("bob", None, "bob@example.com").unwrap();
        room.kick(leader, target).unwrap();
        let err = room.join_human("bob", None, "bob@example.com").unwrap_err();
        assert_eq!(err, EngineError::Kicked);
    }

    #[test]
    fn only_leader_may_add_bots() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let leader = room.join_human("ada", None, "ada@example.com").unwrap();
        let other = room.join_human("bob", None, "bob@example.com").unwrap();
        assert_eq!(
            room.add_bot(other, "bot").unwrap_err(),
            EngineError::NotLeader
        );
        assert!(room.add_bot(leader, "bot").is_ok());
    }

    #[test]
    fn start_requires_two_seats() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        room.join_human("ada", None, "ada@example.com").unwrap();
        assert!(room.start(&mut rng()).is_err());
    }

    #[test]
    fn leave_mid_round_converts_seat_to_temporary_bot() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let p1 = room.join_human("ada", None, "ada@example.com").unwrap();
        room.join_human("bob", None, "bob@example.com").unwrap();
        room.start(&mut rng()).unwrap();
        let outcome = room.leave(p1).unwrap();
        assert!(matches!(outcome, LeaveOutcome::ReplacedByBot(id) if id == p1));
        assert!(room.bots().iter().any(|b| b.id() == p1 && b.is_temporary()));
    }

    #[test]
    fn leadership_transfers_to_next_human_on_leave() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let leader = room.join_human("ada", None, "ada@example.com").unwrap();
        let next = room.join_human("bob", None, "bob@example.com").unwrap();
        room.leave(leader).unwrap();
        assert_eq!(room.leader(), Some(next));
    }

    #[test]
    fn round_reset_clears_temporary_bots_and_session() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let p1 = room.join_human("ada", None, "ada@example.com").unwrap();
        room.join_human("bob", None, "bob@example.com").unwrap();
        room.start(&mut rng()).unwrap();
        room.leave(p1).unwrap();
        room.status = RoomStatus::Finished;
        room.reset_round();
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert!(room.session().is_none());
        assert!(room.bots().is_empty());
    }
}
