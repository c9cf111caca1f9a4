use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_cards::Hand;
use cardroom_core::PlayerId;
use cardroom_core::ID;
use cardroom_core::DEFAULT_BOT_DELAY_MAX_MS;
use cardroom_core::DEFAULT_BOT_DELAY_MIN_MS;
use cardroom_engine::decide;
use cardroom_engine::BotChoice;
use cardroom_engine::Command;
use cardroom_engine::EngineError;
use cardroom_identity::GameEndRecord;
use cardroom_identity::Leaderboard;
use cardroom_identity::Standing;
use cardroom_identity::StatisticsSink;
use cardroom_room::LeaveOutcome;
use cardroom_room::Room;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::event::Event;
use crate::table::Table;
use crate::timer::Timer;
use crate::timer::TimerConfig;

/// Everything a connection handler can ask a room's worker to do (§4.9, §5
/// "Scheduling model"). Every request is tagged with the requesting player
/// so room-management checks (leader-only, etc.) have someone to check
/// against. The Room Registry hands a freshly created `Room` to a worker
/// before anyone has joined it, so lobby membership (`Join`) is itself a
/// `Request` like any other room mutation, rather than something callers
/// apply directly — the worker is the only thing that ever touches the
/// `Room` (§5 "per-room single-threaded cooperative").
#[derive(Debug)]
pub enum Request {
    Play { player: PlayerId, card: ID<Card>, declared_color: Option<Color>, call_one: bool },
    Draw { player: PlayerId },
    CallOne { player: PlayerId },
    CatchOne { accuser: PlayerId, target: PlayerId },
    Join { nickname: String, identity_user: Option<String>, email: String, reply: oneshot::Sender<Result<PlayerId, EngineError>> },
    /// Looks an existing seat up by identity-service user id, for a socket
    /// that is reconnecting rather than joining fresh (§4.9).
    Rejoin { identity_user: String, reply: oneshot::Sender<Result<PlayerId, EngineError>> },
    AddBot { requester: PlayerId },
    RemoveBot { requester: PlayerId, bot: PlayerId },
    Kick { requester: PlayerId, target: PlayerId },
    Leave { player: PlayerId },
    StartGame { requester: PlayerId },
    Disconnected { player: PlayerId },
    Reconnected { player: PlayerId },
    /// Registers the live outbound channel for a just-connected player, so
    /// the worker's `Table` can reach their `Actor` task (§4.8).
    Attach { player: PlayerId, sender: UnboundedSender<Event> },
    Detach { player: PlayerId },
}

/// One logical worker per room. Owns the [`Room`] outright and is the only
/// task that ever mutates it, so every inbound [`Request`] is serialized
/// onto this single-threaded loop (§5 "one actor task per room, a single
/// inbound channel"). Drives the turn timer, the disconnect-grace timer,
/// and the bot driver's artificial thinking delay.
pub struct Scheduler {
    room: Room,
    table: Table,
    inbox: UnboundedReceiver<Request>,
    turn_timer: Timer,
    bot_deadline: Option<Instant>,
    grace_deadlines: HashMap<PlayerId, Instant>,
    rng: SmallRng,
    statistics: Arc<dyn StatisticsSink>,
    leaderboard: Arc<dyn Leaderboard>,
    round_started_at: Option<u64>,
}

impl Scheduler {
    pub fn new(
        room: Room,
        table: Table,
        inbox: UnboundedReceiver<Request>,
        statistics: Arc<dyn StatisticsSink>,
        leaderboard: Arc<dyn Leaderboard>,
    ) -> Self {
        let turn_timer = Timer::new(TimerConfig::new(room.config().turn_seconds));
        Self {
            room,
            table,
            inbox,
            turn_timer,
            bot_deadline: None,
            grace_deadlines: HashMap::new(),
            rng: SmallRng::from_os_rng(),
            statistics,
            leaderboard,
            round_started_at: None,
        }
    }

    pub fn spawn(
        room: Room,
        table: Table,
        statistics: Arc<dyn StatisticsSink>,
        leaderboard: Arc<dyn Leaderboard>,
    ) -> UnboundedSender<Request> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let scheduler = Self::new(room, table, rx, statistics, leaderboard);
        tokio::spawn(scheduler.run());
        tx
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                request = self.inbox.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
                _ = sleep_until_or_pending(self.turn_timer.deadline()) => {
                    self.on_turn_timeout();
                    self.check_card_invariant();
                    self.arm_bot_timer();
                }
                _ = sleep_until_or_pending(self.bot_deadline) => {
                    self.run_bot_turn();
                    self.check_card_invariant();
                    self.arm_bot_timer();
                }
                _ = sleep_until_or_pending(soonest(&self.grace_deadlines)) => {
                    self.on_grace_expired();
                    self.check_card_invariant();
                    self.arm_bot_timer();
                }
                _ = tokio::time::sleep(Duration::from_millis(250)), if cardroom_core::interrupted() => {
                    self.on_graceful_shutdown();
                    break;
                }
            }
        }
    }

    /// Tears the room down when the process has been asked to stop
    /// gracefully (§9 "teardown on graceful shutdown"). Ends the round with
    /// no winner rather than leaving sockets hanging on a killed process.
    fn on_graceful_shutdown(&mut self) {
        log::warn!("[scheduler {}] graceful shutdown, ending round", self.room.code());
        self.turn_timer.clear();
        self.bot_deadline = None;
        self.table.broadcast(Event::GameEnded { winner: None, reason: "shutdown".to_string() });
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Play { player, card, declared_color, call_one } => {
                self.apply_play(player, card, declared_color, call_one)
            }
            Request::Draw { player } => self.apply_draw(player),
            Request::CallOne { player } => self.apply_call_one(player),
            Request::CatchOne { accuser, target } => self.apply_catch_one(accuser, target),
            Request::Join { nickname, identity_user, email, reply } => {
                self.apply_join(nickname, identity_user, email, reply)
            }
            Request::Rejoin { identity_user, reply } => self.apply_rejoin(identity_user, reply),
            Request::Attach { player, sender } => self.table.sit(player, sender),
            Request::Detach { player } => self.table.leave(player),
            Request::AddBot { requester } => self.apply_add_bot(requester),
            Request::RemoveBot { requester, bot } => self.apply_remove_bot(requester, bot),
            Request::Kick { requester, target } => self.apply_kick(requester, target),
            Request::Leave { player } => self.apply_leave(player),
            Request::StartGame { requester } => self.apply_start(requester),
            Request::Disconnected { player } => self.apply_disconnected(player),
            Request::Reconnected { player } => self.apply_reconnected(player),
        }
        self.check_card_invariant();
        self.arm_bot_timer();
    }

    /// §7 "Fatal errors": an unexpected card-multiset violation ends the
    /// round with no winner and returns the room to Waiting, without
    /// terminating the process. Checked after every applied command.
    fn check_card_invariant(&mut self) {
        let violated = self
            .room
            .session()
            .is_some_and(|session| !session.card_count_is_valid());
        if !violated {
            return;
        }
        log::error!(
            "[scheduler {}] card multiset invariant violated, aborting round",
            self.room.code()
        );
        self.turn_timer.clear();
        self.table.broadcast(Event::GameEnded { winner: None, reason: "internal".to_string() });
        self.room.reset_round();
        self.table.broadcast(Event::RoomStateChanged { status: self.room.status() });
    }

    // ------------------------------------------------------------------
    // Gameplay commands (§4.4)
    // ------------------------------------------------------------------

    fn apply_play(&mut self, player: PlayerId, card: ID<Card>, declared_color: Option<Color>, call_one: bool) {
        let outcome = match self.room.session_mut() {
            Some(session) => session.play_card(player, card, declared_color, call_one, &mut self.rng),
            None => Err(EngineError::InvalidState("game has not started")),
        };
        match outcome {
            Ok(outcome) => {
                self.table.broadcast(Event::CardPlayed { player, card: outcome.card.clone() });
                if outcome.card.is_wild() {
                    self.table.broadcast(Event::ColorChanged { color: outcome.card.effective_color() });
                }
                if outcome.direction_reversed {
                    let clockwise = self.room.session().map(|s| s.direction_clockwise()).unwrap_or(true);
                    self.table.broadcast(Event::DirectionReversed { clockwise });
                }
                if let Some(skipped) = outcome.skipped {
                    self.table.broadcast(Event::PlayerSkipped { player: skipped });
                }
                if let Some((penalized, cards)) = outcome.one_penalty {
                    self.table.broadcast(Event::OnePenalty { player: penalized, cards });
                    self.unicast_hand(penalized);
                }
                if let Some((refilled, cards)) = outcome.auto_resolved_pending {
                    self.table.broadcast(Event::CardDrawn { player: refilled, count: cards });
                    self.unicast_hand(refilled);
                }
                self.unicast_hand(player);
                if let Some(winner) = outcome.round_won {
                    if let Some(score) = outcome.score {
                        self.room.apply_round_result(score.winner, score.points);
                    }
                    self.turn_timer.clear();
                    self.report_round_end(Some(winner));
                    self.table.broadcast(Event::GameEnded {
                        winner: Some(winner),
                        reason: "hand emptied".to_string(),
                    });
                    self.table.broadcast(Event::RoomStateChanged { status: self.room.status() });
                } else if let Some(next) = outcome.next_player {
                    self.table.broadcast(Event::TurnChanged { player: next });
                    self.turn_timer.start_turn();
                }
            }
            Err(error) => self.table.unicast(player, Event::Error { player, error }),
        }
    }

    fn apply_draw(&mut self, player: PlayerId) {
        let outcome = match self.room.session_mut() {
            Some(session) => session.draw_card(player, &mut self.rng),
            None => Err(EngineError::InvalidState("game has not started")),
        };
        match outcome {
            Ok(outcome) => {
                if outcome.cards_drawn > 0 {
                    self.table.broadcast(Event::CardDrawn { player, count: outcome.cards_drawn });
                    self.unicast_hand(player);
                }
                if outcome.turn_advanced {
                    if let Some(next) = outcome.next_player {
                        self.table.broadcast(Event::TurnChanged { player: next });
                        self.turn_timer.start_turn();
                    }
                }
            }
            Err(error) => self.table.unicast(player, Event::Error { player, error }),
        }
    }

    fn apply_call_one(&mut self, player: PlayerId) {
        let result = match self.room.session_mut() {
            Some(session) => session.call_one(player),
            None => Err(EngineError::InvalidState("game has not started")),
        };
        match result {
            Ok(()) => self.table.broadcast(Event::OneCalled { player }),
            Err(error) => self.table.unicast(player, Event::Error { player, error }),
        }
    }

    fn apply_catch_one(&mut self, accuser: PlayerId, target: PlayerId) {
        let result = match self.room.session_mut() {
            Some(session) => session.catch_one(accuser, target, &mut self.rng),
            None => Err(EngineError::InvalidState("game has not started")),
        };
        match result {
            Ok(outcome) => {
                self.table.broadcast(Event::OnePenalty { player: outcome.target, cards: outcome.penalty });
                self.unicast_hand(outcome.target);
            }
            Err(error) => self.table.unicast(accuser, Event::Error { player: accuser, error }),
        }
    }

    /// Fire-and-forget game-end reporting (§6 "Statistics sink",
    /// "Leaderboard"): builds one [`GameEndRecord`] from the session's final
    /// hands and hands it to both sinks on their own task. The engine never
    /// awaits or retries this call.
    fn report_round_end(&mut self, winner: Option<PlayerId>) {
        let Some(session) = self.room.session() else { return };
        let mut standings: Vec<Standing> = self
            .room
            .member_ids()
            .into_iter()
            .filter_map(|player| {
                let hand = session.hand(player)?;
                let remaining_cards = hand.len() as u32;
                let hand_points = hand.iter().map(Card::points).sum();
                Some(Standing { player_id: player, placement: 0, remaining_cards, hand_points })
            })
            .collect();
        standings.sort_by_key(|s| s.remaining_cards);
        for (i, standing) in standings.iter_mut().enumerate() {
            standing.placement = i as u32 + 1;
        }
        let record = GameEndRecord {
            room_code: self.room.code().to_string(),
            started_at: self.round_started_at.take().unwrap_or_else(now_millis),
            ended_at: now_millis(),
            winner_id: winner,
            standings,
        };
        let statistics = self.statistics.clone();
        let leaderboard = self.leaderboard.clone();
        tokio::spawn(async move {
            statistics.record_game_end(&record).await;
            leaderboard.record_game_end(&record).await;
        });
    }

    fn unicast_hand(&self, player: PlayerId) {
        if let Some(hand) = self.room.session().and_then(|s| s.hand(player)) {
            let hand: Vec<_> = hand.iter().cloned().collect();
            self.table.unicast(player, Event::HandSnapshot { player, hand });
        }
    }

    // ------------------------------------------------------------------
    // Room management (§4.5)
    // ------------------------------------------------------------------

    /// Joins a human to the lobby on the room's own worker, so a capacity
    /// check can never race a concurrent join (§4.5 "Join").
    fn apply_join(
        &mut self,
        nickname: String,
        identity_user: Option<String>,
        email: String,
        reply: oneshot::Sender<Result<PlayerId, EngineError>>,
    ) {
        let result = self.room.join_human(nickname.clone(), identity_user, &email);
        if let Ok(player) = result {
            self.table.broadcast(Event::PlayerJoined { player, nickname, is_bot: false });
        }
        let _ = reply.send(result);
    }

    fn apply_add_bot(&mut self, requester: PlayerId) {
        match self.room.add_bot(requester, "bot") {
            Ok(id) => self.table.broadcast(Event::PlayerJoined { player: id, nickname: "bot".to_string(), is_bot: true }),
            Err(error) => self.table.unicast(requester, Event::Error { player: requester, error }),
        }
    }

    fn apply_remove_bot(&mut self, requester: PlayerId, bot: PlayerId) {
        match self.room.remove_bot(requester, bot) {
            Ok(()) => {
                self.table.leave(bot);
                self.table.broadcast(Event::PlayerLeft { player: bot, was_replaced: false });
            }
            Err(error) => self.table.unicast(requester, Event::Error { player: requester, error }),
        }
    }

    fn apply_kick(&mut self, requester: PlayerId, target: PlayerId) {
        let leader_before = self.room.leader();
        match self.room.kick(requester, target) {
            Ok(()) => {
                self.table.leave(target);
                self.table.broadcast(Event::PlayerKicked { player: target });
                self.broadcast_leadership_change(leader_before);
            }
            Err(error) => self.table.unicast(requester, Event::Error { player: requester, error }),
        }
    }

    /// Tells every subscriber who the leader now is, if it changed (§4.5
    /// "leadership transfers to the next human in join order"), so clients
    /// know who may send `START_GAME` next.
    fn broadcast_leadership_change(&mut self, leader_before: Option<PlayerId>) {
        let leader_after = self.room.leader();
        if leader_after != leader_before {
            if let Some(new_leader) = leader_after {
                self.table.broadcast(Event::LeadershipTransferred { new_leader });
            }
        }
    }

    fn apply_leave(&mut self, player: PlayerId) {
        let leader_before = self.room.leader();
        match self.room.leave(player) {
            Ok(LeaveOutcome::RoomEmptied) => {
                self.table.leave(player);
            }
            Ok(LeaveOutcome::ReplacedByBot(bot)) => {
                log::info!("[scheduler {}] {player} replaced by bot {bot}", self.room.code());
                self.table.broadcast(Event::PlayerLeft { player, was_replaced: true });
                self.table.leave(player);
                let nickname = self
                    .room
                    .bots()
                    .iter()
                    .find(|b| b.id() == bot)
                    .map(|b| b.nickname().to_string())
                    .unwrap_or_else(|| "bot".to_string());
                self.table.broadcast(Event::PlayerJoined { player: bot, nickname, is_bot: true });
                self.broadcast_leadership_change(leader_before);
            }
            Ok(LeaveOutcome::RoundEnded(survivor)) => {
                self.table.broadcast(Event::PlayerLeft { player, was_replaced: false });
                self.table.leave(player);
                self.turn_timer.clear();
                self.report_round_end(survivor);
                self.table.broadcast(Event::GameEnded { winner: survivor, reason: "opponent left".to_string() });
                self.table.broadcast(Event::RoomStateChanged { status: self.room.status() });
                self.broadcast_leadership_change(leader_before);
            }
            Ok(LeaveOutcome::SeatRemoved) => {
                self.table.broadcast(Event::PlayerLeft { player, was_replaced: false });
                self.table.leave(player);
                self.broadcast_leadership_change(leader_before);
            }
            Err(error) => self.table.unicast(player, Event::Error { player, error }),
        }
    }

    fn apply_start(&mut self, requester: PlayerId) {
        if self.room.leader() != Some(requester) {
            self.table.unicast(requester, Event::Error { player: requester, error: EngineError::NotLeader });
            return;
        }
        match self.room.start(&mut self.rng) {
            Ok(()) => {
                self.round_started_at = Some(now_millis());
                self.table.broadcast(Event::RoomStateChanged { status: self.room.status() });
                self.table.broadcast(Event::GameStarted { hand_size: self.room.config().hand_size });
                for player in self.room.member_ids() {
                    self.unicast_hand(player);
                }
                if let Some(current) = self.room.session().and_then(|s| s.current_player()) {
                    self.table.broadcast(Event::TurnChanged { player: current });
                    self.turn_timer.start_turn();
                }
            }
            Err(error) => self.table.unicast(requester, Event::Error { player: requester, error }),
        }
    }

    fn apply_disconnected(&mut self, player: PlayerId) {
        self.table.disconnect(player);
        self.room.set_connection_status(player, cardroom_room::ConnectionStatus::Disconnected);
        let grace = self.turn_timer.config().disconnect_grace;
        self.grace_deadlines.insert(player, Instant::now() + grace);
        self.table.broadcast(Event::PlayerDisconnected { player });
    }

    fn apply_reconnected(&mut self, player: PlayerId) {
        self.table.reconnect(player);
        self.room.set_connection_status(player, cardroom_room::ConnectionStatus::Connected);
        self.grace_deadlines.remove(&player);
        self.table.broadcast(Event::PlayerReconnected { player });
        self.unicast_hand(player);
    }

    /// Looks up an existing seat by identity-service user id so a
    /// reconnecting socket can be routed back to it instead of joining a
    /// fresh one (§4.9 "disconnect grace").
    fn apply_rejoin(
        &mut self,
        identity_user: String,
        reply: oneshot::Sender<Result<PlayerId, EngineError>>,
    ) {
        let result = self
            .room
            .find_human_by_identity_user(&identity_user)
            .ok_or(EngineError::UnknownRoom);
        let _ = reply.send(result);
    }

    // ------------------------------------------------------------------
    // Timers (§4.9)
    // ------------------------------------------------------------------

    /// On turn expiry the scheduler draws on the stalled player's behalf,
    /// same as if they had sent the frame themselves.
    fn on_turn_timeout(&mut self) {
        if let Some(current) = self.room.session().and_then(|s| s.current_player()) {
            log::info!("[scheduler {}] turn timer expired for {current}", self.room.code());
            self.apply_draw(current);
        } else {
            self.turn_timer.clear();
        }
    }

    fn on_grace_expired(&mut self) {
        let expired: Vec<PlayerId> = self
            .grace_deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= Instant::now())
            .map(|(player, _)| *player)
            .collect();
        for player in expired {
            self.grace_deadlines.remove(&player);
            log::info!("[scheduler {}] disconnect grace expired for {player}", self.room.code());
            self.apply_leave(player);
        }
    }

    fn run_bot_turn(&mut self) {
        self.bot_deadline = None;
        let Some(current) = self.room.session().and_then(|s| s.current_player()) else { return };
        if !self.room.bots().iter().any(|b| b.id() == current) {
            return;
        }
        let Some(session) = self.room.session() else { return };
        let Some(hand) = session.hand(current) else { return };
        let Some(top) = session.top() else { return };
        let pending_draw = session.pending_draw();
        let choice = decide(hand, top, &mut self.rng);
        if bot_must_draw_pending(pending_draw, hand, &choice) {
            self.apply_draw(current);
            return;
        }
        match choice.card {
            Some(card) => self.apply_play(current, card, choice.declared_color, choice.call_one),
            None => self.apply_draw(current),
        }
    }

    /// Arms (or disarms) the bot's artificial thinking delay after every
    /// state change; the bot never moves from inside a command handler
    /// directly (§9 "Bot pacing").
    fn arm_bot_timer(&mut self) {
        let current = self.room.session().and_then(|s| s.current_player());
        let is_bot = current.is_some_and(|p| self.room.bots().iter().any(|b| b.id() == p));
        self.bot_deadline = is_bot.then(|| {
            let delay = self.rng.random_range(DEFAULT_BOT_DELAY_MIN_MS..=DEFAULT_BOT_DELAY_MAX_MS);
            Instant::now() + Duration::from_millis(delay)
        });
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn soonest(deadlines: &HashMap<PlayerId, Instant>) -> Option<Instant> {
    deadlines.values().min().copied()
}

async fn sleep_until_or_pending(deadline: Option<Instant>) {
    match deadline {
        Some(instant) => tokio::time::sleep_until(instant).await,
        None => std::future::pending::<()>().await,
    }
}

/// Whether a bot facing a pending +2/+4 must draw instead of playing its
/// chosen card (§4.4 step 7): true when there is a pending draw and the
/// card `decide` picked doesn't carry its own draw penalty, i.e. it can't
/// stack on top of the one already owed. `play_card` would otherwise reject
/// it with `PendingDrawUnresolved` and leave the bot stuck on its own turn.
fn bot_must_draw_pending(pending_draw: u32, hand: &Hand, choice: &BotChoice) -> bool {
    pending_draw > 0
        && choice
            .card
            .and_then(|id| hand.get(id))
            .is_none_or(|card| card.variant().draw_penalty() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardroom_cards::Variant;
    use cardroom_identity::StubLeaderboard;
    use cardroom_identity::StubStatisticsSink;
    use cardroom_room::RoomConfig;
    use tokio::sync::mpsc::unbounded_channel;

    fn scheduler_with(room: Room) -> (Scheduler, UnboundedSender<Request>) {
        let (tx, rx) = unbounded_channel();
        let scheduler = Scheduler::new(
            room,
            Table::new(),
            rx,
            Arc::new(StubStatisticsSink),
            Arc::new(StubLeaderboard),
        );
        (scheduler, tx)
    }

    fn two_player_room() -> (Room, PlayerId, PlayerId) {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let a = room.join_human("ada", None, "ada@example.com").unwrap();
        let b = room.join_human("bob", None, "bob@example.com").unwrap();
        (room, a, b)
    }

    #[test]
    fn start_deals_hands_and_arms_the_turn_timer() {
        let (room, a, _b) = two_player_room();
        let (mut scheduler, _tx) = scheduler_with(room);
        scheduler.apply_start(a);
        assert!(scheduler.room.session().is_some());
        assert!(scheduler.turn_timer.deadline().is_some());
    }

    #[test]
    fn only_leader_may_start() {
        let (room, _a, b) = two_player_room();
        let (mut scheduler, _tx) = scheduler_with(room);
        scheduler.apply_start(b);
        assert!(scheduler.room.session().is_none());
    }

    #[test]
    fn disconnect_then_reconnect_clears_the_grace_timer() {
        let (room, a, _b) = two_player_room();
        let (mut scheduler, _tx) = scheduler_with(room);
        scheduler.apply_disconnected(a);
        assert!(scheduler.grace_deadlines.contains_key(&a));
        scheduler.apply_reconnected(a);
        assert!(!scheduler.grace_deadlines.contains_key(&a));
    }

    #[test]
    fn add_bot_rejects_non_leader() {
        let (room, _a, b) = two_player_room();
        let (mut scheduler, _tx) = scheduler_with(room);
        scheduler.apply_add_bot(b);
        assert!(scheduler.room.bots().is_empty());
    }

    #[test]
    fn join_seats_a_human_and_replies_with_their_id() {
        let room = Room::new("ABC123", None, false, RoomConfig::default());
        let (mut scheduler, _tx) = scheduler_with(room);
        let (reply_tx, mut reply_rx) = oneshot::channel();
        scheduler.apply_join("ada".to_string(), None, "ada@example.com".to_string(), reply_tx);
        let id = reply_rx.try_recv().unwrap().unwrap();
        assert_eq!(scheduler.room.humans().len(), 1);
        assert_eq!(scheduler.room.humans()[0].id(), id);
    }

    #[test]
    fn attach_then_detach_registers_and_drops_the_outbound_channel() {
        let (room, a, _b) = two_player_room();
        let (mut scheduler, _tx) = scheduler_with(room);
        let (sender, _receiver) = unbounded_channel();
        scheduler.handle(Request::Attach { player: a, sender });
        assert_eq!(scheduler.table.seats(), 1);
        scheduler.handle(Request::Detach { player: a });
        assert_eq!(scheduler.table.seats(), 0);
    }

    #[test]
    fn graceful_shutdown_ends_the_round_with_no_winner() {
        let (room, a, _b) = two_player_room();
        let (mut scheduler, _tx) = scheduler_with(room);
        let (sender, mut receiver) = unbounded_channel();
        scheduler.handle(Request::Attach { player: a, sender });
        scheduler.apply_start(a);
        scheduler.on_graceful_shutdown();
        assert!(scheduler.turn_timer.deadline().is_none());
        let events: Vec<_> = std::iter::from_fn(|| receiver.try_recv().ok()).collect();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::GameEnded { winner: None, reason } if reason == "shutdown"
        )));
    }

    #[test]
    fn leaving_leader_broadcasts_leadership_transferred() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let leader = room.join_human("ada", None, "ada@example.com").unwrap();
        let next = room.join_human("bob", None, "bob@example.com").unwrap();
        let (mut scheduler, _tx) = scheduler_with(room);
        let (sender, mut receiver) = unbounded_channel();
        scheduler.handle(Request::Attach { player: next, sender });
        scheduler.apply_leave(leader);
        assert_eq!(scheduler.room.leader(), Some(next));
        let events: Vec<_> = std::iter::from_fn(|| receiver.try_recv().ok()).collect();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::LeadershipTransferred { new_leader } if *new_leader == next
        )));
    }

    #[test]
    fn kick_by_non_leader_does_not_broadcast_leadership_transferred() {
        let mut room = Room::new("ABC123", None, false, RoomConfig::default());
        let leader = room.join_human("ada", None, "ada@example.com").unwrap();
        let target = room.join_human("bob", None, "bob@example.com").unwrap();
        let (mut scheduler, _tx) = scheduler_with(room);
        let (sender, mut receiver) = unbounded_channel();
        scheduler.handle(Request::Attach { player: leader, sender });
        scheduler.apply_kick(target, leader);
        let events: Vec<_> = std::iter::from_fn(|| receiver.try_recv().ok()).collect();
        assert!(!events.iter().any(|e| matches!(e, Event::LeadershipTransferred { .. })));
    }

    #[test]
    fn bot_must_draw_pending_when_chosen_card_cannot_stack() {
        let hand = Hand::from(vec![Card::new(Variant::Number(4), Color::Red)]);
        let choice = BotChoice {
            card: Some(hand.iter().next().unwrap().id()),
            declared_color: None,
            call_one: false,
        };
        assert!(bot_must_draw_pending(4, &hand, &choice));
    }

    #[test]
    fn bot_need_not_draw_when_chosen_card_stacks_the_pending_draw() {
        let hand = Hand::from(vec![Card::new(Variant::DrawTwo, Color::Red)]);
        let choice = BotChoice {
            card: Some(hand.iter().next().unwrap().id()),
            declared_color: None,
            call_one: false,
        };
        assert!(!bot_must_draw_pending(2, &hand, &choice));
    }

    #[test]
    fn bot_need_not_draw_when_nothing_pending() {
        let hand = Hand::from(vec![Card::new(Variant::Number(4), Color::Red)]);
        let choice = BotChoice {
            card: Some(hand.iter().next().unwrap().id()),
            declared_color: None,
            call_one: false,
        };
        assert!(!bot_must_draw_pending(0, &hand, &choice));
    }
}
