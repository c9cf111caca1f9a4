use std::collections::HashMap;
use std::time::Duration;
use std::time::Instant;

use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_cards::Deck;
use cardroom_cards::Hand;
use cardroom_cards::Variant;
use cardroom_core::Points;
use cardroom_core::PlayerId;
use cardroom_core::Unique;
use cardroom_core::ID;
use rand::Rng;

use crate::command::CommandLog;
use crate::command::LogEntry;
use crate::command::LogKind;
use crate::error::EngineError;
use crate::ring::TurnRing;

/// Session phases and the transition table of §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    Dealing,
    Playing,
    Paused,
    GameOver,
}

/// Outcome of a successful `play_card` call, carrying everything the
/// transport layer needs to emit its event sequence.
#[derive(Debug, Clone)]
pub struct PlayOutcome {
    pub card: Card,
    pub direction_reversed: bool,
    pub skipped: Option<PlayerId>,
    pub pending_draw: u32,
    pub one_penalty: Option<(PlayerId, u32)>,
    pub round_won: Option<PlayerId>,
    pub next_player: Option<PlayerId>,
    pub auto_resolved_pending: Option<(PlayerId, u32)>,
    /// Points earned by the round winner, set only when `round_won` is.
    /// Left for the owning `Room` to add to its persistent score.
    pub score: Option<ScoreDelta>,
}

/// Outcome of a successful `draw_card` call.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub cards_drawn: u32,
    pub resolved_pending: bool,
    pub refilled: bool,
    pub turn_advanced: bool,
    pub next_player: Option<PlayerId>,
}

/// Outcome of a successful `catch_one` call.
#[derive(Debug, Clone, Copy)]
pub struct CatchOutcome {
    pub target: PlayerId,
    pub penalty: u32,
}

/// Points awarded to the round winner, computed at `end_round` (§4.4).
/// Left for the owning `Room` to apply to its persistent `Player` records.
#[derive(Debug, Clone, Copy)]
pub struct ScoreDelta {
    pub winner: PlayerId,
    pub points: Points,
}

/// Per-round state machine (§3 "GameSession", §4.4). Owns the deck,
/// discard, turn ring, hands, and command log; knows nothing about rooms,
/// connections, or the wire protocol.
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: Phase,
    deck: Deck,
    discard: Vec<Card>,
    ring: TurnRing,
    hands: HashMap<PlayerId, Hand>,
    called_one: HashMap<PlayerId, bool>,
    next_skip: bool,
    pending_draw: u32,
    drew_this_turn: bool,
    turn_started: Option<Instant>,
    winner: Option<PlayerId>,
    stacking_enabled: bool,
    tournament: bool,
    log: CommandLog,
}

impl GameSession {
    pub fn new(seats: Vec<PlayerId>, stacking_enabled: bool, tournament: bool) -> Self {
        let hands = seats.iter().map(|&p| (p, Hand::new())).collect();
        let called_one = seats.iter().map(|&p| (p, false)).collect();
        Self {
            phase: Phase::Lobby,
            deck: Deck::default(),
            discard: Vec::new(),
            ring: TurnRing::new(seats),
            hands,
            called_one,
            next_skip: false,
            pending_draw: 0,
            drew_this_turn: false,
            turn_started: None,
            winner: None,
            stacking_enabled,
            tournament,
            log: CommandLog::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        (self.phase == Phase::Playing).then(|| self.ring.current())
    }

    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.hands.get(&player)
    }

    pub fn top(&self) -> Option<&Card> {
        self.discard.last()
    }

    pub fn declared_color(&self) -> Option<Color> {
        self.top().and_then(Card::declared)
    }

    pub fn pending_draw(&self) -> u32 {
        self.pending_draw
    }

    pub fn direction_clockwise(&self) -> bool {
        self.ring.clockwise()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn seats(&self) -> &[PlayerId] {
        self.ring.seats()
    }

    pub fn can_undo(&self) -> bool {
        !self.tournament && self.log.can_undo()
    }

    /// The multiset invariant of §8: deck + discard + every hand must always
    /// sum to the standard deck size while a round is active. The scheduler
    /// checks this after every applied command and treats a violation as a
    /// fatal error (§7).
    pub fn card_count_is_valid(&self) -> bool {
        let total = self.deck.len()
            + self.discard.len()
            + self.hands.values().map(Hand::len).sum::<usize>();
        total == cardroom_core::STANDARD_DECK_SIZE
    }

    pub fn turn_deadline(&self, limit: Duration) -> Option<Instant> {
        self.turn_started.map(|t| t + limit)
    }

    fn restart_turn_timer(&mut self) {
        self.turn_started = Some(Instant::now());
    }

    // ------------------------------------------------------------------
    // Deal (§4.1)
    // ------------------------------------------------------------------

    /// Deals `hand_size` cards to every seat, then turns the first non-wild
    /// card to start the discard pile (wilds drawn as the opener are
    /// reshuffled back in).
    pub fn deal(&mut self, hand_size: usize, rng: &mut impl Rng) -> Result<(), EngineError> {
        if self.phase != Phase::Lobby {
            return Err(EngineError::InvalidState("deal is only legal from Lobby"));
        }
        self.phase = Phase::Dealing;
        let mut deck = Deck::standard();
        deck.shuffle(rng);
        for &seat in self.ring.seats().to_vec().iter() {
            let hand = self.hands.entry(seat).or_default();
            for _ in 0..hand_size {
                if let Some(card) = deck.draw() {
                    hand.push(card);
                }
            }
        }
        let mut opener = None;
        let mut rejected = Vec::new();
        while let Some(card) = deck.draw() {
            if card.is_wild() {
                rejected.push(card);
                continue;
            }
            opener = Some(card);
            break;
        }
        for card in rejected {
            deck.push(card);
        }
        deck.shuffle(rng);
        self.deck = deck;
        if let Some(card) = opener {
            self.discard.push(card);
        }
        self.phase = Phase::Playing;
        self.restart_turn_timer();
        Ok(())
    }

    /// Draws one card, refilling the deck from the discard pile first if
    /// necessary. The bool reports whether a refill happened.
    fn draw_one(&mut self, rng: &mut impl Rng) -> (Option<Card>, bool) {
        let mut refilled = false;
        if self.deck.is_empty() {
            self.refill_from_discard(rng);
            refilled = true;
        }
        (self.deck.draw(), refilled)
    }

    /// Draws up to `n` cards, stopping early if the deck and discard pile
    /// are both exhausted.
    fn draw_n(&mut self, n: u32, rng: &mut impl Rng) -> (Vec<Card>, bool) {
        let mut cards = Vec::new();
        let mut refilled = false;
        for _ in 0..n {
            let (card, r) = self.draw_one(rng);
            refilled |= r;
            match card {
                Some(card) => cards.push(card),
                None => break,
            }
        }
        (cards, refilled)
    }

    /// Refill-from-discard (§4.1): pop the top card aside, clear declared
    /// colors on the remainder, shuffle them into the deck, restore the top.
    fn refill_from_discard(&mut self, rng: &mut impl Rng) {
        if self.discard.len() <= 1 {
            return;
        }
        let top = self.discard.pop().expect("checked non-empty above");
        let mut refilled: Vec<Card> = self.discard.drain(..).collect();
        for card in refilled.iter_mut() {
            card.clear_declared();
        }
        for card in refilled {
            self.deck.push(card);
        }
        self.deck.shuffle(rng);
        self.discard.push(top);
    }

    // ------------------------------------------------------------------
    // Play (§4.4)
    // ------------------------------------------------------------------

    pub fn play_card(
        &mut self,
        player: PlayerId,
        card_id: ID<Card>,
        declared_color: Option<Color>,
        call_one: bool,
        rng: &mut impl Rng,
    ) -> Result<PlayOutcome, EngineError> {
        if self.phase != Phase::Playing {
            return Err(EngineError::InvalidState("play is only legal while Playing"));
        }
        if self.current_player() != Some(player) {
            return Err(EngineError::NotYourTurn);
        }
        let top = self.top().cloned();
        let hand = self.hands.get(&player).ok_or(EngineError::NotYourTurn)?;
        let card = hand.get(card_id).cloned().ok_or(EngineError::IllegalCard)?;
        if let Some(ref top) = top {
            if !card.can_follow(top) {
                return Err(EngineError::IllegalCard);
            }
        }
        if card.is_wild() && declared_color.filter(Color::is_chromatic).is_none() {
            return Err(EngineError::IllegalDeclaredColor);
        }
        if self.pending_draw > 0 && card.variant().draw_penalty() == 0 {
            return Err(EngineError::PendingDrawUnresolved);
        }
        if self.tournament
            && card.variant() == Variant::WildDrawFour
            && top.as_ref().is_some_and(|top| hand.has_color(top.effective_color()))
        {
            return Err(EngineError::IllegalCard);
        }

        let pre_ring = self.ring.clone();
        let pre_declared = self.declared_color();
        let pre_skip_flag = self.next_skip;
        let pre_pending_draw = self.pending_draw;

        let mut card = card;
        self.hands.get_mut(&player).expect("checked above").remove(card_id);
        if card.is_wild() {
            card.set_declared(declared_color.expect("checked above"))
                .map_err(|_| EngineError::IllegalDeclaredColor)?;
        }
        self.discard.push(card.clone());
        self.drew_this_turn = false;

        self.pending_draw += card.variant().draw_penalty();
        let mut direction_reversed = false;
        if card.variant() == Variant::Reverse {
            self.ring.reverse();
            direction_reversed = true;
            if self.ring.len() == 2 {
                self.next_skip = true;
            }
        }
        if card.variant() == Variant::Skip {
            self.next_skip = true;
        }

        let hand_len = self.hands.get(&player).map(Hand::len).unwrap_or(0);
        if hand_len == 0 {
            let score = self.end_round(player);
            self.log.record(LogEntry {
                actor: player,
                kind: LogKind::Played {
                    card,
                    penalty_drawn: Vec::new(),
                },
                pre_declared,
                pre_ring,
                pre_skip_flag,
                pre_pending_draw,
                turn_advanced: false,
            });
            return Ok(PlayOutcome {
                card: self.discard.last().cloned().expect("just pushed"),
                direction_reversed,
                skipped: None,
                pending_draw: self.pending_draw,
                one_penalty: None,
                round_won: Some(player),
                next_player: None,
                auto_resolved_pending: None,
                score: Some(score),
            });
        }

        let mut one_penalty = None;
        let mut penalty_drawn = Vec::new();
        if hand_len == 1 {
            if call_one {
                self.called_one.insert(player, true);
            } else {
                let (drawn, _) = self.draw_n(2, rng);
                penalty_drawn = drawn;
                let n = penalty_drawn.len() as u32;
                self.hands
                    .get_mut(&player)
                    .expect("checked above")
                    .extend(penalty_drawn.iter().cloned());
                self.called_one.insert(player, false);
                one_penalty = Some((player, n));
            }
        } else {
            self.called_one.insert(player, false);
        }

        let skipped = if self.next_skip {
            self.next_skip = false;
            let skipped = self.ring.advance();
            self.ring.advance();
            Some(skipped)
        } else {
            self.ring.advance();
            None
        };
        self.drew_this_turn = false;

        let mut auto_resolved_pending = None;
        if self.pending_draw > 0 && !self.stacking_enabled {
            let new_current = self.ring.current();
            let (drawn, _) = self.draw_n(self.pending_draw, rng);
            let n = drawn.len() as u32;
            self.hands
                .entry(new_current)
                .or_default()
                .extend(drawn);
            self.pending_draw = 0;
            auto_resolved_pending = Some((new_current, n));
            self.ring.advance();
        }
        self.restart_turn_timer();

        self.log.record(LogEntry {
            actor: player,
            kind: LogKind::Played { card: card.clone(), penalty_drawn },
            pre_declared,
            pre_ring,
            pre_skip_flag,
            pre_pending_draw,
            turn_advanced: true,
        });

        Ok(PlayOutcome {
            card,
            direction_reversed,
            skipped,
            pending_draw: self.pending_draw,
            one_penalty,
            round_won: None,
            next_player: Some(self.ring.current()),
            auto_resolved_pending,
            score: None,
        })
    }

    // ------------------------------------------------------------------
    // Draw (§4.4)
    // ------------------------------------------------------------------

    pub fn draw_card(
        &mut self,
        player: PlayerId,
        rng: &mut impl Rng,
    ) -> Result<DrawOutcome, EngineError> {
        if self.phase != Phase::Playing {
            return Err(EngineError::InvalidState("draw is only legal while Playing"));
        }
        if self.current_player() != Some(player) {
            return Err(EngineError::NotYourTurn);
        }

        let pre_ring = self.ring.clone();
        let pre_declared = self.declared_color();
        let pre_skip_flag = self.next_skip;
        let pre_pending_draw = self.pending_draw;

        if self.pending_draw > 0 {
            let n = self.pending_draw;
            let (drawn, refilled) = self.draw_n(n, rng);
            let actually_drawn = drawn.len() as u32;
            self.hands.entry(player).or_default().extend(drawn.clone());
            self.pending_draw = 0;
            self.ring.advance();
            self.drew_this_turn = false;
            self.restart_turn_timer();
            self.log.record(LogEntry {
                actor: player,
                kind: LogKind::Drew {
                    cards: drawn,
                    resolved_pending: true,
                    refilled,
                },
                pre_declared,
                pre_ring,
                pre_skip_flag,
                pre_pending_draw,
                turn_advanced: true,
            });
            return Ok(DrawOutcome {
                cards_drawn: actually_drawn,
                resolved_pending: true,
                refilled,
                turn_advanced: true,
                next_player: Some(self.ring.current()),
            });
        }

        if !self.drew_this_turn {
            let (card, refilled) = self.draw_one(rng);
            self.drew_this_turn = true;
            let drawn: Vec<Card> = card.iter().cloned().collect();
            let cards_drawn = drawn.len() as u32;
            if let Some(card) = card {
                self.hands.entry(player).or_default().push(card);
            }
            self.log.record(LogEntry {
                actor: player,
                kind: LogKind::Drew {
                    cards: drawn,
                    resolved_pending: false,
                    refilled,
                },
                pre_declared,
                pre_ring,
                pre_skip_flag,
                pre_pending_draw,
                turn_advanced: false,
            });
            return Ok(DrawOutcome {
                cards_drawn,
                resolved_pending: false,
                refilled,
                turn_advanced: false,
                next_player: Some(player),
            });
        }

        self.drew_this_turn = false;
        self.ring.advance();
        self.restart_turn_timer();
        self.log.record(LogEntry {
            actor: player,
            kind: LogKind::Drew {
                cards: Vec::new(),
                resolved_pending: false,
                refilled: false,
            },
            pre_declared,
            pre_ring,
            pre_skip_flag,
            pre_pending_draw,
            turn_advanced: true,
        });
        Ok(DrawOutcome {
            cards_drawn: 0,
            resolved_pending: false,
            refilled: false,
            turn_advanced: true,
            next_player: Some(self.ring.current()),
        })
    }

    // ------------------------------------------------------------------
    // Call ONE / Catch ONE (§4.4)
    // ------------------------------------------------------------------

    pub fn call_one(&mut self, player: PlayerId) -> Result<(), EngineError> {
        if self.phase != Phase::Playing {
            return Err(EngineError::InvalidState("call_one is only legal while Playing"));
        }
        let len = self.hands.get(&player).map(Hand::len).unwrap_or(0);
        if len != 1 || self.called_one.get(&player).copied().unwrap_or(false) {
            return Err(EngineError::CannotCallOne);
        }
        self.called_one.insert(player, true);
        self.log.record(LogEntry {
            actor: player,
            kind: LogKind::CalledOne,
            pre_declared: self.declared_color(),
            pre_ring: self.ring.clone(),
            pre_skip_flag: self.next_skip,
            pre_pending_draw: self.pending_draw,
            turn_advanced: false,
        });
        Ok(())
    }

    pub fn catch_one(
        &mut self,
        accuser: PlayerId,
        target: PlayerId,
        rng: &mut impl Rng,
    ) -> Result<CatchOutcome, EngineError> {
        if self.phase != Phase::Playing || accuser == target {
            return Err(EngineError::CannotCatchOne);
        }
        let len = self.hands.get(&target).map(Hand::len).unwrap_or(0);
        if len != 1 || self.called_one.get(&target).copied().unwrap_or(false) {
            return Err(EngineError::CannotCatchOne);
        }
        let (drawn, _) = self.draw_n(2, rng);
        let penalty = drawn.len() as u32;
        self.hands.entry(target).or_default().extend(drawn);
        self.called_one.insert(target, false);
        Ok(CatchOutcome { target, penalty })
    }

    // ------------------------------------------------------------------
    // Pause / resume / leave
    // ------------------------------------------------------------------

    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Playing {
            return Err(EngineError::InvalidState("pause is only legal while Playing"));
        }
        self.phase = Phase::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Paused {
            return Err(EngineError::InvalidState("resume is only legal while Paused"));
        }
        self.phase = Phase::Playing;
        self.restart_turn_timer();
        Ok(())
    }

    /// Swaps a disconnected human's seat for a temporary bot, carrying the
    /// hand and ONE flag across unchanged (§4.9 disconnect grace).
    pub fn replace_seat(&mut self, old: PlayerId, new: PlayerId) {
        if let Some(hand) = self.hands.remove(&old) {
            self.hands.insert(new, hand);
        }
        if let Some(flag) = self.called_one.remove(&old) {
            self.called_one.insert(new, flag);
        }
        self.ring.replace_id(old, new);
    }

    /// Removes a seat entirely (tournament-mode leave). Ends the round with
    /// no winner if fewer than two seats remain.
    pub fn remove_seat(&mut self, player: PlayerId) -> Option<PlayerId> {
        self.hands.remove(&player);
        self.called_one.remove(&player);
        let was_current = self.current_player() == Some(player);
        self.ring.remove_by_id(player);
        if self.ring.len() < 2 {
            self.phase = Phase::GameOver;
            self.winner = self.ring.seats().first().copied();
            return self.winner;
        }
        if was_current {
            self.restart_turn_timer();
        }
        None
    }

    // ------------------------------------------------------------------
    // Scoring (§4.4 "End round")
    // ------------------------------------------------------------------

    fn end_round(&mut self, winner: PlayerId) -> ScoreDelta {
        self.phase = Phase::GameOver;
        self.winner = Some(winner);
        let points: Points = self
            .hands
            .iter()
            .filter(|(&p, _)| p != winner)
            .map(|(_, hand)| hand.iter().map(Card::points).sum::<Points>())
            .sum();
        ScoreDelta { winner, points }
    }

    // ------------------------------------------------------------------
    // Undo (§4.7)
    // ------------------------------------------------------------------

    /// Reverses the most recently applied command, if the turn has not
    /// advanced since and undo is not disabled (tournament mode).
    pub fn undo(&mut self) -> Result<(), EngineError> {
        if self.tournament {
            return Err(EngineError::InvalidState("undo is disabled in tournament mode"));
        }
        let entry = self
            .log
            .take_undoable()
            .ok_or(EngineError::InvalidState("nothing to undo"))?;
        match entry.kind {
            LogKind::Played { card, penalty_drawn } => {
                self.discard.pop();
                let mut original = card;
                original.clear_declared();
                self.hands.entry(entry.actor).or_default().push(original);
                for drawn in penalty_drawn.into_iter().rev() {
                    if let Some(hand) = self.hands.get_mut(&entry.actor) {
                        if let Some(c) = hand.remove(drawn.id()) {
                            self.deck.push(c);
                        }
                    }
                }
            }
            LogKind::Drew { cards, refilled, .. } => {
                if refilled {
                    return Err(EngineError::InvalidState(
                        "undo across a discard refill is not supported",
                    ));
                }
                for drawn in cards.into_iter().rev() {
                    if let Some(hand) = self.hands.get_mut(&entry.actor) {
                        if let Some(c) = hand.remove(drawn.id()) {
                            self.deck.push(c);
                        }
                    }
                }
            }
            LogKind::CalledOne => {
                self.called_one.insert(entry.actor, false);
            }
        }
        self.ring = entry.pre_ring;
        self.next_skip = entry.pre_skip_flag;
        self.pending_draw = entry.pre_pending_draw;
        if let (Some(top), Some(color)) = (self.discard.last_mut(), entry.pre_declared) {
            let _ = top.set_declared(color);
        } else if let Some(top) = self.discard.last_mut() {
            top.clear_declared();
        }
        if self.phase == Phase::GameOver {
            self.phase = Phase::Playing;
            self.winner = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardroom_cards::Color;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(1)
    }

    fn seated(n: usize) -> (GameSession, Vec<PlayerId>) {
        let ids: Vec<PlayerId> = (0..n).map(|_| PlayerId::default()).collect();
        let mut session = GameSession::new(ids.clone(), true, false);
        session.deal(7, &mut rng()).unwrap();
        (session, ids)
    }

    #[test]
    fn deal_gives_every_seat_the_configured_hand_size() {
        let (session, ids) = seated(3);
        for id in ids {
            assert_eq!(session.hand(id).unwrap().len(), 7);
        }
        assert!(session.top().is_some());
        assert!(!session.top().unwrap().is_wild());
    }

    #[test]
    fn card_count_is_valid_after_deal() {
        let (session, _ids) = seated(4);
        assert!(session.card_count_is_valid());
    }

    #[test]
    fn card_count_is_invalid_once_a_hand_is_tampered_with() {
        let (mut session, ids) = seated(2);
        session.hands.get_mut(&ids[0]).unwrap().push(Card::new(Variant::Number(4), Color::Red));
        assert!(!session.card_count_is_valid());
    }

    #[test]
    fn card_multiset_is_conserved_after_deal() {
        let (session, ids) = seated(4);
        let mut total = session.deck.len() + session.discard.len();
        for id in ids {
            total += session.hand(id).unwrap().len();
        }
        assert_eq!(total, 108);
    }

    #[test]
    fn playing_down_to_one_without_call_one_triggers_penalty() {
        let (mut session, ids) = seated(2);
        let player = ids[0];
        // Force a legal, deterministic setup: give the player a hand of
        // exactly two cards that both match the discard top's color, then
        // play one down to one card with call_one = false.
        let color = session.top().unwrap().color();
        let hand = Hand::from(vec![
            Card::new(Variant::Number(1), color),
            Card::new(Variant::Number(2), color),
        ]);
        session.hands.insert(player, hand.clone());
        let card_id = hand.iter().next().unwrap().id();
        let before = session.hands[&player].len();
        let outcome = session
            .play_card(player, card_id, None, false, &mut rng())
            .unwrap();
        assert!(outcome.one_penalty.is_some());
        assert_eq!(session.hands[&player].len(), before - 1 + 2);
    }

    #[test]
    fn call_one_suppresses_penalty() {
        let (mut session, ids) = seated(2);
        let player = ids[0];
        let color = session.top().unwrap().color();
        let hand = Hand::from(vec![
            Card::new(Variant::Number(1), color),
            Card::new(Variant::Number(2), color),
        ]);
        session.hands.insert(player, hand.clone());
        let card_id = hand.iter().next().unwrap().id();
        let outcome = session
            .play_card(player, card_id, None, true, &mut rng())
            .unwrap();
        assert!(outcome.one_penalty.is_none());
        assert_eq!(session.hands[&player].len(), 1);
    }

    #[test]
    fn two_player_reverse_acts_as_skip() {
        let (mut session, ids) = seated(2);
        let actor = ids[0];
        let color = session.top().unwrap().color();
        let hand = Hand::from(vec![Card::new(Variant::Reverse, color)]);
        session.hands.insert(actor, hand.clone());
        let card_id = hand.iter().next().unwrap().id();
        let outcome = session
            .play_card(actor, card_id, None, false, &mut rng())
            .unwrap();
        assert_eq!(outcome.next_player, Some(actor));
    }

    #[test]
    fn stacking_accumulates_then_draw_resolves() {
        let (mut session, ids) = seated(3);
        let p1 = ids[0];
        let p2 = ids[1];
        let p3 = ids[2];
        let red = Color::Red;
        session.discard.push(Card::new(Variant::Number(0), red));
        session
            .hands
            .insert(p1, Hand::from(vec![Card::new(Variant::DrawTwo, red)]));
        session
            .hands
            .insert(p2, Hand::from(vec![Card::new(Variant::DrawTwo, red)]));
        let card1 = session.hand(p1).unwrap().iter().next().unwrap().id();
        session.play_card(p1, card1, None, false, &mut rng()).unwrap();
        assert_eq!(session.pending_draw(), 2);
        let card2 = session.hand(p2).unwrap().iter().next().unwrap().id();
        session.play_card(p2, card2, None, false, &mut rng()).unwrap();
        assert_eq!(session.pending_draw(), 4);
        assert_eq!(session.current_player(), Some(p3));
        let before = session.hand(p3).unwrap().len();
        let outcome = session.draw_card(p3, &mut rng()).unwrap();
        assert_eq!(outcome.cards_drawn, 4);
        assert_eq!(session.pending_draw(), 0);
        assert_eq!(session.hand(p3).unwrap().len(), before + 4);
    }

    #[test]
    fn catch_one_applies_penalty_without_changing_turn() {
        let (mut session, ids) = seated(3);
        let target = ids[1];
        session
            .hands
            .insert(target, Hand::from(vec![Card::new(Variant::Number(1), Color::Red)]));
        let current_before = session.current_player();
        let outcome = session.catch_one(ids[0], target, &mut rng()).unwrap();
        assert_eq!(outcome.penalty, 2);
        assert_eq!(session.hand(target).unwrap().len(), 3);
        assert_eq!(session.current_player(), current_before);
    }

    #[test]
    fn catch_one_rejected_once_target_is_no_longer_at_one_card() {
        let (mut session, ids) = seated(3);
        let target = ids[1];
        session.hands.insert(
            target,
            Hand::from(vec![
                Card::new(Variant::Number(1), Color::Red),
                Card::new(Variant::Number(2), Color::Blue),
            ]),
        );
        assert!(session.catch_one(ids[0], target, &mut rng()).is_err());
    }

    #[test]
    fn undo_is_a_no_op_on_visible_state() {
        let (mut session, ids) = seated(2);
        let player = ids[0];
        let color = session.top().unwrap().color();
        let hand = Hand::from(vec![Card::new(Variant::Number(3), color)]);
        session.hands.insert(player, hand.clone());
        let before_hand = session.hand(player).unwrap().clone();
        let before_discard = session.discard.clone();
        let before_current = session.current_player();
        let card_id = hand.iter().next().unwrap().id();
        session.play_card(player, card_id, None, false, &mut rng()).unwrap();
        session.undo().unwrap();
        assert_eq!(session.hand(player).unwrap().len(), before_hand.len());
        assert_eq!(session.discard.len(), before_discard.len());
        assert_eq!(session.current_player(), before_current);
    }

    #[test]
    fn undo_disabled_in_tournament_mode() {
        let ids: Vec<PlayerId> = (0..2).map(|_| PlayerId::default()).collect();
        let mut session = GameSession::new(ids, true, true);
        session.deal(7, &mut rng()).unwrap();
        assert!(session.undo().is_err());
    }

    #[test]
    fn tournament_mode_rejects_wild_draw_four_while_holding_the_current_color() {
        let ids: Vec<PlayerId> = (0..2).map(|_| PlayerId::default()).collect();
        let player = ids[0];
        let mut session = GameSession::new(ids, true, true);
        session.deal(7, &mut rng()).unwrap();
        let color = session.top().unwrap().effective_color();
        let hand = Hand::from(vec![
            Card::new(Variant::WildDrawFour, Color::Wild),
            Card::new(Variant::Number(3), color),
        ]);
        session.hands.insert(player, hand.clone());
        let card_id = hand
            .iter()
            .find(|c| c.variant() == Variant::WildDrawFour)
            .unwrap()
            .id();
        let err = session
            .play_card(player, card_id, Some(Color::Red), false, &mut rng())
            .unwrap_err();
        assert_eq!(err, EngineError::IllegalCard);
    }

    #[test]
    fn non_tournament_mode_allows_wild_draw_four_while_holding_the_current_color() {
        let (mut session, ids) = seated(2);
        let player = ids[0];
        let color = session.top().unwrap().effective_color();
        let hand = Hand::from(vec![
            Card::new(Variant::WildDrawFour, Color::Wild),
            Card::new(Variant::Number(3), color),
        ]);
        session.hands.insert(player, hand.clone());
        let card_id = hand
            .iter()
            .find(|c| c.variant() == Variant::WildDrawFour)
            .unwrap()
            .id();
        let outcome = session
            .play_card(player, card_id, Some(Color::Red), false, &mut rng())
            .unwrap();
        assert_eq!(outcome.pending_draw, 4);
    }
}
