use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_core::PlayerId;
use cardroom_core::ID;

use crate::ring::TurnRing;

/// Inbound commands a [`crate::session::GameSession`] can apply (§6).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlayCard {
        player: PlayerId,
        card: ID<Card>,
        declared_color: Option<Color>,
        call_one: bool,
    },
    DrawCard {
        player: PlayerId,
    },
    CallOne {
        player: PlayerId,
    },
    CatchOne {
        accuser: PlayerId,
        target: PlayerId,
    },
}

/// What a logged command did, with enough detail to reverse it exactly.
#[derive(Debug, Clone)]
pub enum LogKind {
    Played {
        card: Card,
        penalty_drawn: Vec<Card>,
    },
    Drew {
        cards: Vec<Card>,
        resolved_pending: bool,
        refilled: bool,
    },
    CalledOne,
}

/// One applied command with the pre-command state needed to undo it (§4.7).
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub actor: PlayerId,
    pub kind: LogKind,
    pub pre_declared: Option<Color>,
    pub pre_ring: TurnRing,
    pub pre_skip_flag: bool,
    pub pre_pending_draw: u32,
    pub turn_advanced: bool,
}

/// Per-session record of applied commands. Append-only within a turn; the
/// previous entry is dropped ("sealed") as soon as a new command begins
/// processing after a turn boundary, so only the single most recent command
/// is ever undoable.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    history: Vec<LogEntry>,
    undoable: Option<LogEntry>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seals the log if the previous command already advanced the turn,
    /// then records `entry` as the new undo candidate. Call this once per
    /// successfully applied command, before any further command is read.
    pub fn record(&mut self, entry: LogEntry) {
        if matches!(self.undoable, Some(ref e) if e.turn_advanced) {
            self.undoable = None;
        }
        self.history.push(entry.clone());
        self.undoable = Some(entry);
    }

    /// Takes the currently undoable entry, if any, clearing it so the same
    /// command cannot be undone twice.
    pub fn take_undoable(&mut self) -> Option<LogEntry> {
        self.undoable.take()
    }

    pub fn can_undo(&self) -> bool {
        self.undoable.is_some()
    }

    pub fn history(&self) -> &[LogEntry] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(turn_advanced: bool) -> LogEntry {
        LogEntry {
            actor: PlayerId::default(),
            kind: LogKind::CalledOne,
            pre_declared: None,
            pre_ring: TurnRing::new(vec![PlayerId::default(), PlayerId::default()]),
            pre_skip_flag: false,
            pre_pending_draw: 0,
            turn_advanced,
        }
    }

    #[test]
    fn records_remain_undoable_until_sealed() {
        let mut log = CommandLog::new();
        log.record(entry(false));
        assert!(log.can_undo());
    }

    #[test]
    fn advancing_entry_seals_on_next_record() {
        let mut log = CommandLog::new();
        log.record(entry(true));
        assert!(log.can_undo(), "still undoable immediately after");
        log.record(entry(false));
        assert_eq!(log.history().len(), 2);
        // the second entry is the new undo candidate; the first was sealed.
        assert!(log.can_undo());
        let taken = log.take_undoable().unwrap();
        assert!(!taken.turn_advanced);
    }
}
