use std::time::Duration;

use cardroom_core::DEFAULT_DISCONNECT_GRACE_SECS;
use tokio::time::Instant;

/// Configuration for a room's two deadlines (§4.9).
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    /// How long a human has to act before the bot driver takes their turn.
    pub turn: Duration,
    /// How long a disconnected human's seat is held before being replaced
    /// by a temporary bot.
    pub disconnect_grace: Duration,
}

impl TimerConfig {
    pub fn new(turn_seconds: u64) -> Self {
        Self {
            turn: Duration::from_secs(turn_seconds),
            disconnect_grace: Duration::from_secs(DEFAULT_DISCONNECT_GRACE_SECS),
        }
    }
}

/// Tracks a single active deadline. A room's scheduler owns one `Timer` for
/// the turn clock and a separate one per disconnected seat's grace period.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self { config, deadline: None }
    }

    pub fn start_turn(&mut self) {
        self.deadline = Some(Instant::now() + self.config.turn);
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_starts_cleared() {
        let timer = Timer::new(TimerConfig::new(20));
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }

    #[test]
    fn start_turn_sets_a_future_deadline() {
        let mut timer = Timer::new(TimerConfig::new(20));
        timer.start_turn();
        assert!(timer.deadline().is_some());
        assert!(!timer.expired());
    }

    #[test]
    fn clear_removes_the_deadline() {
        let mut timer = Timer::new(TimerConfig::new(20));
        timer.start_turn();
        timer.clear();
        assert!(timer.deadline().is_none());
    }
}
