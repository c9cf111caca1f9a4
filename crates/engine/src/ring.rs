use cardroom_core::PlayerId;

/// Circular ordered collection of seats with a current cursor and a
/// direction flag (§4.2). Reverse and Skip map directly onto `reverse` and
/// `skip`; no boundary checks are needed since indices always wrap.
#[derive(Debug, Clone)]
pub struct TurnRing {
    seats: Vec<PlayerId>,
    current: usize,
    clockwise: bool,
}

impl TurnRing {
    pub fn new(seats: Vec<PlayerId>) -> Self {
        assert!(!seats.is_empty(), "turn ring must have at least one seat");
        Self {
            seats,
            current: 0,
            clockwise: true,
        }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    pub fn current(&self) -> PlayerId {
        self.seats[self.current]
    }

    fn step(&self, from: usize, clockwise: bool) -> usize {
        let len = self.seats.len() as isize;
        let delta: isize = if clockwise { 1 } else { -1 };
        (((from as isize + delta) % len + len) % len) as usize
    }

    pub fn peek_next(&self) -> PlayerId {
        self.seats[self.step(self.current, self.clockwise)]
    }

    /// Advances the cursor one step in the current direction, returning the
    /// new current seat.
    pub fn advance(&mut self) -> PlayerId {
        self.current = self.step(self.current, self.clockwise);
        self.current()
    }

    /// Flips direction. The cursor does not move.
    pub fn reverse(&mut self) {
        self.clockwise = !self.clockwise;
    }

    /// Advances twice, returning the seat that was skipped over (the new
    /// current after the first advance, not the final one).
    pub fn skip(&mut self) -> PlayerId {
        let skipped = self.advance();
        self.advance();
        skipped
    }

    /// Removes the current seat, returning it. The cursor lands on whatever
    /// seat was "next" before the removal.
    pub fn remove_current(&mut self) -> PlayerId {
        let removed = self.current();
        let next = (self.seats.len() > 1).then(|| self.peek_next());
        self.seats.remove(self.current);
        self.current = match next {
            Some(next_id) if !self.seats.is_empty() => self
                .seats
                .iter()
                .position(|&s| s == next_id)
                .unwrap_or(0),
            _ => 0,
        };
        removed
    }

    /// Swaps the identity at a seat in place, preserving the cursor and
    /// direction. Used when a disconnected human is replaced by a
    /// temporary bot occupying the same position in the ring.
    pub fn replace_id(&mut self, old: PlayerId, new: PlayerId) -> bool {
        match self.seats.iter().position(|&s| s == old) {
            Some(idx) => {
                self.seats[idx] = new;
                true
            }
            None => false,
        }
    }

    /// Removes an arbitrary seat by identity (O(n)). If it is not the
    /// current seat, the cursor stays pinned to whichever seat was current.
    pub fn remove_by_id(&mut self, id: PlayerId) -> Option<PlayerId> {
        let idx = self.seats.iter().position(|&s| s == id)?;
        if idx == self.current {
            return Some(self.remove_current());
        }
        let current_id = self.current();
        self.seats.remove(idx);
        self.current = self
            .seats
            .iter()
            .position(|&s| s == current_id)
            .unwrap_or(0);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> (TurnRing, Vec<PlayerId>) {
        let ids: Vec<PlayerId> = (0..n).map(|_| PlayerId::default()).collect();
        (TurnRing::new(ids.clone()), ids)
    }

    #[test]
    fn advance_wraps_clockwise() {
        let (mut r, ids) = ring(3);
        assert_eq!(r.current(), ids[0]);
        assert_eq!(r.advance(), ids[1]);
        assert_eq!(r.advance(), ids[2]);
        assert_eq!(r.advance(), ids[0]);
    }

    #[test]
    fn reverse_flips_without_moving_cursor() {
        let (mut r, ids) = ring(3);
        r.reverse();
        assert_eq!(r.current(), ids[0]);
        assert_eq!(r.advance(), ids[2]);
    }

    #[test]
    fn two_seat_reverse_then_advance_returns_to_actor() {
        // Models §4.4 step 4/7 for a 2-seat ring: Reverse flips direction and
        // (handled by the session) also sets the skip flag, so advancing
        // twice after the flip lands back on the original actor.
        let (mut r, ids) = ring(2);
        assert_eq!(r.current(), ids[0]);
        r.reverse();
        assert_eq!(r.advance(), ids[1]);
        assert_eq!(r.advance(), ids[0]);
    }

    #[test]
    fn skip_returns_the_skipped_seat_not_the_landing_seat() {
        let (mut r, ids) = ring(3);
        let skipped = r.skip();
        assert_eq!(skipped, ids[1]);
        assert_eq!(r.current(), ids[2]);
    }

    #[test]
    fn remove_current_advances_to_next_in_direction() {
        let (mut r, ids) = ring(3);
        let removed = r.remove_current();
        assert_eq!(removed, ids[0]);
        assert_eq!(r.current(), ids[1]);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn remove_by_id_preserves_current_when_not_current() {
        let (mut r, ids) = ring(3);
        r.advance(); // current = ids[1]
        r.remove_by_id(ids[2]);
        assert_eq!(r.current(), ids[1]);
        assert_eq!(r.len(), 2);
    }
}
