use std::collections::HashMap;
use std::collections::HashSet;

use cardroom_core::PlayerId;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;

/// Per-room event bus (§4.8, §5 "event bus"). Keyed by [`PlayerId`] rather
/// than a fixed seat index, since bot and human seats come and go across a
/// room's lifetime unlike poker's fixed-size table.
#[derive(Debug, Default)]
pub struct Table {
    senders: HashMap<PlayerId, UnboundedSender<Event>>,
    disconnected: HashSet<PlayerId>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the outbound channel for `player`.
    pub fn sit(&mut self, player: PlayerId, sender: UnboundedSender<Event>) {
        self.senders.insert(player, sender);
    }

    /// Drops a seat's channel entirely, e.g. once it has left the room.
    pub fn leave(&mut self, player: PlayerId) {
        self.senders.remove(&player);
        self.disconnected.remove(&player);
    }

    pub fn disconnect(&mut self, player: PlayerId) {
        self.disconnected.insert(player);
    }

    pub fn reconnect(&mut self, player: PlayerId) {
        self.disconnected.remove(&player);
    }

    pub fn is_disconnected(&self, player: PlayerId) -> bool {
        self.disconnected.contains(&player)
    }

    pub fn seats(&self) -> usize {
        self.senders.len()
    }

    pub fn connected_count(&self) -> usize {
        self.senders
            .keys()
            .filter(|player| !self.disconnected.contains(*player))
            .count()
    }

    pub fn sender(&self, player: PlayerId) -> Option<&UnboundedSender<Event>> {
        self.senders.get(&player)
    }

    /// Sends `event` to one player only, e.g. a [`Event::HandSnapshot`] or a
    /// command rejection (§4.8 "unicast").
    pub fn unicast(&self, player: PlayerId, event: Event) {
        match self.sender(player).map(|inbox| inbox.send(event)) {
            Some(Ok(())) => {}
            Some(Err(e)) => log::warn!("[table] unicast to {player} failed: {e:?}"),
            None => log::warn!("[table] unicast to {player}: not seated"),
        }
    }

    /// Sends `event` to every seated player, connected or not — a
    /// disconnected human's channel buffers until they reconnect.
    pub fn broadcast(&self, event: Event) {
        log::debug!("[table] broadcast: {event}");
        for (player, inbox) in self.senders.iter() {
            if let Err(e) = inbox.send(event.clone()) {
                log::warn!("[table] broadcast to {player} failed: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn sit_and_disconnect_track_connected_count() {
        let mut table = Table::new();
        let player = PlayerId::default();
        let (tx, _rx) = unbounded_channel();
        table.sit(player, tx);
        assert_eq!(table.connected_count(), 1);
        table.disconnect(player);
        assert!(table.is_disconnected(player));
        assert_eq!(table.connected_count(), 0);
        table.reconnect(player);
        assert_eq!(table.connected_count(), 1);
    }

    #[test]
    fn unicast_delivers_only_to_the_named_seat() {
        let mut table = Table::new();
        let a = PlayerId::default();
        let b = PlayerId::default();
        let (tx_a, mut rx_a) = unbounded_channel();
        let (tx_b, mut rx_b) = unbounded_channel();
        table.sit(a, tx_a);
        table.sit(b, tx_b);
        table.unicast(a, Event::GamePaused);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn broadcast_reaches_every_seat() {
        let mut table = Table::new();
        let a = PlayerId::default();
        let b = PlayerId::default();
        let (tx_a, mut rx_a) = unbounded_channel();
        let (tx_b, mut rx_b) = unbounded_channel();
        table.sit(a, tx_a);
        table.sit(b, tx_b);
        table.broadcast(Event::GameResumed);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn leave_removes_the_seat_entirely() {
        let mut table = Table::new();
        let player = PlayerId::default();
        let (tx, _rx) = unbounded_channel();
        table.sit(player, tx);
        table.leave(player);
        assert_eq!(table.seats(), 0);
    }
}
