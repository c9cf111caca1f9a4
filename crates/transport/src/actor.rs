use cardroom_core::PlayerId;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::event::Event;
use crate::protocol::Protocol;

/// The write half of one player's live connection. Implemented over an
/// `actix_ws::Session` by the `server` crate; a test double can be any
/// in-memory sink. Returning `false` tells the actor its connection is
/// gone, the same signal the teacher's `Player::alive` gave for a
/// disconnected human.
#[async_trait::async_trait]
pub trait OutboundSink: Send {
    async fn send(&mut self, message: crate::message::ServerMessage) -> bool;
}

/// Forwards one room's [`Event`]s to one connected player (§4.9, §5 "Actor
/// task wrapper"). Bots need no such task: their turns are decided
/// synchronously by [`crate::scheduler::Scheduler`] and never watch the
/// event stream.
pub struct Actor<S: OutboundSink> {
    player: PlayerId,
    room: String,
    sink: S,
    events: UnboundedReceiver<Event>,
}

impl<S: OutboundSink + 'static> Actor<S> {
    pub fn spawn(
        player: PlayerId,
        room: String,
        sink: S,
        events: UnboundedReceiver<Event>,
    ) -> tokio::task::JoinHandle<()> {
        let actor = Self { player, room, sink, events };
        tokio::spawn(actor.run())
    }

    async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            let at = now_millis();
            let message = Protocol::encode(&self.room, &event, at);
            if !self.sink.send(message).await {
                log::info!("[actor {}] connection closed, ending", self.player);
                break;
            }
        }
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ServerMessage;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use tokio::sync::mpsc::unbounded_channel;

    struct CountingSink(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl OutboundSink for CountingSink {
        async fn send(&mut self, _message: ServerMessage) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[tokio::test]
    async fn forwards_every_event_until_the_channel_closes() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = unbounded_channel();
        let player = PlayerId::default();
        let handle = Actor::spawn(player, "ABC123".to_string(), CountingSink(count.clone()), rx);
        tx.send(Event::GamePaused).unwrap();
        tx.send(Event::GameResumed).unwrap();
        drop(tx);
        handle.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
