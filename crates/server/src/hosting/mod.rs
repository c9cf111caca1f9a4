//! WebSocket game hosting: the room-handle map (`Casino`) and the
//! per-connection bridge between a live socket and a room's `Scheduler`
//! (§5, §6).

mod bridge;
pub mod handlers;

pub use bridge::bridge;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use cardroom_core::PlayerId;
use cardroom_engine::EngineError;
use cardroom_identity::Identity;
use cardroom_identity::Leaderboard;
use cardroom_identity::StatisticsSink;
use cardroom_room::RoomConfig;
use cardroom_room::RoomRegistry;
use cardroom_transport::Request;
use cardroom_transport::Scheduler;
use cardroom_transport::Table;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Process-wide room-handle map: every live room's `Scheduler` inbox, keyed
/// by room code (§4.5 "Room Registry", §5). [`RoomRegistry`] is consulted
/// only to mint a collision-free code and to track which room a player
/// belongs to; ownership of the `Room` itself passes to its worker the
/// moment the code is minted, and nothing outside that worker ever touches
/// it again (§5 "per-room single-threaded cooperative").
pub struct Casino {
    registry: RoomRegistry,
    schedulers: RwLock<HashMap<String, UnboundedSender<Request>>>,
    identity: Arc<dyn Identity>,
    statistics: Arc<dyn StatisticsSink>,
    leaderboard: Arc<dyn Leaderboard>,
}

impl Casino {
    pub fn new(
        identity: Arc<dyn Identity>,
        statistics: Arc<dyn StatisticsSink>,
        leaderboard: Arc<dyn Leaderboard>,
    ) -> Self {
        Self {
            registry: RoomRegistry::new(),
            schedulers: RwLock::new(HashMap::new()),
            identity,
            statistics,
            leaderboard,
        }
    }

    pub fn identity(&self) -> &Arc<dyn Identity> {
        &self.identity
    }

    pub fn statistics(&self) -> &Arc<dyn StatisticsSink> {
        &self.statistics
    }

    pub fn leaderboard(&self) -> &Arc<dyn Leaderboard> {
        &self.leaderboard
    }

    /// Mints a code, builds the lobby `Room`, and spawns its worker.
    pub fn create_room(
        &self,
        name: Option<String>,
        private: bool,
        config: RoomConfig,
    ) -> Result<String, EngineError> {
        let mut rng = SmallRng::from_os_rng();
        let code = self.registry.create(&mut rng, name, private, config)?;
        let room = self
            .registry
            .remove(&code)
            .expect("just inserted by create");
        let sender = Scheduler::spawn(room, Table::new(), self.statistics.clone(), self.leaderboard.clone());
        self.schedulers
            .write()
            .expect("casino lock poisoned")
            .insert(code.clone(), sender);
        log::info!("[casino] created room {code}");
        Ok(code)
    }

    pub fn room_codes(&self) -> Vec<String> {
        self.schedulers
            .read()
            .expect("casino lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn sender(&self, code: &str) -> Option<UnboundedSender<Request>> {
        self.schedulers
            .read()
            .expect("casino lock poisoned")
            .get(code)
            .cloned()
    }

    /// Routes a lobby join through the room's own worker (§4.5 "Join"), so a
    /// capacity check can never race a concurrent join.
    pub async fn join(
        &self,
        code: &str,
        nickname: String,
        identity_user: Option<String>,
        email: String,
    ) -> Result<(PlayerId, UnboundedSender<Request>), EngineError> {
        let sender = self.sender(code).ok_or(EngineError::UnknownRoom)?;
        let (reply, reply_rx) = oneshot::channel();
        sender
            .send(Request::Join { nickname, identity_user, email, reply })
            .map_err(|_| EngineError::UnknownRoom)?;
        let player = reply_rx.await.map_err(|_| EngineError::UnknownRoom)??;
        self.registry.attach_member(player, code);
        Ok((player, sender))
    }

    /// Routes a reconnect attempt through the room's own worker, matching
    /// a returning socket's identity-service user back to its existing
    /// seat (§4.9 "disconnect grace") rather than seating a fresh human.
    pub async fn rejoin(
        &self,
        code: &str,
        identity_user: &str,
    ) -> Result<(PlayerId, UnboundedSender<Request>), EngineError> {
        let sender = self.sender(code).ok_or(EngineError::UnknownRoom)?;
        let (reply, reply_rx) = oneshot::channel();
        sender
            .send(Request::Rejoin { identity_user: identity_user.to_string(), reply })
            .map_err(|_| EngineError::UnknownRoom)?;
        let player = reply_rx.await.map_err(|_| EngineError::UnknownRoom)??;
        self.registry.attach_member(player, code);
        Ok((player, sender))
    }

    pub fn detach(&self, player: PlayerId) {
        self.registry.detach_member(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardroom_identity::StubIdentity;
    use cardroom_identity::StubLeaderboard;
    use cardroom_identity::StubStatisticsSink;

    fn casino() -> Casino {
        Casino::new(
            Arc::new(StubIdentity::new()),
            Arc::new(StubStatisticsSink),
            Arc::new(StubLeaderboard),
        )
    }

    #[test]
    fn create_room_yields_a_looked_up_code() {
        let casino = casino();
        let code = casino.create_room(None, false, RoomConfig::default()).unwrap();
        assert!(casino.room_codes().contains(&code));
    }

    #[tokio::test]
    async fn join_seats_a_human_in_a_created_room() {
        let casino = casino();
        let code = casino.create_room(None, false, RoomConfig::default()).unwrap();
        let (player, _sender) = casino
            .join(&code, "ada".to_string(), None, "ada@example.com".to_string())
            .await
            .unwrap();
        assert_eq!(casino.registry.room_code_of(player), Some(code));
    }

    #[tokio::test]
    async fn join_against_an_unknown_code_fails() {
        let casino = casino();
        let err = casino
            .join("ZZZZZZ", "ada".to_string(), None, "ada@example.com".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownRoom);
    }
}
