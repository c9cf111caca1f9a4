use std::collections::HashMap;
use std::sync::RwLock;

use cardroom_core::PlayerId;
use cardroom_core::ROOM_CODE_ALPHABET;
use cardroom_core::ROOM_CODE_LEN;
use cardroom_engine::EngineError;
use rand::Rng;

use crate::config::RoomConfig;
use crate::room::Room;

const MAX_CODE_ATTEMPTS: usize = 16;

/// Process-wide index of rooms by code, with per-player back-references
/// (§4.5 "Room Registry", §5 "the only structure accessed across
/// workers"). Guarded by a single `RwLock`: membership changes (insert,
/// remove) take the write lock; everything else only needs a read.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Room>>,
    members: RwLock<HashMap<PlayerId, String>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh 6-character code and inserts a new `Room` under it,
    /// retrying on collision (§4.5 "Room code generation").
    pub fn create(
        &self,
        rng: &mut impl Rng,
        name: Option<String>,
        private: bool,
        config: RoomConfig,
    ) -> Result<String, EngineError> {
        let mut rooms = self.rooms.write().expect("room registry lock poisoned");
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code(rng);
            if !rooms.contains_key(&code) {
                rooms.insert(code.clone(), Room::new(code.clone(), name, private, config));
                return Ok(code);
            }
        }
        Err(EngineError::RoomCodeCollision)
    }

    /// Records that `player` belongs to the room at `code`, so lookups from
    /// a bare connection id can find their room without scanning.
    pub fn attach_member(&self, player: PlayerId, code: &str) {
        self.members
            .write()
            .expect("room registry lock poisoned")
            .insert(player, code.to_string());
    }

    pub fn detach_member(&self, player: PlayerId) {
        self.members
            .write()
            .expect("room registry lock poisoned")
            .remove(&player);
    }

    pub fn room_code_of(&self, player: PlayerId) -> Option<String> {
        self.members
            .read()
            .expect("room registry lock poisoned")
            .get(&player)
            .cloned()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rooms
            .read()
            .expect("room registry lock poisoned")
            .contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.read().expect("room registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with read access to the room at `code`, if it exists.
    pub fn with_room<R>(&self, code: &str, f: impl FnOnce(&Room) -> R) -> Result<R, EngineError> {
        let rooms = self.rooms.read().expect("room registry lock poisoned");
        rooms.get(code).map(f).ok_or(EngineError::UnknownRoom)
    }

    /// Runs `f` with write access to the room at `code`, if it exists. This
    /// is the only mutation path for an individual room's state; callers
    /// serialize through this lock the same way a per-room worker would.
    pub fn with_room_mut<R>(
        &self,
        code: &str,
        f: impl FnOnce(&mut Room) -> R,
    ) -> Result<R, EngineError> {
        let mut rooms = self.rooms.write().expect("room registry lock poisoned");
        rooms.get_mut(code).map(f).ok_or(EngineError::UnknownRoom)
    }

    /// Removes a room entirely, releasing its code for reuse (§4.5).
    pub fn remove(&self, code: &str) -> Option<Room> {
        let mut rooms = self.rooms.write().expect("room registry lock poisoned");
        let room = rooms.remove(code);
        if room.is_some() {
            let mut members = self.members.write().expect("room registry lock poisoned");
            members.retain(|_, c| c != code);
        }
        room
    }

    /// All current room codes, for admin/listing endpoints.
    pub fn codes(&self) -> Vec<String> {
        self.rooms
            .read()
            .expect("room registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

fn generate_code(rng: &mut impl Rng) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| {
            let index = rng.random_range(0..ROOM_CODE_ALPHABET.len());
            ROOM_CODE_ALPHABET[index] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn generated_codes_have_the_configured_length_and_alphabet() {
        let code = generate_code(&mut rng());
        assert_eq!(code.len(), ROOM_CODE_LEN);
        assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn create_inserts_a_lookup_up_room() {
        let registry = RoomRegistry::new();
        let code = registry
            .create(&mut rng(), None, false, RoomConfig::default())
            .unwrap();
        assert!(registry.contains(&code));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_releases_the_code_and_its_members() {
        let registry = RoomRegistry::new();
        let code = registry
            .create(&mut rng(), None, false, RoomConfig::default())
            .unwrap();
        let player = PlayerId::default();
        registry.attach_member(player, &code);
        assert!(registry.remove(&code).is_some());
        assert!(!registry.contains(&code));
        assert_eq!(registry.room_code_of(player), None);
    }

    #[test]
    fn with_room_mut_rejects_unknown_code() {
        let registry = RoomRegistry::new();
        let result = registry.with_room_mut("ZZZZZZ", |_| ());
        assert_eq!(result, Err(EngineError::UnknownRoom));
    }
}
