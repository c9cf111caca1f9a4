//! Core type aliases, traits, and constants shared across the cardroom workspace.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Seat index around a turn ring.
pub type Position = usize;
/// Point value accumulated toward a round score.
pub type Points = u32;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

/// Identity namespace for a seated player, shared by the `room` crate (which
/// owns the durable `Player` record) and the `engine` crate (which only
/// needs an opaque, copyable handle to place in a [`TurnRing`] and seat
/// map). Neither crate depends on the other's concrete type.
///
/// [`TurnRing`]: <https://docs.rs/cardroom-engine>
pub struct PlayerTag;
pub type PlayerId = ID<PlayerTag>;

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// ROOM & GAME PARAMETERS
// ============================================================================
/// Minimum number of seats (humans + bots) a room can start with.
pub const MIN_PLAYERS: usize = 2;
/// Maximum number of seats (humans + bots) a room may ever hold.
pub const MAX_PLAYERS: usize = 4;
/// Default number of seats when a room is configured with no explicit max.
pub const DEFAULT_MAX_PLAYERS: usize = 4;

/// Minimum initial hand size.
pub const MIN_HAND_SIZE: usize = 1;
/// Maximum initial hand size.
pub const MAX_HAND_SIZE: usize = 10;
/// Default initial hand size.
pub const DEFAULT_HAND_SIZE: usize = 7;

/// Minimum turn time limit, in seconds.
pub const MIN_TURN_SECONDS: u64 = 15;
/// Maximum turn time limit, in seconds.
pub const MAX_TURN_SECONDS: u64 = 120;
/// Default turn time limit, in seconds.
pub const DEFAULT_TURN_SECONDS: u64 = 20;

/// Maximum bot seats a room may hold.
pub const MAX_BOTS: usize = 3;

/// Valid "points to win" match targets.
pub const POINTS_TO_WIN_OPTIONS: [Points; 3] = [100, 200, 500];
/// Default "points to win" target.
pub const DEFAULT_POINTS_TO_WIN: Points = 500;

/// Default grace period before a disconnected human is replaced by a bot.
pub const DEFAULT_DISCONNECT_GRACE_SECS: u64 = 30;
/// Default lower bound of the bot's artificial thinking delay.
pub const DEFAULT_BOT_DELAY_MIN_MS: u64 = 800;
/// Default upper bound of the bot's artificial thinking delay.
pub const DEFAULT_BOT_DELAY_MAX_MS: u64 = 1500;
/// Probability a bot calls ONE after a play that leaves it at one card.
pub const BOT_CALL_ONE_PROBABILITY: f64 = 0.9;

/// Total cards in a standard deck (§3 "Deck"); the multiset invariant
/// checked after every command in property tests (§8) and enforced as a
/// fatal-error guard by the scheduler (§7 "Fatal errors").
pub const STANDARD_DECK_SIZE: usize = 108;

/// Alphabet used for room code generation: uppercase letters and digits.
pub const ROOM_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Length of a generated room code.
pub const ROOM_CODE_LEN: usize = 6;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

/// Global interrupt flag for graceful shutdown coordination. Each room's
/// scheduler polls [`interrupted`] on its own schedule and tears itself down
/// rather than being killed mid-round by the process exiting.
#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if graceful shutdown was requested via stdin "Q".
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
}
/// No-op interrupt check when the server feature is disabled.
#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}

/// Register graceful interrupt handler. Type "Q" + Enter to stop; live rooms
/// finish their current command, broadcast `GameEnded{reason:"shutdown"}`,
/// and tear down on their own schedule rather than being killed outright.
#[cfg(feature = "server")]
pub fn brb() {
    std::thread::spawn(|| loop {
        let mut buffer = String::new();
        if std::io::stdin().read_line(&mut buffer).is_ok() {
            if buffer.trim().eq_ignore_ascii_case("q") {
                log::warn!("graceful interrupt requested, rooms are winding down...");
                INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing;

    #[test]
    fn id_round_trips_through_uuid() {
        let id: ID<Thing> = ID::default();
        let uuid: uuid::Uuid = id.into();
        let back: ID<Thing> = ID::from(uuid);
        assert_eq!(id, back);
    }

    #[test]
    fn id_cast_preserves_uuid() {
        struct Other;
        let id: ID<Thing> = ID::default();
        let uuid = id.inner();
        let cast: ID<Other> = id.cast();
        assert_eq!(cast.inner(), uuid);
    }

    #[test]
    fn points_to_win_options_are_sorted() {
        assert!(POINTS_TO_WIN_OPTIONS.windows(2).all(|w| w[0] < w[1]));
    }
}
