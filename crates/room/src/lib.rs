//! Lobby membership, bot seats, and the process-wide room registry (§3 "Room",
//! §4.5).
//!
//! ## Configuration
//!
//! - [`config::RoomConfig`] — validated per-room settings, built via
//!   [`config::RoomConfigBuilder`]
//!
//! ## Membership
//!
//! - [`player::Player`] — a seated human or bot
//! - [`room::Room`] — lobby, roster, and the active [`cardroom_engine::GameSession`]
//!
//! ## Process-wide state
//!
//! - [`registry::RoomRegistry`] — rooms indexed by code, with member
//!   back-references
mod config;
mod player;
mod registry;
mod room;

pub use config::ConfigError;
pub use config::RoomConfig;
pub use config::RoomConfigBuilder;
pub use player::BotPlayer;
pub use player::ConnectionStatus;
pub use player::HumanPlayer;
pub use player::Player;
pub use registry::RoomRegistry;
pub use room::LeaveOutcome;
pub use room::Room;
pub use room::RoomStatus;
