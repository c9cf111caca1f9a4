//! Wire protocol, event bus, and per-room scheduler for live games.
//!
//! ## Events and wire frames
//!
//! - [`event::Event`] — internal, room-scoped notifications a scheduler emits
//! - [`message::ServerMessage`] — their JSON wire form, with room and timestamp
//! - [`protocol::Protocol`] — encode/decode between the two, and inbound
//!   [`protocol::ClientFrame`] parsing
//!
//! ## Delivery
//!
//! - [`table::Table`] — per-room fan-out, keyed by player id
//! - [`actor::Actor`] — forwards one player's events to their live connection
//!
//! ## Timing and orchestration
//!
//! - [`timer::Timer`] — a single armed deadline (turn clock or grace period)
//! - [`scheduler::Scheduler`] — the actor task that owns a room and serializes
//!   every command, room-management request, and timer expiry onto it
mod actor;
mod event;
mod message;
mod protocol;
mod scheduler;
mod table;
mod timer;

pub use actor::Actor;
pub use actor::OutboundSink;
pub use event::Event;
pub use message::ServerMessage;
pub use protocol::ClientFrame;
pub use protocol::Protocol;
pub use protocol::ProtocolError;
pub use scheduler::Request;
pub use scheduler::Scheduler;
pub use table::Table;
pub use timer::Timer;
pub use timer::TimerConfig;
