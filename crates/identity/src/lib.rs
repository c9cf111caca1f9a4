//! External-collaborator contracts and their process-local stubs (§6
//! "External interfaces"): `Identity` (token validation, profile lookup),
//! `StatisticsSink` and `Leaderboard` (fire-and-forget game-end reporting).
//! None of these are implemented against a real provider here — the stubs
//! let the binary run standalone, the same way this codebase's other
//! process-local fakes stand in for a database in tests.
#![allow(dead_code)]

use async_trait::async_trait;
use cardroom_core::PlayerId;
use uuid::Uuid;

// ============================================================================
// ERRORS
// ============================================================================

/// Rejected by [`Identity::validate_token`]. Kept distinct from
/// `cardroom_engine::EngineError` since this crate has no dependency on the
/// engine; the server crate maps this to `EngineError::InvalidToken` at the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    InvalidToken,
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::InvalidToken => write!(f, "invalid or expired token"),
        }
    }
}

impl std::error::Error for IdentityError {}

// ============================================================================
// IDENTITY
// ============================================================================

/// What a validated bearer token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

/// Presentation details for a known user, used only for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub nickname: String,
    pub avatar: Option<String>,
}

/// `validateToken`/`resolveUser` (§6). Consulted only at the authentication
/// handshake; nothing downstream of a successful join holds a reference to
/// this trait.
#[async_trait]
pub trait Identity: Send + Sync {
    async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, IdentityError>;
    async fn resolve_user(&self, user_id: &str) -> Option<UserProfile>;
}

/// Accepts any non-empty bearer token and synthesizes a stable user id from
/// it via a namespaced UUIDv5, so the same token always resolves to the
/// same identity without a real provider behind it.
pub struct StubIdentity {
    namespace: Uuid,
}

impl StubIdentity {
    pub fn new() -> Self {
        Self {
            namespace: Uuid::NAMESPACE_URL,
        }
    }
}

impl Default for StubIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Identity for StubIdentity {
    async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, IdentityError> {
        if token.is_empty() {
            return Err(IdentityError::InvalidToken);
        }
        let user_id = Uuid::new_v5(&self.namespace, token.as_bytes()).to_string();
        let email = format!("{user_id}@stub.cardroom.local");
        log::debug!("[identity] stub validated token, synthesized user {user_id}");
        Ok(AuthenticatedUser { user_id, email })
    }

    async fn resolve_user(&self, user_id: &str) -> Option<UserProfile> {
        Some(UserProfile {
            nickname: user_id.chars().take(8).collect(),
            avatar: None,
        })
    }
}

// ============================================================================
// STATISTICS AND LEADERBOARD
// ============================================================================

/// One completed round (§6 `recordGameEnd`). Built by the server from the
/// `GameEnded` event and the room's final scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub player_id: PlayerId,
    pub placement: u32,
    pub remaining_cards: u32,
    pub hand_points: cardroom_core::Points,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameEndRecord {
    pub room_code: String,
    pub started_at: u64,
    pub ended_at: u64,
    pub winner_id: Option<PlayerId>,
    pub standings: Vec<Standing>,
}

/// Fire-and-forget aggregate-statistics persistence (§6). The engine never
/// awaits or retries this; a real implementation owns its own retry policy.
#[async_trait]
pub trait StatisticsSink: Send + Sync {
    async fn record_game_end(&self, record: &GameEndRecord);
}

/// Consumes the same record asynchronously, off the engine's critical path.
#[async_trait]
pub trait Leaderboard: Send + Sync {
    async fn record_game_end(&self, record: &GameEndRecord);
}

#[derive(Debug, Default)]
pub struct StubStatisticsSink;

#[async_trait]
impl StatisticsSink for StubStatisticsSink {
    async fn record_game_end(&self, record: &GameEndRecord) {
        log::info!(
            "[statistics] room {} ended, winner={:?}, {} standings",
            record.room_code,
            record.winner_id,
            record.standings.len()
        );
    }
}

#[derive(Debug, Default)]
pub struct StubLeaderboard;

#[async_trait]
impl Leaderboard for StubLeaderboard {
    async fn record_game_end(&self, record: &GameEndRecord) {
        log::info!(
            "[leaderboard] room {} ended, winner={:?}",
            record.room_code,
            record.winner_id
        );
    }
}
