use cardroom_core::Points;
use cardroom_core::DEFAULT_HAND_SIZE;
use cardroom_core::DEFAULT_MAX_PLAYERS;
use cardroom_core::DEFAULT_POINTS_TO_WIN;
use cardroom_core::DEFAULT_TURN_SECONDS;
use cardroom_core::MAX_BOTS;
use cardroom_core::MAX_HAND_SIZE;
use cardroom_core::MAX_PLAYERS;
use cardroom_core::MAX_TURN_SECONDS;
use cardroom_core::MIN_HAND_SIZE;
use cardroom_core::MIN_PLAYERS;
use cardroom_core::MIN_TURN_SECONDS;
use cardroom_core::POINTS_TO_WIN_OPTIONS;
use serde::Deserialize;
use serde::Serialize;

/// A rejected [`RoomConfig`] field (§3 "Configuration"). Room creation fails
/// with one of these rather than panicking on an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    MaxPlayers(usize),
    HandSize(usize),
    TurnSeconds(u64),
    MaxBots(usize),
    PointsToWin(Points),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MaxPlayers(n) => write!(
                f,
                "max players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {n}"
            ),
            ConfigError::HandSize(n) => write!(
                f,
                "initial hand size must be between {MIN_HAND_SIZE} and {MAX_HAND_SIZE}, got {n}"
            ),
            ConfigError::TurnSeconds(n) => write!(
                f,
                "turn time limit must be between {MIN_TURN_SECONDS} and {MAX_TURN_SECONDS} seconds, got {n}"
            ),
            ConfigError::MaxBots(n) => {
                write!(f, "max bots must be between 0 and {MAX_BOTS}, got {n}")
            }
            ConfigError::PointsToWin(n) => write!(
                f,
                "points to win must be one of {POINTS_TO_WIN_OPTIONS:?}, got {n}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated room configuration (§3 "Configuration"). Constructed only
/// through [`RoomConfigBuilder::build`], so a live `Room` never holds an
/// out-of-range value. `Deserialize` is hand-rolled to route incoming JSON
/// (e.g. the HTTP room-creation body) through the same validation, rather
/// than deriving it and letting an out-of-range wire value land straight
/// into a live `Room`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomConfig {
    pub max_players: usize,
    pub hand_size: usize,
    pub turn_seconds: u64,
    pub stacking: bool,
    pub allow_bots: bool,
    pub max_bots: usize,
    pub points_to_win: Points,
    pub tournament: bool,
}

impl RoomConfig {
    pub fn builder() -> RoomConfigBuilder {
        RoomConfigBuilder::default()
    }
}

impl<'de> Deserialize<'de> for RoomConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = WireRoomConfig::deserialize(deserializer)?;
        let defaults = RoomConfigBuilder::default();
        RoomConfigBuilder {
            max_players: wire.max_players.unwrap_or(defaults.max_players),
            hand_size: wire.hand_size.unwrap_or(defaults.hand_size),
            turn_seconds: wire.turn_seconds.unwrap_or(defaults.turn_seconds),
            stacking: wire.stacking.unwrap_or(defaults.stacking),
            allow_bots: wire.allow_bots.unwrap_or(defaults.allow_bots),
            max_bots: wire.max_bots.unwrap_or(defaults.max_bots),
            points_to_win: wire.points_to_win.unwrap_or(defaults.points_to_win),
            tournament: wire.tournament.unwrap_or(defaults.tournament),
        }
        .build()
        .map_err(serde::de::Error::custom)
    }
}

/// Shadow of [`RoomConfig`] with every field optional, so a caller may omit
/// any subset and fall back to the builder's defaults; only present fields
/// are checked against §3's ranges.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
struct WireRoomConfig {
    max_players: Option<usize>,
    hand_size: Option<usize>,
    turn_seconds: Option<u64>,
    stacking: Option<bool>,
    allow_bots: Option<bool>,
    max_bots: Option<usize>,
    points_to_win: Option<Points>,
    tournament: Option<bool>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfigBuilder::default()
            .build()
            .expect("builder defaults are always within range")
    }
}

/// Builder for [`RoomConfig`]. Fields default to the values in §3; `build`
/// validates the aggregate and is the only way to produce a `RoomConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomConfigBuilder {
    max_players: usize,
    hand_size: usize,
    turn_seconds: u64,
    stacking: bool,
    allow_bots: bool,
    max_bots: usize,
    points_to_win: Points,
    tournament: bool,
}

impl Default for RoomConfigBuilder {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            hand_size: DEFAULT_HAND_SIZE,
            turn_seconds: DEFAULT_TURN_SECONDS,
            stacking: true,
            allow_bots: true,
            max_bots: MAX_BOTS,
            points_to_win: DEFAULT_POINTS_TO_WIN,
            tournament: false,
        }
    }
}

impl RoomConfigBuilder {
    pub fn max_players(mut self, n: usize) -> Self {
        self.max_players = n;
        self
    }

    pub fn hand_size(mut self, n: usize) -> Self {
        self.hand_size = n;
        self
    }

    pub fn turn_seconds(mut self, n: u64) -> Self {
        self.turn_seconds = n;
        self
    }

    pub fn stacking(mut self, enabled: bool) -> Self {
        self.stacking = enabled;
        self
    }

    pub fn allow_bots(mut self, enabled: bool) -> Self {
        self.allow_bots = enabled;
        self
    }

    pub fn max_bots(mut self, n: usize) -> Self {
        self.max_bots = n;
        self
    }

    pub fn points_to_win(mut self, points: Points) -> Self {
        self.points_to_win = points;
        self
    }

    pub fn tournament(mut self, enabled: bool) -> Self {
        self.tournament = enabled;
        self
    }

    pub fn build(self) -> Result<RoomConfig, ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(ConfigError::MaxPlayers(self.max_players));
        }
        if !(MIN_HAND_SIZE..=MAX_HAND_SIZE).contains(&self.hand_size) {
            return Err(ConfigError::HandSize(self.hand_size));
        }
        if !(MIN_TURN_SECONDS..=MAX_TURN_SECONDS).contains(&self.turn_seconds) {
            return Err(ConfigError::TurnSeconds(self.turn_seconds));
        }
        if self.max_bots > MAX_BOTS {
            return Err(ConfigError::MaxBots(self.max_bots));
        }
        if !POINTS_TO_WIN_OPTIONS.contains(&self.points_to_win) {
            return Err(ConfigError::PointsToWin(self.points_to_win));
        }
        Ok(RoomConfig {
            max_players: self.max_players,
            hand_size: self.hand_size,
            turn_seconds: self.turn_seconds,
            stacking: self.stacking,
            allow_bots: self.allow_bots,
            max_bots: self.max_bots,
            points_to_win: self.points_to_win,
            tournament: self.tournament,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RoomConfig::default();
        assert_eq!(config.max_players, DEFAULT_MAX_PLAYERS);
        assert_eq!(config.points_to_win, DEFAULT_POINTS_TO_WIN);
    }

    #[test]
    fn rejects_out_of_range_max_players() {
        let err = RoomConfig::builder().max_players(1).build().unwrap_err();
        assert_eq!(err, ConfigError::MaxPlayers(1));
    }

    #[test]
    fn rejects_invalid_points_to_win() {
        let err = RoomConfig::builder().points_to_win(150).build().unwrap_err();
        assert_eq!(err, ConfigError::PointsToWin(150));
    }

    #[test]
    fn accepts_custom_valid_values() {
        let config = RoomConfig::builder()
            .max_players(2)
            .hand_size(5)
            .tournament(true)
            .build()
            .unwrap();
        assert_eq!(config.max_players, 2);
        assert!(config.tournament);
    }

    #[test]
    fn deserializing_a_partial_json_object_fills_in_defaults() {
        let config: RoomConfig = serde_json::from_str(r#"{"max_players": 2}"#).unwrap();
        assert_eq!(config.max_players, 2);
        assert_eq!(config.hand_size, DEFAULT_HAND_SIZE);
    }

    #[test]
    fn deserializing_an_out_of_range_value_fails_instead_of_landing_in_a_room() {
        let err = serde_json::from_str::<RoomConfig>(r#"{"max_players": 99}"#).unwrap_err();
        assert!(err.to_string().contains("max players"));
    }
}
