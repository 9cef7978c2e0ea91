use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use web_time::{SystemTime, UNIX_EPOCH};

use super::{BallNumber, Modes, PlayerId, PlayerState};

/// Snapshot of one game at one instant.
///
/// Equality compares every field except the timestamp, so stamping a
/// snapshot never makes it look changed.
#[derive(Debug, Clone, Serialize)]
pub struct GameData {
    is_game_active: bool,
    session_uuid: String,
    ball: Option<BallNumber>,
    active_player: Option<PlayerId>,
    modes: Modes,
    players: BTreeMap<PlayerId, PlayerState>,
    #[serde(serialize_with = "serialize_unix_seconds")]
    timestamp: SystemTime,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            is_game_active: false,
            session_uuid: String::new(),
            ball: None,
            active_player: None,
            modes: Modes::new(),
            players: BTreeMap::new(),
            timestamp: UNIX_EPOCH,
        }
    }
}

impl GameData {
    /// An empty, inactive snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A freshly started game: active, ball 1, player 1 active with score 0.
    #[must_use]
    pub fn started(session_uuid: impl Into<String>) -> Self {
        let mut data = Self {
            is_game_active: true,
            session_uuid: session_uuid.into(),
            ball: Some(BallNumber::FIRST),
            ..Self::default()
        };
        data.set_active_player(PlayerId::FIRST);
        data
    }

    /// Whether the game is in progress.
    #[must_use]
    pub const fn is_game_active(&self) -> bool {
        self.is_game_active
    }

    /// Marks the game as active or finished.
    pub fn set_game_active(&mut self, active: bool) {
        self.is_game_active = active;
    }

    /// Identifier of the play-through, empty before the game starts.
    #[must_use]
    pub fn session_uuid(&self) -> &str {
        &self.session_uuid
    }

    /// Current ball, `None` before the game starts.
    #[must_use]
    pub const fn ball(&self) -> Option<BallNumber> {
        self.ball
    }

    /// Sets the current ball. Returns true if it changed.
    pub fn set_ball(&mut self, ball: BallNumber) -> bool {
        let changed = self.ball != Some(ball);
        self.ball = Some(ball);
        changed
    }

    /// Active player, `None` before the game starts.
    #[must_use]
    pub const fn active_player(&self) -> Option<PlayerId> {
        self.active_player
    }

    /// Makes `player` active, creating it with score 0 if unknown.
    /// Returns true if anything changed.
    pub fn set_active_player(&mut self, player: PlayerId) -> bool {
        let created = self.ensure_player(player);
        let changed = self.active_player != Some(player);
        self.active_player = Some(player);
        created || changed
    }

    /// Sets a player's score, creating the player if unknown. Does not touch
    /// the active player. Returns true if anything changed.
    pub fn set_score(&mut self, player: PlayerId, score: i64, feature: i32) -> bool {
        let created = self.ensure_player(player);
        let updated = self
            .players
            .get_mut(&player)
            .is_some_and(|state| state.set_score(score, feature));
        created || updated
    }

    fn ensure_player(&mut self, player: PlayerId) -> bool {
        if self.players.contains_key(&player) {
            return false;
        }
        self.players.insert(player, PlayerState::new(player, 0));
        true
    }

    /// State of `player`, if it has been referenced.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players.get(&player)
    }

    /// Score of `player`, if it has been referenced.
    #[must_use]
    pub fn score(&self, player: PlayerId) -> Option<i64> {
        self.players.get(&player).map(PlayerState::score)
    }

    /// All known players ordered by number.
    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    /// Active modes.
    #[must_use]
    pub const fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Mutable access to the active modes.
    pub fn modes_mut(&mut self) -> &mut Modes {
        &mut self.modes
    }

    /// When the snapshot was committed.
    #[must_use]
    pub const fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Stamps the snapshot.
    pub fn set_timestamp(&mut self, timestamp: SystemTime) {
        self.timestamp = timestamp;
    }

    /// Whole seconds between the Unix epoch and the timestamp.
    #[must_use]
    pub fn unix_seconds(&self) -> i64 {
        unix_seconds(self.timestamp)
    }
}

impl PartialEq for GameData {
    fn eq(&self, other: &Self) -> bool {
        self.is_game_active == other.is_game_active
            && self.session_uuid == other.session_uuid
            && self.ball == other.ball
            && self.active_player == other.active_player
            && self.modes == other.modes
            && self.players == other.players
    }
}

impl Eq for GameData {}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

fn serialize_unix_seconds<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(unix_seconds(*time))
}
