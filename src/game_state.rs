//! Host-facing game tracker.
//!
//! The host reports what happens on the machine through the setters and
//! calls [`GameState::commit`] once per frame (or whenever convenient).
//! Commits that change nothing are free; everything else is queued on the
//! network engine and never blocks the caller.

use uuid::Uuid;
use web_time::SystemTime;

use crate::logging::Logger;
use crate::model::{BallNumber, GameData, PlayerId};
use crate::net::{AuthStatus, Callback, NetBase};
use crate::profiles::{Picture, PlayerProfile};
use crate::{sdk_debug, sdk_info, sdk_warn};

/// Version reported as the installed `sdk` component.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current game snapshot plus the last one handed to the network.
///
/// # Example
///
/// ```ignore
/// let mut state = GameState::new(Box::new(net), Logger::default());
///
/// state.set_game_started();
/// state.set_score(1, 1000, 0);
/// state.add_mode("MB:Multiball");
/// state.commit();
///
/// state.set_game_finished();
/// ```
pub struct GameState {
    net: Box<dyn NetBase>,
    current: GameData,
    previous: GameData,
    logger: Logger,
}

impl GameState {
    /// Takes ownership of `net`, starts authentication and reports the
    /// installed game code and SDK versions.
    pub fn new(net: Box<dyn NetBase>, logger: Logger) -> Self {
        net.authenticate();
        let game_code_version = net.device_info().game_code_version.clone();
        net.send_installed("game_code", &game_code_version, Some(true));
        net.send_installed("sdk", SDK_VERSION, Some(true));
        sdk_info!(logger, "Game state ready, sdk {}", SDK_VERSION);

        Self {
            net,
            current: GameData::new(),
            previous: GameData::new(),
            logger,
        }
    }

    /// The snapshot being edited.
    #[must_use]
    pub const fn current(&self) -> &GameData {
        &self.current
    }

    /// The network engine this state reports to.
    #[must_use]
    pub fn net(&self) -> &dyn NetBase {
        self.net.as_ref()
    }

    // ==========================================================================
    // Game lifecycle
    // ==========================================================================

    /// Starts a new session (ball 1, player 1 active with score 0) and
    /// sends it right away.
    ///
    /// Anything set before the start is discarded. No-op while a game is
    /// active.
    pub fn set_game_started(&mut self) {
        if self.current.is_game_active() {
            sdk_debug!(self.logger, "Game already started");
            return;
        }
        let session_uuid = Uuid::new_v4().to_string();
        sdk_info!(self.logger, "Game started, session {}", session_uuid);
        self.current = GameData::started(session_uuid);
        self.send_current();
    }

    /// Sends the final snapshot of the running game, then clears the state.
    ///
    /// The final snapshot is sent even if nothing changed since the last
    /// commit. No-op if no game was started.
    pub fn set_game_finished(&mut self) {
        if self.current.session_uuid().is_empty() {
            sdk_debug!(self.logger, "No game to finish");
            return;
        }
        self.current.set_game_active(false);
        self.send_current();
        sdk_info!(
            self.logger,
            "Game finished, session {}",
            self.current.session_uuid()
        );
        self.current = GameData::new();
        self.previous = GameData::new();
    }

    /// Sends the current snapshot if a game is active and it differs from
    /// the last one sent.
    pub fn commit(&mut self) {
        if !self.current.is_game_active() || self.current == self.previous {
            return;
        }
        self.send_current();
    }

    fn send_current(&mut self) {
        self.current.set_timestamp(SystemTime::now());
        self.current.modes_mut().clear_changed();
        self.net.send_game_data(&self.current);
        self.previous.clone_from(&self.current);
    }

    // ==========================================================================
    // Setters
    // ==========================================================================

    /// Sets the ball in play, 1 to 9.
    pub fn set_current_ball(&mut self, ball: u32) {
        match BallNumber::new(ball) {
            Some(ball) => {
                self.current.set_ball(ball);
            },
            None => sdk_warn!(self.logger, "Ignoring invalid ball number {}", ball),
        }
    }

    /// Sets the player whose turn it is, 1 to 9. Unknown players are
    /// created with score 0.
    pub fn set_active_player(&mut self, player: u32) {
        match PlayerId::new(player) {
            Some(player) => {
                self.current.set_active_player(player);
            },
            None => sdk_warn!(self.logger, "Ignoring invalid active player {}", player),
        }
    }

    /// Sets the score of `player`, 1 to 9, without changing the active
    /// player. `feature` identifies what scored; 0 if unknown.
    pub fn set_score(&mut self, player: u32, score: i64, feature: i32) {
        match PlayerId::new(player) {
            Some(id) => {
                if !self.current.set_score(id, score, feature) {
                    sdk_debug!(self.logger, "Score of player {} unchanged", id);
                }
            },
            None => sdk_warn!(
                self.logger,
                "Ignoring score {} of invalid player {}",
                score,
                player
            ),
        }
    }

    /// Adds a mode such as `"MB:Multiball"`. Duplicates are ignored.
    pub fn add_mode(&mut self, mode: impl Into<String>) {
        let mode = mode.into();
        if mode.is_empty() {
            sdk_warn!(self.logger, "Ignoring empty mode");
            return;
        }
        if !self.current.modes_mut().add(mode.as_str()) {
            sdk_debug!(self.logger, "Mode {} already set", mode);
        }
    }

    /// Removes a mode. Unknown modes are ignored.
    pub fn remove_mode(&mut self, mode: &str) {
        if !self.current.modes_mut().remove(mode) {
            sdk_debug!(self.logger, "Mode {} not set", mode);
        }
    }

    /// Removes every mode.
    pub fn clear_modes(&mut self) {
        if !self.current.modes_mut().clear() {
            sdk_debug!(self.logger, "No modes to clear");
        }
    }

    // ==========================================================================
    // Pass-through to the network engine
    // ==========================================================================

    /// Current authentication state.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.net.status()
    }

    /// Hyphenated lower-case device UUID.
    #[must_use]
    pub fn machine_uuid(&self) -> String {
        self.net.machine_uuid()
    }

    /// Pairing deeplink, empty unless paired. Memoized.
    #[must_use]
    pub fn pair_deeplink(&self) -> String {
        self.net.pair_deeplink()
    }

    /// Claim deeplink of `player`, empty unless paired or if `player` is
    /// out of range. Memoized per player.
    #[must_use]
    pub fn claim_deeplink(&self, player: u32) -> String {
        PlayerId::new(player).map_or_else(String::new, |p| self.net.claim_deeplink(p))
    }

    /// Returns true once after the profiles or pictures changed, and makes
    /// the changes visible through [`player_profile`](Self::player_profile).
    pub fn is_players_info_updated(&self) -> bool {
        self.net.profiles().has_update()
    }

    /// Profile of the player at `player`, if the server sent one.
    #[must_use]
    pub fn player_profile(&self, player: u32) -> Option<PlayerProfile> {
        PlayerId::new(player).and_then(|p| self.net.profiles().profile(p))
    }

    /// Cached picture of the player at `player`.
    #[must_use]
    pub fn player_picture(&self, player: u32) -> Option<Picture> {
        PlayerId::new(player).and_then(|p| self.net.profiles().picture(p))
    }

    /// Fetches the leaderboard; `callback` receives the JSON body.
    pub fn request_top_scores(&self, score_filter: i64, callback: Callback) {
        self.net.request_top_scores(score_filter, callback);
    }

    /// Fetches the pairing short code.
    pub fn request_pair_code(&self, callback: Callback) {
        self.net.request_pair_code(callback);
    }

    /// Unlinks the device from its venue machine.
    pub fn request_unpair(&self, callback: Callback) {
        self.net.request_unpair(callback);
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("current", &self.current)
            .field("status", &self.net.status())
            .finish_non_exhaustive()
    }
}
