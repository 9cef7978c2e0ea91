//! Value types describing the state of one game.
//!
//! Nothing in this module performs I/O or takes locks. The types are owned
//! by [`GameState`](crate::game_state::GameState), cloned into the session
//! history by [`SessionNet`](crate::net::SessionNet), and rendered into CSV
//! by [`history`](crate::history).
//!
//! # Validity
//!
//! Player and ball numbers are restricted to `1..=9`. The checked
//! constructors [`PlayerId::new`] and [`BallNumber::new`] are the only way
//! to obtain one, so a snapshot can never hold an out-of-range value.

mod game_data;
mod modes;
mod player_state;

pub use game_data::GameData;
pub use modes::Modes;
pub use player_state::PlayerState;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of player columns in the exported history.
pub const MAX_EXPORTED_PLAYERS: u8 = 6;

/// A player number in `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Smallest valid player number.
    pub const MIN: u32 = 1;
    /// Largest valid player number.
    pub const MAX: u32 = 9;
    /// Player 1, who is active when a game starts.
    pub const FIRST: Self = Self(1);

    /// Returns `None` if `player` is outside `1..=9`.
    #[must_use]
    pub fn new(player: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&player) {
            u8::try_from(player).ok().map(Self)
        } else {
            None
        }
    }

    /// Returns the player number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ball number in `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallNumber(u8);

impl BallNumber {
    /// Smallest valid ball number.
    pub const MIN: u32 = 1;
    /// Largest valid ball number.
    pub const MAX: u32 = 9;
    /// Ball 1, current when a game starts.
    pub const FIRST: Self = Self(1);

    /// Returns `None` if `ball` is outside `1..=9`.
    #[must_use]
    pub fn new(ball: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&ball) {
            u8::try_from(ball).ok().map(Self)
        } else {
            None
        }
    }

    /// Returns the ball number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for BallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dirty bit.
///
/// Mutators call [`mark`](Self::mark) when they actually change something;
/// the owner reads and resets it with [`clear`](Self::clear). Never part of
/// value equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeTracker {
    changed: bool,
}

impl ChangeTracker {
    /// Creates a clean tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self { changed: false }
    }

    /// Records a change.
    pub fn mark(&mut self) {
        self.changed = true;
    }

    /// Resets the tracker.
    pub fn clear(&mut self) {
        self.changed = false;
    }

    /// Returns true if a change was recorded since the last [`clear`](Self::clear).
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.changed
    }
}
