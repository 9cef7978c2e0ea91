use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Score of a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    player: PlayerId,
    score: i64,
    score_feature: i32,
}

impl PlayerState {
    /// Creates a player with the given score and no score feature.
    #[must_use]
    pub const fn new(player: PlayerId, score: i64) -> Self {
        Self {
            player,
            score,
            score_feature: 0,
        }
    }

    /// The player number.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// The current score.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Tag of the event that caused the last score change, `0` if none.
    #[must_use]
    pub const fn score_feature(&self) -> i32 {
        self.score_feature
    }

    /// Sets score and feature together. Returns true if either changed.
    pub fn set_score(&mut self, score: i64, feature: i32) -> bool {
        if self.score == score && self.score_feature == feature {
            return false;
        }
        self.score = score;
        self.score_feature = feature;
        true
    }
}
