//! CSV export of a session's committed snapshots.
//!
//! The format is consumed by the server as-is:
//!
//! ```text
//! time,p1,p2,p3,p4,p5,p6,player,ball,game_modes
//! 10,100,,,,,,1,1,
//! 15,200,,,,,,1,1,
//! 20,200,1000,,,,,2,3,"MB:Multiball;MB:Multiball2"
//! ```
//!
//! - `time` is whole seconds since the Unix epoch.
//! - `p1`..`p6` hold the player's score, blank if the player does not exist
//!   yet or the score is negative. Players 7 to 9 are not exported.
//! - `game_modes` is quoted only when non-empty.
//! - Every row, the header included, ends with `\n`.

use std::fmt::Write;

use crate::model::{GameData, PlayerId, MAX_EXPORTED_PLAYERS};

const ROW_CAPACITY_HINT: usize = 64;

/// Renders `history` as CSV, one row per snapshot in order.
#[must_use]
pub fn history_to_csv(history: &[GameData]) -> String {
    let mut csv = String::with_capacity(ROW_CAPACITY_HINT * (history.len() + 1));

    csv.push_str("time");
    for player in 1..=MAX_EXPORTED_PLAYERS {
        let _ = write!(csv, ",p{player}");
    }
    csv.push_str(",player,ball,game_modes\n");

    for data in history {
        let _ = write!(csv, "{},", data.unix_seconds());
        for player in 1..=u32::from(MAX_EXPORTED_PLAYERS) {
            let score = PlayerId::new(player)
                .and_then(|p| data.score(p))
                .filter(|score| *score >= 0);
            if let Some(score) = score {
                let _ = write!(csv, "{score}");
            }
            csv.push(',');
        }

        let active_player = data.active_player().map_or(0, PlayerId::get);
        let ball = data.ball().map_or(0, |b| b.get());
        let _ = write!(csv, "{active_player},{ball},");
        if !data.modes().is_empty() {
            let _ = write!(csv, "\"{}\"", data.modes().joined());
        }
        csv.push('\n');
    }

    csv
}
