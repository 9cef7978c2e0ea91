use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::ChangeTracker;

/// Ordered set of active game modes.
///
/// Insertion order is preserved and names are unique (exact string match).
/// The change flag is raised only by a mutation that actually changed the
/// content, and is ignored by equality.
///
/// Serializes as a JSON array of names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modes {
    names: SmallVec<[String; 4]>,
    #[serde(skip)]
    tracker: ChangeTracker,
}

impl Modes {
    /// Creates an empty mode set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `mode` unless it is already present. Returns true if added.
    pub fn add(&mut self, mode: impl Into<String>) -> bool {
        let mode = mode.into();
        if self.contains(&mode) {
            return false;
        }
        self.names.push(mode);
        self.tracker.mark();
        true
    }

    /// Removes `mode` if present. Returns true if removed.
    pub fn remove(&mut self, mode: &str) -> bool {
        let Some(index) = self.names.iter().position(|m| m == mode) else {
            return false;
        };
        self.names.remove(index);
        self.tracker.mark();
        true
    }

    /// Removes every mode. Returns true if there was anything to remove.
    pub fn clear(&mut self) -> bool {
        if self.names.is_empty() {
            return false;
        }
        self.names.clear();
        self.tracker.mark();
        true
    }

    /// Returns true if `mode` is active.
    #[must_use]
    pub fn contains(&self, mode: &str) -> bool {
        self.names.iter().any(|m| m == mode)
    }

    /// Returns true if no mode is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of active modes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterates over the modes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Semicolon-joined names, e.g. `"MB:Multiball;NA:Ball"`. Empty if none.
    #[must_use]
    pub fn joined(&self) -> String {
        self.names.join(";")
    }

    /// Returns true if a mutation changed the content since the last
    /// [`clear_changed`](Self::clear_changed).
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.tracker.is_changed()
    }

    /// Resets the change flag.
    pub fn clear_changed(&mut self) {
        self.tracker.clear();
    }
}

impl PartialEq for Modes {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for Modes {}

impl fmt::Display for Modes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
