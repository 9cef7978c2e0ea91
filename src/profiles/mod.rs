//! Player-identity directory pushed by the server.
//!
//! Profiles arrive as JSON in heartbeat replies, on a worker thread. The
//! host reads them from its own thread after polling
//! [`ProfileCache::has_update`], which publishes a consistent copy.
//!
//! Profile data and pictures are guarded by separate locks; a picture
//! download never waits on a profile update and vice versa.

mod lru;

pub use lru::LruCache;

use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::logging::Logger;
use crate::model::PlayerId;
use crate::{sdk_debug, sdk_error, sdk_warn};

/// Number of profile pictures kept in memory.
pub const PICTURE_CACHE_CAPACITY: usize = 8;

/// Encoded image bytes, shared without copying.
pub type Picture = Arc<[u8]>;

/// Public identity of the player occupying a position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerProfile {
    /// Server-side player id.
    pub id: u64,
    /// Show initials instead of the name.
    pub prefer_initials: bool,
    /// Display name.
    pub name: String,
    /// Initials, typically three letters.
    pub initials: String,
    /// Picture location, empty if the player has none.
    pub picture_url: String,
}

#[derive(Deserialize)]
struct ProfileEntry {
    position: u32,
    player: Option<ProfileFields>,
}

#[derive(Deserialize)]
struct ProfileFields {
    id: u64,
    cached_display_name: String,
    initials: String,
    #[serde(default)]
    prefer_initials: bool,
    #[serde(default)]
    profile_picture: Option<String>,
}

impl From<ProfileFields> for PlayerProfile {
    fn from(fields: ProfileFields) -> Self {
        Self {
            id: fields.id,
            prefer_initials: fields.prefer_initials,
            name: fields.cached_display_name,
            initials: fields.initials,
            picture_url: fields.profile_picture.unwrap_or_default(),
        }
    }
}

/// Profiles by position plus a bounded picture cache.
pub struct ProfileCache {
    profiles: Mutex<BTreeMap<PlayerId, PlayerProfile>>,
    published: RwLock<BTreeMap<PlayerId, PlayerProfile>>,
    pictures: Mutex<LruCache<PlayerId, Picture>>,
    updated: AtomicBool,
    logger: Logger,
}

impl ProfileCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self {
            profiles: Mutex::new(BTreeMap::new()),
            published: RwLock::new(BTreeMap::new()),
            pictures: Mutex::new(LruCache::new(PICTURE_CACHE_CAPACITY)),
            updated: AtomicBool::new(false),
            logger,
        }
    }

    /// Replaces the profiles with those in `value`.
    ///
    /// `value` must be an array of
    /// `{position, player: {id, cached_display_name, initials,
    /// prefer_initials, profile_picture}}`. Entries whose `player` is null
    /// are skipped, as are malformed entries (with a log line). The update
    /// flag is raised only if the result differs from the current profiles.
    /// Returns true in that case.
    pub fn set_profiles(&self, value: &serde_json::Value) -> bool {
        let Some(entries) = value.as_array() else {
            sdk_warn!(self.logger, "Invalid player profiles data: {}", value);
            return false;
        };

        let mut profiles = BTreeMap::new();
        for entry in entries {
            let parsed = match ProfileEntry::deserialize(entry) {
                Ok(parsed) => parsed,
                Err(err) => {
                    sdk_error!(
                        self.logger,
                        "Failed to parse player profile: {}, item: {}",
                        err,
                        entry
                    );
                    continue;
                },
            };
            let Some(fields) = parsed.player else {
                continue;
            };
            let Some(position) = PlayerId::new(parsed.position) else {
                sdk_warn!(
                    self.logger,
                    "Skipping profile at invalid position {}",
                    parsed.position
                );
                continue;
            };
            profiles.insert(position, PlayerProfile::from(fields));
        }

        let mut current = self.profiles.lock();
        if *current == profiles {
            return false;
        }
        sdk_debug!(self.logger, "Player profiles updated: {} player(s)", profiles.len());
        *current = profiles;
        self.updated.store(true, Ordering::SeqCst);
        true
    }

    /// Returns whether anything changed since the previous call and clears
    /// the flag. When it returns true, the latest profiles become visible
    /// through [`profile`](Self::profile).
    pub fn has_update(&self) -> bool {
        let current = self.profiles.lock();
        let updated = self.updated.swap(false, Ordering::SeqCst);
        if updated {
            self.published.write().clone_from(&current);
        }
        updated
    }

    /// Profile at `player`, as of the last [`has_update`](Self::has_update)
    /// that returned true.
    #[must_use]
    pub fn profile(&self, player: PlayerId) -> Option<PlayerProfile> {
        self.published.read().get(&player).cloned()
    }

    /// Stores the picture of `player` and raises the update flag.
    pub fn set_picture(&self, player: PlayerId, picture: impl Into<Picture>) {
        self.pictures.lock().put(player, picture.into());
        self.updated.store(true, Ordering::SeqCst);
    }

    /// Drops the picture of `player` and raises the update flag.
    pub fn remove_picture(&self, player: PlayerId) {
        self.pictures.lock().remove(&player);
        self.updated.store(true, Ordering::SeqCst);
    }

    /// Whether a picture of `player` is cached.
    #[must_use]
    pub fn has_picture(&self, player: PlayerId) -> bool {
        self.pictures.lock().contains(&player)
    }

    /// Cached picture of `player`. Counts as a use for eviction purposes.
    #[must_use]
    pub fn picture(&self, player: PlayerId) -> Option<Picture> {
        self.pictures.lock().get(&player).cloned()
    }

    /// `(player, url)` for every profile with a picture URL whose picture
    /// is not cached yet.
    #[must_use]
    pub fn pictures_to_download(&self) -> Vec<(PlayerId, String)> {
        let profiles = self.profiles.lock();
        let pictures = self.pictures.lock();
        profiles
            .iter()
            .filter(|(player, profile)| {
                !profile.picture_url.is_empty() && !pictures.contains(player)
            })
            .map(|(player, profile)| (*player, profile.picture_url.clone()))
            .collect()
    }
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache")
            .field("profiles", &self.profiles.lock().len())
            .field("pictures", &self.pictures.lock().len())
            .field("updated", &self.updated.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
