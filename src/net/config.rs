//! Configuration types for [`SessionNet`](super::SessionNet).
//!
//! # Overview
//!
//! | Config Type  | Purpose                               | Key Presets                    |
//! |--------------|---------------------------------------|--------------------------------|
//! | `DeviceInfo` | Who the device is and where it talks  | none                           |
//! | `NetConfig`  | Heartbeat, worker pool, signing key   | `low_traffic()`, `responsive()` |
//!
//! # Example
//!
//! ```
//! use scorbit_sync::net::{DeviceInfo, NetConfig};
//!
//! let info = DeviceInfo {
//!     provider: "scorbitron".to_owned(),
//!     machine_id: 4419,
//!     game_code_version: "1.12.3".to_owned(),
//!     host_identifier: "52:00:66:74:98:50".to_owned(),
//!     ..DeviceInfo::default()
//! };
//! let config = NetConfig::responsive();
//! assert!(config.validate().is_ok());
//! # let _ = info;
//! ```

use web_time::Duration;

use crate::error::ConfigError;
use crate::net::auth::{Key, KEY_LENGTH};

/// Identity of the device and the server it reports to.
///
/// # Forward Compatibility
///
/// New fields may be added in future versions. Construct instances with
/// `..DeviceInfo::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Mandatory. Provider name, e.g. `"scorbitron"` or `"vpin"`.
    pub provider: String,

    /// Machine id assigned by Scorbit, e.g. 4419. Mandatory for manufacturers.
    pub machine_id: i32,

    /// Mandatory. Version of the game code, e.g. `"1.12.3"`.
    pub game_code_version: String,

    /// Server to talk to: `"production"` (also used when empty),
    /// `"staging"`, or a URL such as `"http://localhost:8080"`.
    pub hostname: String,

    /// Device UUID in any common spelling. When empty, a UUID is derived
    /// from [`host_identifier`](Self::host_identifier).
    pub uuid: String,

    /// A host-unique string, typically a MAC address, used to derive the
    /// device UUID when none is given.
    pub host_identifier: String,

    /// Device serial number, 0 if unavailable.
    pub serial_number: u64,

    /// Fetch players' profile pictures automatically when profiles change.
    pub auto_download_player_pics: bool,

    /// Names of the events that can cause a score change (ramp, spinner ...).
    /// The index + 1 of a name is the score feature reported with a score.
    pub score_features: Vec<String>,

    /// Version of [`score_features`](Self::score_features); bump when adding
    /// features. Ignored when there are none.
    pub score_features_version: i32,
}

/// Runtime settings of the network engine.
///
/// # Forward Compatibility
///
/// New fields may be added in future versions. Construct instances with
/// `..NetConfig::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "NetConfig has no effect unless passed to SessionNetBuilder::with_config()"]
pub struct NetConfig {
    /// Time between two heartbeats. Must not be zero.
    ///
    /// Default: 10s
    pub heartbeat_interval: Duration,

    /// Number of scheduler worker threads. Must not be zero.
    ///
    /// Default: 4
    pub worker_threads: usize,

    /// Key handed to the signer with every authentication digest.
    ///
    /// Default: all zeros
    pub signing_key: Key,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(10),
            worker_threads: crate::scheduler::DEFAULT_WORKER_THREADS,
            signing_key: [0; KEY_LENGTH],
        }
    }
}

impl NetConfig {
    /// Creates a new `NetConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for metered or slow links: fewer heartbeats and threads.
    #[must_use]
    pub fn low_traffic() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            worker_threads: 2,
            ..Self::default()
        }
    }

    /// Preset for kiosks that want pairing and profile changes to show up
    /// quickly.
    #[must_use]
    pub fn responsive() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(2),
            ..Self::default()
        }
    }

    /// Checks every setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                field: "heartbeat_interval",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.worker_threads == 0 {
            return Err(ConfigError::OutOfRange {
                field: "worker_threads",
                reason: "at least one worker thread is required".to_owned(),
            });
        }
        Ok(())
    }
}
