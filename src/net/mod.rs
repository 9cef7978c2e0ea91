//! Server-facing half of the engine.
//!
//! [`GameState`](crate::game_state::GameState) talks to the server only
//! through the [`NetBase`] trait. [`SessionNet`] is the production
//! implementation: it authenticates the device, tracks pairing, keeps the
//! history of every game session and runs all server calls on a
//! [`Scheduler`](crate::scheduler::Scheduler), through a host-supplied
//! [`Transport`].
//!
//! # Lanes
//!
//! | Lane        | Work                                                        |
//! |-------------|-------------------------------------------------------------|
//! | `Default`   | authentication, installed reports, pair code, leaderboard, unpair, picture downloads |
//! | `GameData`  | snapshot uploads and history uploads                        |
//! | `Heartbeat` | heartbeats and pairing re-checks                            |
//!
//! Because authentication runs on the default lane, every default-lane
//! operation submitted after [`NetBase::authenticate`] sees its outcome.

mod auth;
mod builder;
mod config;
mod endpoint;
mod identity;
mod session_net;
mod status;
mod transport;

pub use auth::{
    sign_hex, signature_digest, Digest, Key, Signature, Signer, DIGEST_LENGTH, KEY_LENGTH,
    SIGNATURE_MAX_LENGTH,
};
pub use builder::SessionNetBuilder;
pub use config::{DeviceInfo, NetConfig};
pub use endpoint::{
    extract_host_and_port, resolve_hostname, UrlInfo, PRODUCTION_URL, STAGING_URL,
};
pub use identity::{derive_uuid, parse_uuid, remove_symbols};
pub use session_net::SessionNet;
pub use status::AuthStatus;
pub use transport::{
    AuthReply, AuthRequest, Endpoint, GameDataUpload, HeartbeatReply, HistoryUpload,
    InstalledReport, PairingStatus, Transport,
};

use crate::error::ErrorCode;
use crate::model::{GameData, PlayerId};
use crate::profiles::ProfileCache;

/// Completion callback of an asynchronous request.
///
/// Invoked exactly once, from a scheduler worker, with the outcome and the
/// reply body (or an error description).
///
/// After [`SessionNet::shutdown`] the request cannot be queued, and the
/// callback runs immediately on the caller's thread with
/// [`ErrorCode::Unknown`].
pub type Callback = Box<dyn FnOnce(ErrorCode, String) + Send + 'static>;

/// Everything [`GameState`](crate::game_state::GameState) needs from the
/// network side.
///
/// Every method returns immediately; work is queued and its outcome is
/// reported through logs or the given callback.
pub trait NetBase: Send + Sync {
    /// Current authentication state.
    fn status(&self) -> AuthStatus;

    /// Starts authentication. Only the first call has an effect.
    fn authenticate(&self);

    /// Reports an installed component, e.g. `("sdk", "1.0.0", Some(true))`.
    fn send_installed(&self, kind: &str, version: &str, installed: Option<bool>);

    /// Records `data` in its session's history and queues an upload.
    fn send_game_data(&self, data: &GameData);

    /// Queues a heartbeat unless one is already queued.
    fn send_heartbeat(&self);

    /// Fetches the pairing short code.
    fn request_pair_code(&self, callback: Callback);

    /// Fetches the leaderboard filtered by `score_filter`.
    fn request_top_scores(&self, score_filter: i64, callback: Callback);

    /// Unlinks the device from its venue machine.
    fn request_unpair(&self, callback: Callback);

    /// Hyphenated lower-case device UUID.
    fn machine_uuid(&self) -> String;

    /// Pairing deeplink, empty unless paired.
    fn pair_deeplink(&self) -> String;

    /// Claim deeplink for `player`, empty unless paired.
    fn claim_deeplink(&self, player: PlayerId) -> String;

    /// Device description the engine was built with.
    fn device_info(&self) -> &DeviceInfo;

    /// Player profiles and pictures.
    fn profiles(&self) -> &ProfileCache;
}

impl<T: NetBase + ?Sized> NetBase for std::sync::Arc<T> {
    fn status(&self) -> AuthStatus {
        (**self).status()
    }

    fn authenticate(&self) {
        (**self).authenticate();
    }

    fn send_installed(&self, kind: &str, version: &str, installed: Option<bool>) {
        (**self).send_installed(kind, version, installed);
    }

    fn send_game_data(&self, data: &GameData) {
        (**self).send_game_data(data);
    }

    fn send_heartbeat(&self) {
        (**self).send_heartbeat();
    }

    fn request_pair_code(&self, callback: Callback) {
        (**self).request_pair_code(callback);
    }

    fn request_top_scores(&self, score_filter: i64, callback: Callback) {
        (**self).request_top_scores(score_filter, callback);
    }

    fn request_unpair(&self, callback: Callback) {
        (**self).request_unpair(callback);
    }

    fn machine_uuid(&self) -> String {
        (**self).machine_uuid()
    }

    fn pair_deeplink(&self) -> String {
        (**self).pair_deeplink()
    }

    fn claim_deeplink(&self, player: PlayerId) -> String {
        (**self).claim_deeplink(player)
    }

    fn device_info(&self) -> &DeviceInfo {
        (**self).device_info()
    }

    fn profiles(&self) -> &ProfileCache {
        (**self).profiles()
    }
}
