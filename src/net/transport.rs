//! Blocking request/response boundary to the server.
//!
//! [`SessionNet`](super::SessionNet) never builds HTTP requests itself. Each
//! server interaction is a typed method on [`Transport`], called from a
//! scheduler worker; the implementation owns the wire format. Request bodies
//! are owned values, so an implementation may keep them past the call.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::model::GameData;

/// Where and as whom a request is made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// `scheme://host:port` of the API server.
    pub base_url: String,
    /// Session token returned by [`Transport::authenticate`]; empty before.
    pub token: String,
}

/// Identity handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    /// Device UUID, 32 hex digits without dashes.
    pub uuid: String,
    /// Decimal Unix time included in the signed digest.
    pub timestamp: String,
    /// Hex-encoded signature over the digest.
    pub signature: String,
    /// Provider name, e.g. `"scorbitron"`.
    pub provider: String,
    /// Machine id assigned by Scorbit.
    pub machine_id: i32,
    /// Device serial number, 0 if unknown.
    pub serial_number: u64,
    /// Version of the game code running on the device.
    pub game_code_version: String,
    /// Labels of the score features; feature `n` is `score_features[n - 1]`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub score_features: Vec<String>,
    /// Version of [`score_features`](Self::score_features), absent when
    /// there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_features_version: Option<i32>,
}

/// Reply to [`AuthRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthReply {
    /// Token attached to every later request.
    pub token: String,
}

/// Pairing state reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PairingStatus {
    /// Whether the device is linked to a venue machine.
    pub paired: bool,
    /// Venue machine record, set once paired.
    #[serde(default)]
    pub venuemachine_id: Option<i64>,
    /// Open Pinball Database id of the machine, set once paired.
    #[serde(default)]
    pub opdb_id: String,
}

/// Report of an installed component (game code, SDK, update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledReport {
    /// Component kind, e.g. `"game_code"` or `"sdk"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Component version.
    pub version: String,
    /// Whether installation succeeded, if known.
    pub installed: Option<bool>,
    /// Optional installation log.
    pub log: Option<String>,
}

/// One game-data snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameDataUpload {
    /// Session the snapshot belongs to.
    pub session_uuid: String,
    /// Number of snapshots of this session the server already accepted.
    pub session_counter: u32,
    /// The snapshot.
    pub data: GameData,
}

/// Complete history of a finished session, as CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryUpload {
    /// Session the history belongs to.
    pub session_uuid: String,
    /// Suggested file name of the attachment.
    pub file_name: String,
    /// CSV bytes.
    pub csv: Vec<u8>,
}

/// Reply to a heartbeat.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HeartbeatReply {
    /// Player profile list pushed by the server, if any.
    #[serde(default)]
    pub players: Option<serde_json::Value>,
}

/// Blocking server operations.
///
/// Calls may block for as long as the network takes; they occupy only the
/// lane they run on.
pub trait Transport: Send + Sync {
    /// Performs the identity handshake.
    fn authenticate(
        &self,
        endpoint: &Endpoint,
        request: AuthRequest,
    ) -> Result<AuthReply, TransportError>;

    /// Asks whether the device is paired.
    fn pairing_status(&self, endpoint: &Endpoint) -> Result<PairingStatus, TransportError>;

    /// Reports an installed component.
    fn installed(&self, endpoint: &Endpoint, report: InstalledReport)
        -> Result<(), TransportError>;

    /// Uploads a game-data snapshot.
    fn game_data(&self, endpoint: &Endpoint, upload: GameDataUpload)
        -> Result<(), TransportError>;

    /// Uploads the history of a finished session.
    fn upload_history(
        &self,
        endpoint: &Endpoint,
        upload: HistoryUpload,
    ) -> Result<(), TransportError>;

    /// Sends a heartbeat.
    fn heartbeat(&self, endpoint: &Endpoint) -> Result<HeartbeatReply, TransportError>;

    /// Fetches the 6-character pairing short code.
    fn pair_code(&self, endpoint: &Endpoint) -> Result<String, TransportError>;

    /// Fetches the leaderboard as a JSON document.
    fn top_scores(&self, endpoint: &Endpoint, score_filter: i64)
        -> Result<String, TransportError>;

    /// Unlinks the device from its venue machine. Returns the reply body.
    fn unpair(&self, endpoint: &Endpoint) -> Result<String, TransportError>;

    /// Downloads an arbitrary resource, e.g. a profile picture.
    fn download(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}
