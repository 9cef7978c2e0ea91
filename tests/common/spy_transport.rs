//! Scripted transport for integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use scorbit_sync::net::{
    AuthReply, AuthRequest, Endpoint, GameDataUpload, HeartbeatReply, HistoryUpload,
    InstalledReport, PairingStatus, Transport,
};
use scorbit_sync::TransportError;

/// Scripted replies plus everything the engine sent.
#[derive(Debug, Default)]
pub struct SpyState {
    // ==== script ====
    pub paired: bool,
    pub venuemachine_id: Option<i64>,
    pub opdb_id: String,
    pub token: String,
    pub fail_auth: bool,
    pub fail_pairing: bool,
    pub fail_game_data: bool,
    pub fail_history: bool,
    pub fail_requests: bool,
    pub heartbeat_players: Option<serde_json::Value>,
    pub short_code: String,
    pub top_scores: String,

    // ==== recorded ====
    pub calls: Vec<&'static str>,
    pub endpoints: Vec<Endpoint>,
    pub auth_requests: Vec<AuthRequest>,
    pub installed: Vec<InstalledReport>,
    pub game_data_attempts: usize,
    pub uploads: Vec<GameDataUpload>,
    pub histories: Vec<HistoryUpload>,
    pub heartbeats: usize,
    pub pairing_checks: usize,
    pub downloads: Vec<String>,
}

impl SpyState {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

/// Cloneable handle; every clone shares the same state.
#[derive(Debug, Clone, Default)]
pub struct SpyTransport {
    state: Arc<Mutex<SpyState>>,
}

impl SpyTransport {
    /// A transport for a device the server already knows as paired to
    /// venue machine 77 (`opdb-xyz`).
    pub fn paired() -> Self {
        let spy = Self::default();
        {
            let mut state = spy.state();
            state.paired = true;
            state.venuemachine_id = Some(77);
            state.opdb_id = "opdb-xyz".to_owned();
            state.token = "token-1".to_owned();
            state.short_code = "ABC123".to_owned();
            state.top_scores = r#"{"scores":[]}"#.to_owned();
        }
        spy
    }

    /// A transport for a device that authenticates but is not paired.
    pub fn unpaired() -> Self {
        let spy = Self::paired();
        spy.state().paired = false;
        spy
    }

    pub fn state(&self) -> MutexGuard<'_, SpyState> {
        self.state.lock()
    }

    fn record(&self, call: &'static str, endpoint: &Endpoint) -> MutexGuard<'_, SpyState> {
        let mut state = self.state.lock();
        state.calls.push(call);
        state.endpoints.push(endpoint.clone());
        state
    }
}

fn refused(what: &str) -> TransportError {
    TransportError::Status {
        code: 500,
        body: format!("{what} refused"),
    }
}

impl Transport for SpyTransport {
    fn authenticate(
        &self,
        endpoint: &Endpoint,
        request: AuthRequest,
    ) -> Result<AuthReply, TransportError> {
        let mut state = self.record("authenticate", endpoint);
        state.auth_requests.push(request);
        if state.fail_auth {
            return Err(TransportError::Status {
                code: 401,
                body: "bad signature".to_owned(),
            });
        }
        Ok(AuthReply {
            token: state.token.clone(),
        })
    }

    fn pairing_status(&self, endpoint: &Endpoint) -> Result<PairingStatus, TransportError> {
        let mut state = self.record("pairing_status", endpoint);
        state.pairing_checks += 1;
        if state.fail_pairing {
            return Err(TransportError::Connection {
                context: "pairing check timed out".to_owned(),
            });
        }
        Ok(PairingStatus {
            paired: state.paired,
            venuemachine_id: state.venuemachine_id,
            opdb_id: state.opdb_id.clone(),
        })
    }

    fn installed(&self, endpoint: &Endpoint, report: InstalledReport) -> Result<(), TransportError> {
        self.record("installed", endpoint).installed.push(report);
        Ok(())
    }

    fn game_data(&self, endpoint: &Endpoint, upload: GameDataUpload) -> Result<(), TransportError> {
        let mut state = self.record("game_data", endpoint);
        state.game_data_attempts += 1;
        if state.fail_game_data {
            return Err(refused("game data"));
        }
        state.uploads.push(upload);
        Ok(())
    }

    fn upload_history(
        &self,
        endpoint: &Endpoint,
        upload: HistoryUpload,
    ) -> Result<(), TransportError> {
        let mut state = self.record("upload_history", endpoint);
        if state.fail_history {
            return Err(refused("history"));
        }
        state.histories.push(upload);
        Ok(())
    }

    fn heartbeat(&self, endpoint: &Endpoint) -> Result<HeartbeatReply, TransportError> {
        let mut state = self.record("heartbeat", endpoint);
        state.heartbeats += 1;
        Ok(HeartbeatReply {
            players: state.heartbeat_players.clone(),
        })
    }

    fn pair_code(&self, endpoint: &Endpoint) -> Result<String, TransportError> {
        let state = self.record("pair_code", endpoint);
        if state.fail_requests {
            return Err(refused("pair code"));
        }
        Ok(state.short_code.clone())
    }

    fn top_scores(&self, endpoint: &Endpoint, _score_filter: i64) -> Result<String, TransportError> {
        let state = self.record("top_scores", endpoint);
        if state.fail_requests {
            return Err(refused("top scores"));
        }
        Ok(state.top_scores.clone())
    }

    fn unpair(&self, endpoint: &Endpoint) -> Result<String, TransportError> {
        let mut state = self.record("unpair", endpoint);
        if state.fail_requests {
            return Err(refused("unpair"));
        }
        state.paired = false;
        Ok("{}".to_owned())
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let mut state = self.state.lock();
        state.calls.push("download");
        state.downloads.push(url.to_owned());
        Ok(url.as_bytes().to_vec())
    }
}
