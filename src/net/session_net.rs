use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use web_time::{Instant, SystemTime, UNIX_EPOCH};

use crate::error::{ErrorCode, TransportError};
use crate::history::history_to_csv;
use crate::logging::Logger;
use crate::model::{GameData, PlayerId};
use crate::net::auth::{sign_hex, Signer};
use crate::net::builder::SessionNetBuilder;
use crate::net::config::{DeviceInfo, NetConfig};
use crate::net::identity::remove_symbols;
use crate::net::status::AuthStatus;
use crate::net::transport::{
    AuthRequest, Endpoint, GameDataUpload, HistoryUpload, InstalledReport, PairingStatus,
    Transport,
};
use crate::net::{Callback, NetBase};
use crate::profiles::ProfileCache;
use crate::scheduler::{Lane, Scheduler};
use crate::{sdk_debug, sdk_error, sdk_info, sdk_warn};

const DEEPLINK_BASE: &str = "https://scorbit.link/qrcode";

/// Sessions kept in memory at most; the oldest finished one is dropped first.
const MAX_RETAINED_SESSIONS: usize = 16;

const PAIRED: &[AuthStatus] = &[AuthStatus::AuthenticatedPaired];
const AUTHENTICATED: &[AuthStatus] = &[
    AuthStatus::AuthenticatedUnpaired,
    AuthStatus::AuthenticatedPaired,
];
const PAIR_CODE: &[AuthStatus] = &[
    AuthStatus::AuthenticatedCheckingPairing,
    AuthStatus::AuthenticatedUnpaired,
    AuthStatus::AuthenticatedPaired,
];

/// Upload bookkeeping of one game, keyed by session UUID.
struct GameSession {
    /// Latest snapshot; the one an upload sends.
    game_data: GameData,
    started_at: Instant,
    history: Vec<GameData>,
    /// Snapshots accepted by the server.
    session_counter: u32,
    /// Bumped for every recorded snapshot.
    revision: u64,
    delivered_revision: u64,
    upload_queued: bool,
    history_queued: bool,
}

impl GameSession {
    fn new() -> Self {
        Self {
            game_data: GameData::new(),
            started_at: Instant::now(),
            history: Vec::new(),
            session_counter: 0,
            revision: 0,
            delivered_revision: 0,
            upload_queued: false,
            history_queued: false,
        }
    }

    fn is_delivered(&self) -> bool {
        self.delivered_revision == self.revision
    }

    fn is_finished(&self) -> bool {
        !self.game_data.is_game_active()
    }
}

struct VenueMachine {
    id: i64,
    opdb_id: String,
}

/// Mutable connection state, including the memoized deeplinks.
#[derive(Default)]
struct NetState {
    token: String,
    venue_machine: Option<VenueMachine>,
    short_code: Option<String>,
    pair_deeplink: Option<String>,
    claim_deeplinks: BTreeMap<PlayerId, String>,
}

impl NetState {
    fn forget_pairing(&mut self) {
        self.venue_machine = None;
        self.pair_deeplink = None;
        self.claim_deeplinks.clear();
    }
}

/// Delivers a callback exactly once.
///
/// If the owning task is dropped without answering (scheduler stopped,
/// task panicked), the callback receives [`ErrorCode::Unknown`].
struct Reply {
    callback: Option<Callback>,
}

impl Reply {
    fn new(callback: Callback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    fn send(mut self, code: ErrorCode, payload: String) {
        if let Some(callback) = self.callback.take() {
            callback(code, payload);
        }
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback(
                ErrorCode::Unknown,
                "Request dropped before completion".to_owned(),
            );
        }
    }
}

struct Inner {
    device_info: DeviceInfo,
    config: NetConfig,
    machine_uuid: String,
    base_url: String,
    signer: Arc<dyn Signer>,
    transport: Arc<dyn Transport>,
    profiles: ProfileCache,
    logger: Logger,
    status: AtomicI32,
    state: Mutex<NetState>,
    sessions: Mutex<BTreeMap<String, GameSession>>,
    heartbeat_queued: AtomicBool,
    heartbeat_armed: AtomicBool,
    scheduler: Scheduler,
}

fn status_of(code: i32) -> AuthStatus {
    AuthStatus::from_i32(code).unwrap_or(AuthStatus::NotAuthenticated)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl Inner {
    fn status(&self) -> AuthStatus {
        status_of(self.status.load(Ordering::SeqCst))
    }

    /// Moves to `to` if the current status is one of `from`.
    fn transition(&self, from: &[AuthStatus], to: AuthStatus) -> bool {
        let result = self
            .status
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |code| {
                from.contains(&status_of(code)).then_some(to.as_i32())
            });
        match result {
            Ok(previous) => {
                sdk_info!(self.logger, "Status changed: {} -> {}", status_of(previous), to);
                true
            },
            Err(_) => false,
        }
    }

    fn check_allowed(&self, allowed: &[AuthStatus]) -> Result<(), ErrorCode> {
        match self.status() {
            status if allowed.contains(&status) => Ok(()),
            AuthStatus::AuthenticationFailed => Err(ErrorCode::AuthFailed),
            _ => Err(ErrorCode::NotPaired),
        }
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint {
            base_url: self.base_url.clone(),
            token: self.state.lock().token.clone(),
        }
    }

    // ==========================================================================
    // Authentication and pairing
    // ==========================================================================

    fn fail_authentication(&self, reason: &str) {
        sdk_error!(self.logger, "Authentication failed: {}", reason);
        self.transition(&[AuthStatus::Authenticating], AuthStatus::AuthenticationFailed);
    }

    fn run_authentication(self: &Arc<Self>) {
        let uuid_hex = remove_symbols(&self.machine_uuid, "-");
        let timestamp = unix_now().to_string();
        let Some(signature) = sign_hex(
            self.signer.as_ref(),
            &self.config.signing_key,
            &uuid_hex,
            &timestamp,
        ) else {
            self.fail_authentication("signer returned no signature");
            return;
        };

        let request = AuthRequest {
            uuid: uuid_hex,
            timestamp,
            signature,
            provider: self.device_info.provider.clone(),
            machine_id: self.device_info.machine_id,
            serial_number: self.device_info.serial_number,
            game_code_version: self.device_info.game_code_version.clone(),
            score_features: self.device_info.score_features.clone(),
            score_features_version: (!self.device_info.score_features.is_empty())
                .then_some(self.device_info.score_features_version),
        };
        let endpoint = Endpoint {
            base_url: self.base_url.clone(),
            token: String::new(),
        };

        match self.transport.authenticate(&endpoint, request) {
            Ok(reply) => {
                self.state.lock().token = reply.token;
                self.transition(
                    &[AuthStatus::Authenticating],
                    AuthStatus::AuthenticatedCheckingPairing,
                );
                self.check_pairing();
                self.arm_heartbeat();
            },
            Err(err) => self.fail_authentication(&err.to_string()),
        }
    }

    fn check_pairing(&self) {
        match self.transport.pairing_status(&self.endpoint()) {
            Ok(PairingStatus {
                paired: true,
                venuemachine_id,
                opdb_id,
            }) => {
                {
                    let mut state = self.state.lock();
                    state.forget_pairing();
                    state.venue_machine = venuemachine_id.map(|id| VenueMachine { id, opdb_id });
                }
                self.transition(
                    &[
                        AuthStatus::AuthenticatedCheckingPairing,
                        AuthStatus::AuthenticatedUnpaired,
                    ],
                    AuthStatus::AuthenticatedPaired,
                );
            },
            Ok(_) => {
                self.transition(
                    &[AuthStatus::AuthenticatedCheckingPairing],
                    AuthStatus::AuthenticatedUnpaired,
                );
            },
            Err(err) => {
                sdk_warn!(self.logger, "Pairing check failed: {}", err);
                self.transition(
                    &[AuthStatus::AuthenticatedCheckingPairing],
                    AuthStatus::AuthenticatedUnpaired,
                );
            },
        }
    }

    // ==========================================================================
    // Heartbeat
    // ==========================================================================

    fn arm_heartbeat(self: &Arc<Self>) {
        if !self.heartbeat_armed.swap(true, Ordering::SeqCst) {
            self.schedule_heartbeat();
        }
    }

    fn schedule_heartbeat(self: &Arc<Self>) {
        let inner = self.clone();
        self.scheduler
            .run_after(self.config.heartbeat_interval, Lane::Heartbeat, move || {
                inner.post_heartbeat();
                inner.schedule_heartbeat();
            });
    }

    fn post_heartbeat(self: &Arc<Self>) {
        if self.heartbeat_queued.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = self.clone();
        if !self
            .scheduler
            .post_to(Lane::Heartbeat, move || inner.run_heartbeat())
        {
            self.heartbeat_queued.store(false, Ordering::SeqCst);
        }
    }

    fn run_heartbeat(self: &Arc<Self>) {
        self.heartbeat_queued.store(false, Ordering::SeqCst);
        if let Err(code) = self.check_allowed(AUTHENTICATED) {
            sdk_debug!(self.logger, "Heartbeat skipped: {}", code);
            return;
        }
        if self.status() == AuthStatus::AuthenticatedUnpaired {
            self.check_pairing();
        }

        match self.transport.heartbeat(&self.endpoint()) {
            Ok(reply) => {
                if let Some(players) = reply.players {
                    if self.profiles.set_profiles(&players)
                        && self.device_info.auto_download_player_pics
                    {
                        self.download_pictures();
                    }
                }
                self.retry_undelivered();
            },
            Err(err) => sdk_warn!(self.logger, "Heartbeat failed: {}", err),
        }
    }

    fn download_pictures(self: &Arc<Self>) {
        for (player, url) in self.profiles.pictures_to_download() {
            let inner = self.clone();
            self.scheduler.post_to(Lane::Default, move || {
                match inner.transport.download(&url) {
                    Ok(bytes) => inner.profiles.set_picture(player, bytes),
                    Err(err) => sdk_warn!(
                        inner.logger,
                        "Failed to download picture of player {}: {}",
                        player,
                        err
                    ),
                }
            });
        }
    }

    // ==========================================================================
    // Game sessions
    // ==========================================================================

    /// Appends `data` to its session. Returns true if an upload must be posted.
    fn record_snapshot(&self, data: &GameData) -> bool {
        let uuid = data.session_uuid();
        let mut sessions = self.sessions.lock();
        let session = sessions
            .entry(uuid.to_owned())
            .or_insert_with(GameSession::new);
        session.history.push(data.clone());
        session.game_data = data.clone();
        session.revision += 1;
        let post = !session.upload_queued;
        session.upload_queued = true;

        if sessions.len() > MAX_RETAINED_SESSIONS {
            let victim = sessions
                .iter()
                .filter(|(key, _)| key.as_str() != uuid)
                .min_by_key(|(_, s)| (!s.is_finished(), s.started_at))
                .map(|(key, _)| key.clone());
            if let Some(victim) = victim {
                sessions.remove(&victim);
                sdk_warn!(
                    self.logger,
                    "Too many pending sessions, dropping session {}",
                    victim
                );
            }
        }
        post
    }

    fn post_upload(self: &Arc<Self>, session_uuid: String) {
        let inner = self.clone();
        let uuid = session_uuid.clone();
        if !self
            .scheduler
            .post_to(Lane::GameData, move || inner.run_upload(&uuid))
        {
            if let Some(session) = self.sessions.lock().get_mut(&session_uuid) {
                session.upload_queued = false;
            }
        }
    }

    fn run_upload(self: &Arc<Self>, session_uuid: &str) {
        let (upload, revision) = {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(session_uuid) else {
                return;
            };
            session.upload_queued = false;
            let upload = GameDataUpload {
                session_uuid: session_uuid.to_owned(),
                session_counter: session.session_counter,
                data: session.game_data.clone(),
            };
            (upload, session.revision)
        };

        if let Err(code) = self.check_allowed(PAIRED) {
            sdk_debug!(
                self.logger,
                "Game data of session {} kept for later: {}",
                session_uuid,
                code
            );
            return;
        }

        if let Err(err) = self.transport.game_data(&self.endpoint(), upload) {
            sdk_warn!(
                self.logger,
                "Game data upload of session {} failed: {}",
                session_uuid,
                err
            );
            return;
        }

        let history_due = {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(session_uuid) else {
                return;
            };
            session.session_counter += 1;
            session.delivered_revision = session.delivered_revision.max(revision);
            let due = session.is_delivered() && session.is_finished() && !session.history_queued;
            if due {
                session.history_queued = true;
            }
            due
        };
        if history_due {
            self.run_history_upload(session_uuid);
        }
    }

    fn post_history_upload(self: &Arc<Self>, session_uuid: String) {
        let inner = self.clone();
        let uuid = session_uuid.clone();
        if !self
            .scheduler
            .post_to(Lane::GameData, move || inner.run_history_upload(&uuid))
        {
            if let Some(session) = self.sessions.lock().get_mut(&session_uuid) {
                session.history_queued = false;
            }
        }
    }

    /// Uploads the history of a finished, delivered session and drops it.
    fn run_history_upload(&self, session_uuid: &str) {
        let upload = {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(session_uuid) else {
                return;
            };
            session.history_queued = false;
            HistoryUpload {
                session_uuid: session_uuid.to_owned(),
                file_name: format!("{session_uuid}.csv"),
                csv: history_to_csv(&session.history).into_bytes(),
            }
        };

        if let Err(code) = self.check_allowed(PAIRED) {
            sdk_debug!(
                self.logger,
                "History of session {} kept for later: {}",
                session_uuid,
                code
            );
            return;
        }

        match self.transport.upload_history(&self.endpoint(), upload) {
            Ok(()) => {
                self.sessions.lock().remove(session_uuid);
                sdk_info!(self.logger, "Session {} uploaded and closed", session_uuid);
            },
            Err(err) => sdk_warn!(
                self.logger,
                "History upload of session {} failed: {}",
                session_uuid,
                err
            ),
        }
    }

    /// Re-posts every upload that has not reached the server yet.
    fn retry_undelivered(self: &Arc<Self>) {
        if self.status() != AuthStatus::AuthenticatedPaired {
            return;
        }
        let mut uploads = Vec::new();
        let mut histories = Vec::new();
        {
            let mut sessions = self.sessions.lock();
            for (uuid, session) in sessions.iter_mut() {
                if !session.is_delivered() {
                    if !session.upload_queued {
                        session.upload_queued = true;
                        uploads.push(uuid.clone());
                    }
                } else if session.is_finished() && !session.history_queued {
                    session.history_queued = true;
                    histories.push(uuid.clone());
                }
            }
        }
        if !uploads.is_empty() || !histories.is_empty() {
            sdk_debug!(
                self.logger,
                "Retrying {} upload(s) and {} history upload(s)",
                uploads.len(),
                histories.len()
            );
        }
        for uuid in uploads {
            self.post_upload(uuid);
        }
        for uuid in histories {
            self.post_history_upload(uuid);
        }
    }

    // ==========================================================================
    // Requests with callbacks
    // ==========================================================================

    fn post_request<F>(
        self: &Arc<Self>,
        name: &'static str,
        allowed: &'static [AuthStatus],
        callback: Callback,
        call: F,
    ) where
        F: FnOnce(&Self) -> Result<String, TransportError> + Send + 'static,
    {
        let inner = self.clone();
        let reply = Reply::new(callback);
        self.scheduler.post_to(Lane::Default, move || {
            if let Err(code) = inner.check_allowed(allowed) {
                sdk_warn!(inner.logger, "Request {} refused: {}", name, code);
                reply.send(code, String::new());
                return;
            }
            match call(&*inner) {
                Ok(payload) => reply.send(ErrorCode::Success, payload),
                Err(err) => {
                    sdk_warn!(inner.logger, "Request {} failed: {}", name, err);
                    reply.send(ErrorCode::from(&err), err.to_string());
                },
            }
        });
    }

    fn fetch_pair_code(&self) -> Result<String, TransportError> {
        if let Some(code) = self.state.lock().short_code.clone() {
            return Ok(code);
        }
        let code = self.transport.pair_code(&self.endpoint())?;
        self.state.lock().short_code = Some(code.clone());
        Ok(code)
    }

    fn unpair(&self) -> Result<String, TransportError> {
        let body = self.transport.unpair(&self.endpoint())?;
        if self.transition(PAIRED, AuthStatus::AuthenticatedUnpaired) {
            self.state.lock().forget_pairing();
        }
        Ok(body)
    }

    // ==========================================================================
    // Memoized accessors
    // ==========================================================================

    fn pair_deeplink(&self) -> String {
        if self.status() != AuthStatus::AuthenticatedPaired {
            return String::new();
        }
        let mut state = self.state.lock();
        state
            .pair_deeplink
            .get_or_insert_with(|| {
                format!(
                    "{}?$deeplink_path={}&machineid={}&uuid={}",
                    DEEPLINK_BASE,
                    self.device_info.provider,
                    self.device_info.machine_id,
                    remove_symbols(&self.machine_uuid, "-")
                )
            })
            .clone()
    }

    fn claim_deeplink(&self, player: PlayerId) -> String {
        if self.status() != AuthStatus::AuthenticatedPaired {
            return String::new();
        }
        let mut state = self.state.lock();
        if let Some(link) = state.claim_deeplinks.get(&player) {
            return link.clone();
        }
        let Some(venue) = state.venue_machine.as_ref() else {
            return String::new();
        };
        let link = format!(
            "{}?$deeplink_path={}&opdb={}&position={}",
            DEEPLINK_BASE, venue.id, venue.opdb_id, player
        );
        state.claim_deeplinks.insert(player, link.clone());
        link
    }
}

/// Production [`NetBase`]: authentication, pairing, uploads and requests
/// on a worker pool.
///
/// Built with [`SessionNet::builder`]. Dropping it stops the scheduler,
/// which cancels the heartbeat timer and waits for queued work to finish.
///
/// # Retry policy
///
/// A snapshot handed to [`send_game_data`](NetBase::send_game_data) is
/// appended to its session's history at once and never dropped while the
/// session is retained. Uploads of the same session are coalesced: one
/// queued upload at a time, always sending the latest snapshot. A session
/// whose latest snapshot was not delivered (transport error, or not paired
/// yet) is retried after every successful heartbeat while paired. Once the
/// final, inactive snapshot is delivered, the session history is uploaded
/// as CSV and the session is dropped.
pub struct SessionNet {
    inner: Arc<Inner>,
}

impl SessionNet {
    /// Starts building an engine for `device_info`.
    pub fn builder(device_info: DeviceInfo) -> SessionNetBuilder {
        SessionNetBuilder::new(device_info)
    }

    pub(super) fn start(
        device_info: DeviceInfo,
        config: NetConfig,
        machine_uuid: String,
        base_url: String,
        signer: Arc<dyn Signer>,
        transport: Arc<dyn Transport>,
        logger: Logger,
    ) -> Self {
        let scheduler = Scheduler::new(config.worker_threads, logger.clone());
        scheduler.start();
        sdk_info!(
            logger,
            "Network engine for {} ({}) talking to {}",
            device_info.provider,
            machine_uuid,
            base_url
        );
        Self {
            inner: Arc::new(Inner {
                profiles: ProfileCache::new(logger.clone()),
                device_info,
                config,
                machine_uuid,
                base_url,
                signer,
                transport,
                logger,
                status: AtomicI32::new(AuthStatus::NotAuthenticated.as_i32()),
                state: Mutex::new(NetState::default()),
                sessions: Mutex::new(BTreeMap::new()),
                heartbeat_queued: AtomicBool::new(false),
                heartbeat_armed: AtomicBool::new(false),
                scheduler,
            }),
        }
    }

    /// `scheme://host:port` of the server.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Number of sessions with uploads still pending.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.inner.sessions.lock().len()
    }

    /// Recorded snapshots of a retained session, oldest first.
    #[must_use]
    pub fn session_history(&self, session_uuid: &str) -> Option<Vec<GameData>> {
        self.inner
            .sessions
            .lock()
            .get(session_uuid)
            .map(|session| session.history.clone())
    }

    /// Snapshots of a retained session the server accepted so far.
    #[must_use]
    pub fn session_counter(&self, session_uuid: &str) -> Option<u32> {
        self.inner
            .sessions
            .lock()
            .get(session_uuid)
            .map(|session| session.session_counter)
    }

    /// Stops the scheduler: cancels the heartbeat timer, finishes queued
    /// work and joins the worker threads. Later submissions are refused.
    pub fn shutdown(&self) {
        self.inner.scheduler.stop();
    }
}

impl Drop for SessionNet {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SessionNet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionNet")
            .field("machine_uuid", &self.inner.machine_uuid)
            .field("base_url", &self.inner.base_url)
            .field("status", &self.inner.status())
            .field("scheduler", &self.inner.scheduler)
            .finish_non_exhaustive()
    }
}

impl NetBase for SessionNet {
    fn status(&self) -> AuthStatus {
        self.inner.status()
    }

    fn authenticate(&self) {
        if !self
            .inner
            .transition(&[AuthStatus::NotAuthenticated], AuthStatus::Authenticating)
        {
            sdk_debug!(self.inner.logger, "Authentication already started");
            return;
        }
        let inner = self.inner.clone();
        if !self
            .inner
            .scheduler
            .post_to(Lane::Default, move || inner.run_authentication())
        {
            self.inner.fail_authentication("scheduler is stopped");
        }
    }

    fn send_installed(&self, kind: &str, version: &str, installed: Option<bool>) {
        let report = InstalledReport {
            kind: kind.to_owned(),
            version: version.to_owned(),
            installed,
            log: None,
        };
        let inner = self.inner.clone();
        self.inner.scheduler.post_to(Lane::Default, move || {
            if let Err(code) = inner.check_allowed(AUTHENTICATED) {
                sdk_warn!(
                    inner.logger,
                    "Installed report for {} not sent: {}",
                    report.kind,
                    code
                );
                return;
            }
            let kind = report.kind.clone();
            match inner.transport.installed(&inner.endpoint(), report) {
                Ok(()) => sdk_debug!(inner.logger, "Installed report for {} sent", kind),
                Err(err) => {
                    sdk_warn!(inner.logger, "Installed report for {} failed: {}", kind, err);
                },
            }
        });
    }

    fn send_game_data(&self, data: &GameData) {
        if data.session_uuid().is_empty() {
            sdk_warn!(self.inner.logger, "Game data without session ignored");
            return;
        }
        if self.inner.status() == AuthStatus::AuthenticationFailed {
            sdk_warn!(
                self.inner.logger,
                "Game data of session {} not recorded: {}",
                data.session_uuid(),
                ErrorCode::AuthFailed
            );
            return;
        }
        if self.inner.record_snapshot(data) {
            self.inner.post_upload(data.session_uuid().to_owned());
        }
    }

    fn send_heartbeat(&self) {
        self.inner.post_heartbeat();
    }

    fn request_pair_code(&self, callback: Callback) {
        self.inner
            .post_request("pair code", PAIR_CODE, callback, Inner::fetch_pair_code);
    }

    fn request_top_scores(&self, score_filter: i64, callback: Callback) {
        self.inner
            .post_request("top scores", PAIRED, callback, move |inner| {
                inner
                    .transport
                    .top_scores(&inner.endpoint(), score_filter)
            });
    }

    fn request_unpair(&self, callback: Callback) {
        self.inner
            .post_request("unpair", PAIRED, callback, Inner::unpair);
    }

    fn machine_uuid(&self) -> String {
        self.inner.machine_uuid.clone()
    }

    fn pair_deeplink(&self) -> String {
        self.inner.pair_deeplink()
    }

    fn claim_deeplink(&self, player: PlayerId) -> String {
        self.inner.claim_deeplink(player)
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.inner.device_info
    }

    fn profiles(&self) -> &ProfileCache {
        &self.inner.profiles
    }
}
