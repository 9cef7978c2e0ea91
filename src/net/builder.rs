use std::sync::Arc;

use web_time::Duration;

use crate::error::ConfigError;
use crate::logging::Logger;
use crate::net::auth::{Key, Signer};
use crate::net::config::{DeviceInfo, NetConfig};
use crate::net::endpoint::resolve_hostname;
use crate::net::identity::{derive_uuid, parse_uuid};
use crate::net::transport::Transport;
use crate::net::SessionNet;
use crate::sdk_warn;

/// Builds a [`SessionNet`].
///
/// Validation happens in [`build`](Self::build); setters with a numeric
/// range check fail early.
///
/// # Example
///
/// ```ignore
/// use scorbit_sync::net::{DeviceInfo, SessionNet, Signature};
///
/// let info = DeviceInfo {
///     provider: "scorbitron".to_owned(),
///     machine_id: 4419,
///     game_code_version: "1.12.3".to_owned(),
///     host_identifier: "52:00:66:74:98:50".to_owned(),
///     ..DeviceInfo::default()
/// };
///
/// let net = SessionNet::builder(info)
///     .with_signing_key([1; 32])
///     .build(|_: &[u8; 32], _: &[u8; 32]| -> Option<Signature> { None }, my_transport)?;
/// ```
#[must_use = "SessionNetBuilder does nothing until build() is called"]
pub struct SessionNetBuilder {
    device_info: DeviceInfo,
    config: NetConfig,
    logger: Logger,
}

impl std::fmt::Debug for SessionNetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // signing key left out on purpose
        f.debug_struct("SessionNetBuilder")
            .field("device_info", &self.device_info)
            .field("heartbeat_interval", &self.config.heartbeat_interval)
            .field("worker_threads", &self.config.worker_threads)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

impl SessionNetBuilder {
    /// Starts a builder for the device described by `device_info`.
    pub fn new(device_info: DeviceInfo) -> Self {
        Self {
            device_info,
            config: NetConfig::default(),
            logger: Logger::default(),
        }
    }

    /// Replaces all runtime settings.
    pub fn with_config(mut self, config: NetConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the time between heartbeats. Default is 10 seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] if `interval` is zero.
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                field: "heartbeat_interval",
                reason: "must be greater than zero".to_owned(),
            });
        }
        self.config.heartbeat_interval = interval;
        Ok(self)
    }

    /// Sets the number of worker threads. Default is 4.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] if `threads` is zero.
    pub fn with_worker_threads(mut self, threads: usize) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::OutOfRange {
                field: "worker_threads",
                reason: "at least one worker thread is required".to_owned(),
            });
        }
        self.config.worker_threads = threads;
        Ok(self)
    }

    /// Sets the key handed to the signer.
    pub fn with_signing_key(mut self, key: Key) -> Self {
        self.config.signing_key = key;
        self
    }

    /// Sets the log handle. Default forwards to `tracing`.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Validates the configuration, starts the scheduler and returns the
    /// engine. Authentication is not started; call
    /// [`NetBase::authenticate`](crate::net::NetBase::authenticate) or hand
    /// the engine to [`GameState`](crate::game_state::GameState).
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`] if `provider` or `game_code_version`
    ///   is empty
    /// - [`ConfigError::OutOfRange`] for a malformed UUID or a zero
    ///   heartbeat interval or thread count
    /// - [`ConfigError::NoMachineIdentity`] if neither `uuid` nor
    ///   `host_identifier` is set
    pub fn build(
        self,
        signer: impl Signer + 'static,
        transport: impl Transport + 'static,
    ) -> Result<SessionNet, ConfigError> {
        self.build_shared(Arc::new(signer), Arc::new(transport))
    }

    /// Like [`build`](Self::build), for a signer and transport that are
    /// already shared.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_shared(
        self,
        signer: Arc<dyn Signer>,
        transport: Arc<dyn Transport>,
    ) -> Result<SessionNet, ConfigError> {
        let Self {
            mut device_info,
            config,
            logger,
        } = self;

        config.validate()?;
        if device_info.provider.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "provider" });
        }
        if device_info.game_code_version.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "game_code_version",
            });
        }

        let machine_uuid = if !device_info.uuid.trim().is_empty() {
            parse_uuid(&device_info.uuid).ok_or_else(|| ConfigError::OutOfRange {
                field: "uuid",
                reason: format!("`{}` is not a UUID", device_info.uuid),
            })?
        } else if !device_info.host_identifier.trim().is_empty() {
            derive_uuid(device_info.host_identifier.trim())
        } else {
            return Err(ConfigError::NoMachineIdentity);
        };
        device_info.uuid.clone_from(&machine_uuid);

        let base_url = resolve_hostname(&device_info.hostname).unwrap_or_else(|fallback| {
            sdk_warn!(
                logger,
                "Invalid hostname `{}`, using {}",
                device_info.hostname,
                fallback
            );
            fallback
        });

        Ok(SessionNet::start(
            device_info,
            config,
            machine_uuid,
            base_url,
            signer,
            transport,
            logger,
        ))
    }
}
