//! Convenient re-exports for common usage.
//!
//! ```rust
//! use scorbit_sync::prelude::*;
//! ```
//!
//! Includes the host API ([`GameState`]), the network engine and its
//! builder, the host-supplied seams ([`Transport`], [`Signer`],
//! [`LogSink`]) and the types that cross them.

pub use crate::error::{ConfigError, ErrorCode, TransportError};
pub use crate::game_state::GameState;
pub use crate::logging::{LogLevel, LogRecord, LogSink, Logger};
pub use crate::model::{GameData, PlayerId};
pub use crate::net::{
    AuthReply, AuthRequest, AuthStatus, Callback, DeviceInfo, Endpoint, GameDataUpload,
    HeartbeatReply, HistoryUpload, InstalledReport, Key, NetBase, NetConfig, PairingStatus,
    SessionNet, SessionNetBuilder, Signature, Signer, Transport,
};
pub use crate::profiles::PlayerProfile;
