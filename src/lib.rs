//! # Scorbit Sync
//!
//! Session synchronization engine for game controllers that report live
//! play to the Scorbit cloud.
//!
//! The host owns a [`GameState`]. It feeds the game's progress through
//! plain setters (ball, active player, scores, modes) and calls
//! [`GameState::commit`]. Changed snapshots are handed to the network
//! engine, [`SessionNet`], which authenticates the device, tracks pairing,
//! keeps every session's history and uploads it through a host-supplied
//! [`Transport`]. No call on the host's thread blocks on the network.
//!
//! ```ignore
//! use scorbit_sync::prelude::*;
//!
//! let net = SessionNet::builder(device_info)
//!     .with_signing_key(key)
//!     .build(signer, transport)?;
//! let mut state = GameState::new(Box::new(net), Logger::default());
//!
//! state.set_game_started();
//! state.set_score(1, 1000, 0);
//! state.commit();
//! ```
//!
//! Logging goes through an explicit [`Logger`] handle; by default records
//! are forwarded to [`tracing`](https://docs.rs/tracing).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use error::{ConfigError, ErrorCode, TransportError};
pub use game_state::{GameState, SDK_VERSION};
pub use logging::{LogLevel, LogRecord, LogSink, Logger};
pub use model::{BallNumber, GameData, Modes, PlayerId, PlayerState};
pub use net::{AuthStatus, Callback, DeviceInfo, NetBase, NetConfig, SessionNet, Transport};
pub use profiles::{Picture, PlayerProfile, ProfileCache};
pub use scheduler::{Lane, Scheduler};

pub mod error;
pub mod game_state;
pub mod history;
pub mod logging;
pub mod model;
pub mod net;
pub mod prelude;
pub mod profiles;
pub mod scheduler;
