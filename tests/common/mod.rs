//! Common test infrastructure shared across integration tests.
//!
//! This module provides:
//! - `spy_transport`: a scripted [`Transport`](scorbit_sync::Transport) that
//!   records every call
//! - `test_utils`: device fixtures, a deterministic signer and polling
//!   helpers
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{build_net, wait_until, SpyTransport};
//! ```

pub mod spy_transport;
pub mod test_utils;

#[allow(unused_imports)]
pub use spy_transport::{SpyState, SpyTransport};
#[allow(unused_imports)]
pub use test_utils::{
    build_net, build_net_with, callback_channel, device_info, digest_signer, init_tracing, quiet_config,
    wait_for_status, wait_until, HOST_IDENTIFIER, MACHINE_UUID, POLL_INTERVAL, WAIT_TIMEOUT,
};
