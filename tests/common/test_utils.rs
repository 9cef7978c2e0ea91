//! Shared fixtures and polling helpers for integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use crossbeam_channel::Receiver;
use std::thread;
use std::time::{Duration, Instant};

use scorbit_sync::net::{Digest, Key, NetBase, Signature};
use scorbit_sync::{AuthStatus, Callback, DeviceInfo, ErrorCode, Logger, NetConfig, SessionNet};

use super::spy_transport::SpyTransport;

/// Polling interval of [`wait_until`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Upper bound for anything a test waits on.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// MAC address the test device's UUID is derived from.
pub const HOST_IDENTIFIER: &str = "52:00:66:74:98:50";

/// UUID derived from [`HOST_IDENTIFIER`].
pub const MACHINE_UUID: &str = "f4de2fc0-36bf-5209-b019-d40c961d079e";

pub fn device_info() -> DeviceInfo {
    DeviceInfo {
        provider: "scorbitron".to_owned(),
        machine_id: 4419,
        game_code_version: "1.12.3".to_owned(),
        hostname: "staging".to_owned(),
        host_identifier: HOST_IDENTIFIER.to_owned(),
        serial_number: 1234,
        ..DeviceInfo::default()
    }
}

/// Signs by echoing the first four digest bytes.
pub fn digest_signer(digest: &Digest, _key: &Key) -> Option<Signature> {
    Some(Signature::from_slice(&digest[..4]))
}

/// Two workers; heartbeats only when a test asks for one.
pub fn quiet_config() -> NetConfig {
    NetConfig {
        heartbeat_interval: Duration::from_secs(3600),
        worker_threads: 2,
        ..NetConfig::default()
    }
}

pub fn build_net(spy: &SpyTransport) -> SessionNet {
    build_net_with(spy, device_info(), quiet_config())
}

pub fn build_net_with(spy: &SpyTransport, info: DeviceInfo, config: NetConfig) -> SessionNet {
    SessionNet::builder(info)
        .with_config(config)
        .with_logger(Logger::silent())
        .build(digest_signer, spy.clone())
        .expect("valid test configuration")
}

/// Polls `condition` until it holds or [`WAIT_TIMEOUT`] elapses.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(POLL_INTERVAL);
    }
    condition()
}

#[track_caller]
pub fn wait_for_status(net: &dyn NetBase, expected: AuthStatus) {
    assert!(
        wait_until(|| net.status() == expected),
        "status stayed {} instead of {}",
        net.status(),
        expected
    );
}

/// A callback that forwards its outcome into the returned channel.
pub fn callback_channel() -> (Callback, Receiver<(ErrorCode, String)>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let callback: Callback = Box::new(move |code, body| {
        let _ = tx.send((code, body));
    });
    (callback, rx)
}

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
