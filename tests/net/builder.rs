//! Builder validation and machine identity.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use crate::common::{
    device_info, digest_signer, init_tracing, quiet_config, wait_for_status, SpyTransport,
    MACHINE_UUID,
};
use scorbit_sync::logging::{CollectingSink, LogLevel};
use scorbit_sync::net::{NetBase, PRODUCTION_URL};
use scorbit_sync::{AuthStatus, ConfigError, DeviceInfo, Logger, NetConfig, SessionNet};

fn build(info: DeviceInfo) -> Result<SessionNet, ConfigError> {
    SessionNet::builder(info)
        .with_config(quiet_config())
        .with_logger(Logger::silent())
        .build(digest_signer, SpyTransport::default())
}

#[test]
fn provider_is_required() {
    let info = DeviceInfo {
        provider: "  ".to_owned(),
        ..device_info()
    };
    assert_eq!(
        build(info).unwrap_err(),
        ConfigError::MissingField { field: "provider" }
    );
}

#[test]
fn game_code_version_is_required() {
    let info = DeviceInfo {
        game_code_version: String::new(),
        ..device_info()
    };
    assert_eq!(
        build(info).unwrap_err(),
        ConfigError::MissingField {
            field: "game_code_version"
        }
    );
}

#[test]
fn machine_identity_is_required() {
    let info = DeviceInfo {
        host_identifier: String::new(),
        ..device_info()
    };
    assert_eq!(build(info).unwrap_err(), ConfigError::NoMachineIdentity);
}

#[test]
fn malformed_uuid_is_rejected() {
    let info = DeviceInfo {
        uuid: "not-a-uuid".to_owned(),
        ..device_info()
    };
    assert!(matches!(
        build(info).unwrap_err(),
        ConfigError::OutOfRange { field: "uuid", .. }
    ));
}

#[test]
fn explicit_uuid_wins_and_is_normalized() {
    let info = DeviceInfo {
        uuid: "{A61C6382-3B4B-42CC-BAD2-EB7BCD831A0D}".to_owned(),
        ..device_info()
    };
    let net = build(info).unwrap();
    assert_eq!(net.machine_uuid(), "a61c6382-3b4b-42cc-bad2-eb7bcd831a0d");
    assert_eq!(net.device_info().uuid, net.machine_uuid());
}

#[test]
fn uuid_is_derived_from_host_identifier() {
    let net = build(device_info()).unwrap();
    assert_eq!(net.machine_uuid(), MACHINE_UUID);
    assert_eq!(net.device_info().uuid, MACHINE_UUID);
}

#[test]
fn zero_settings_are_rejected() {
    assert!(SessionNet::builder(device_info())
        .with_worker_threads(0)
        .is_err());
    assert!(SessionNet::builder(device_info())
        .with_heartbeat_interval(Duration::ZERO)
        .is_err());

    let config = NetConfig {
        worker_threads: 0,
        ..NetConfig::default()
    };
    let err = SessionNet::builder(device_info())
        .with_config(config)
        .with_logger(Logger::silent())
        .build(digest_signer, SpyTransport::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            field: "worker_threads",
            ..
        }
    ));
}

#[test]
fn hostnames_are_normalized() {
    let cases = [
        ("production", PRODUCTION_URL),
        ("staging", "https://staging.scorbit.io:443"),
        ("http://localhost:8080/api/v2", "http://localhost:8080"),
        ("https://example.com", "https://example.com:443"),
    ];
    for (hostname, expected) in cases {
        let info = DeviceInfo {
            hostname: hostname.to_owned(),
            ..device_info()
        };
        assert_eq!(build(info).unwrap().base_url(), expected, "{hostname}");
    }
}

#[test]
fn invalid_hostname_falls_back_to_production_with_a_warning() {
    let sink = Arc::new(CollectingSink::new());
    let info = DeviceInfo {
        hostname: "ftp://example.com".to_owned(),
        ..device_info()
    };
    let net = SessionNet::builder(info)
        .with_logger(Logger::from_sinks(vec![sink.clone()]))
        .build(digest_signer, SpyTransport::default())
        .unwrap();
    assert_eq!(net.base_url(), PRODUCTION_URL);
    assert!(sink.contains(LogLevel::Warn, "ftp://example.com"));
}

#[test]
fn default_logger_forwards_to_tracing() {
    init_tracing();
    let spy = SpyTransport::paired();
    let net = SessionNet::builder(device_info())
        .with_config(quiet_config())
        .build(digest_signer, spy.clone())
        .unwrap();
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedPaired);
}
