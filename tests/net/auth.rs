//! Authentication and pairing.

#![allow(clippy::unwrap_used)]

use crate::common::{
    build_net, build_net_with, callback_channel, device_info, digest_signer, quiet_config,
    wait_for_status, wait_until, SpyTransport, MACHINE_UUID, WAIT_TIMEOUT,
};
use scorbit_sync::model::{GameData, PlayerId};
use scorbit_sync::net::{sign_hex, Digest, Key, NetBase, Signature};
use scorbit_sync::{AuthStatus, ErrorCode, Logger, SessionNet};

#[test]
fn starts_unauthenticated() {
    let spy = SpyTransport::paired();
    let net = build_net(&spy);
    assert_eq!(net.status(), AuthStatus::NotAuthenticated);
    assert_eq!(net.machine_uuid(), MACHINE_UUID);
    assert!(spy.state().calls.is_empty());
}

#[test]
fn authenticates_and_detects_pairing() {
    let spy = SpyTransport::paired();
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedPaired);

    let state = spy.state();
    assert_eq!(state.calls, vec!["authenticate", "pairing_status"]);

    let request = &state.auth_requests[0];
    assert_eq!(request.uuid, MACHINE_UUID.replace('-', ""));
    assert_eq!(request.provider, "scorbitron");
    assert_eq!(request.machine_id, 4419);
    assert_eq!(request.serial_number, 1234);
    assert_eq!(request.game_code_version, "1.12.3");
    assert!(request.timestamp.parse::<u64>().is_ok());
    assert!(request.score_features.is_empty());
    assert_eq!(request.score_features_version, None);

    let expected = sign_hex(
        &digest_signer,
        &quiet_config().signing_key,
        &request.uuid,
        &request.timestamp,
    )
    .unwrap();
    assert_eq!(request.signature, expected);
    assert_eq!(request.signature.len(), 8);

    assert_eq!(state.endpoints[0].base_url, "https://staging.scorbit.io:443");
    assert!(state.endpoints[0].token.is_empty());
    assert_eq!(state.endpoints[1].token, "token-1");
}

#[test]
fn unpaired_device_stays_unpaired() {
    let spy = SpyTransport::unpaired();
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedUnpaired);
    assert!(net.pair_deeplink().is_empty());
}

#[test]
fn only_first_authenticate_has_an_effect() {
    let spy = SpyTransport::paired();
    let net = build_net(&spy);
    net.authenticate();
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedPaired);
    net.authenticate();
    net.shutdown();
    assert_eq!(spy.state().count("authenticate"), 1);
}

#[test]
fn rejected_handshake_is_terminal() {
    let spy = SpyTransport::paired();
    spy.state().fail_auth = true;
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticationFailed);

    net.authenticate();
    net.shutdown();
    assert_eq!(net.status(), AuthStatus::AuthenticationFailed);
    assert_eq!(spy.state().count("authenticate"), 1);
    assert_eq!(spy.state().count("pairing_status"), 0);
}

#[test]
fn missing_signature_fails_without_contacting_the_server() {
    let spy = SpyTransport::paired();
    let net = SessionNet::builder(device_info())
        .with_config(quiet_config())
        .with_logger(Logger::silent())
        .build(
            |_: &Digest, _: &Key| -> Option<Signature> { None },
            spy.clone(),
        )
        .unwrap();
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticationFailed);
    assert!(spy.state().calls.is_empty());
}

#[test]
fn failed_pairing_check_counts_as_unpaired() {
    let spy = SpyTransport::paired();
    spy.state().fail_pairing = true;
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedUnpaired);
}

#[test]
fn failed_authentication_surfaces_in_callbacks() {
    let spy = SpyTransport::paired();
    spy.state().fail_auth = true;
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticationFailed);

    let (callback, rx) = callback_channel();
    net.request_pair_code(callback);
    let (code, body) = rx.recv_timeout(WAIT_TIMEOUT).unwrap();
    assert_eq!(code, ErrorCode::AuthFailed);
    assert!(body.is_empty());
}

#[test]
fn game_data_is_dropped_after_failed_authentication() {
    let spy = SpyTransport::paired();
    spy.state().fail_auth = true;
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticationFailed);

    net.send_game_data(&GameData::started("7c1e6a4e-0000-4000-8000-000000000001"));
    assert_eq!(net.session_count(), 0);
}

#[test]
fn requests_before_authentication_are_refused() {
    let spy = SpyTransport::paired();
    let net = build_net(&spy);
    let (callback, rx) = callback_channel();
    net.request_pair_code(callback);
    assert_eq!(rx.recv_timeout(WAIT_TIMEOUT).unwrap().0, ErrorCode::NotPaired);
    assert!(wait_until(|| spy.state().calls.is_empty()));
}

#[test]
fn claim_deeplink_needs_pairing() {
    let spy = SpyTransport::unpaired();
    let net = build_net(&spy);
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedUnpaired);
    assert!(net.claim_deeplink(PlayerId::FIRST).is_empty());
}

#[test]
fn score_features_are_announced_at_authentication() {
    let spy = SpyTransport::paired();
    let mut info = device_info();
    info.score_features = vec!["ramp".to_owned(), "left slingshot".to_owned()];
    info.score_features_version = 2;
    let net = build_net_with(&spy, info, quiet_config());
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedPaired);

    let state = spy.state();
    let request = &state.auth_requests[0];
    assert_eq!(request.score_features, vec!["ramp", "left slingshot"]);
    assert_eq!(request.score_features_version, Some(2));

    let body = serde_json::to_value(request).unwrap();
    assert_eq!(body["score_features"][1], "left slingshot");
    assert_eq!(body["score_features_version"], 2);
}

#[test]
fn score_features_version_is_omitted_without_features() {
    let spy = SpyTransport::paired();
    let mut info = device_info();
    info.score_features_version = 5;
    let net = build_net_with(&spy, info, quiet_config());
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedPaired);

    let state = spy.state();
    let body = serde_json::to_value(&state.auth_requests[0]).unwrap();
    assert!(body.get("score_features").is_none());
    assert!(body.get("score_features_version").is_none());
}
