//! Callback requests and deeplinks.

#![allow(clippy::unwrap_used)]

use crate::common::{
    build_net, build_net_with, callback_channel, device_info, quiet_config, wait_for_status,
    SpyTransport, WAIT_TIMEOUT,
};
use scorbit_sync::model::PlayerId;
use scorbit_sync::net::NetBase;
use scorbit_sync::{AuthStatus, ErrorCode, SessionNet};

fn net_in(spy: &SpyTransport, status: AuthStatus) -> SessionNet {
    let net = build_net(spy);
    net.authenticate();
    wait_for_status(&net, status);
    net
}

fn p(n: u32) -> PlayerId {
    PlayerId::new(n).unwrap()
}

#[test]
fn pair_code_is_fetched_once() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);

    for _ in 0..2 {
        let (callback, rx) = callback_channel();
        net.request_pair_code(callback);
        assert_eq!(
            rx.recv_timeout(WAIT_TIMEOUT).unwrap(),
            (ErrorCode::Success, "ABC123".to_owned())
        );
    }
    assert_eq!(spy.state().count("pair_code"), 1);
}

#[test]
fn pair_code_is_available_while_unpaired() {
    let spy = SpyTransport::unpaired();
    let net = net_in(&spy, AuthStatus::AuthenticatedUnpaired);
    let (callback, rx) = callback_channel();
    net.request_pair_code(callback);
    assert_eq!(rx.recv_timeout(WAIT_TIMEOUT).unwrap().0, ErrorCode::Success);
}

#[test]
fn top_scores_need_pairing() {
    let spy = SpyTransport::unpaired();
    let net = net_in(&spy, AuthStatus::AuthenticatedUnpaired);
    let (callback, rx) = callback_channel();
    net.request_top_scores(0, callback);
    assert_eq!(
        rx.recv_timeout(WAIT_TIMEOUT).unwrap(),
        (ErrorCode::NotPaired, String::new())
    );
    assert_eq!(spy.state().count("top_scores"), 0);
}

#[test]
fn unpair_needs_pairing() {
    let spy = SpyTransport::unpaired();
    let net = net_in(&spy, AuthStatus::AuthenticatedUnpaired);
    let (callback, rx) = callback_channel();
    net.request_unpair(callback);
    assert_eq!(
        rx.recv_timeout(WAIT_TIMEOUT).unwrap(),
        (ErrorCode::NotPaired, String::new())
    );
    assert_eq!(spy.state().count("unpair"), 0);
    assert_eq!(net.status(), AuthStatus::AuthenticatedUnpaired);
}

#[test]
fn top_scores_deliver_the_reply_body() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    let (callback, rx) = callback_channel();
    net.request_top_scores(100_000, callback);
    assert_eq!(
        rx.recv_timeout(WAIT_TIMEOUT).unwrap(),
        (ErrorCode::Success, r#"{"scores":[]}"#.to_owned())
    );
}

#[test]
fn transport_failure_is_an_api_error() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    spy.state().fail_requests = true;

    let (callback, rx) = callback_channel();
    net.request_top_scores(0, callback);
    let (code, body) = rx.recv_timeout(WAIT_TIMEOUT).unwrap();
    assert_eq!(code, ErrorCode::ApiError);
    assert!(body.contains("top scores refused"));
}

#[test]
fn failed_pair_code_is_not_cached() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    spy.state().fail_requests = true;

    let (callback, rx) = callback_channel();
    net.request_pair_code(callback);
    assert_eq!(rx.recv_timeout(WAIT_TIMEOUT).unwrap().0, ErrorCode::ApiError);

    spy.state().fail_requests = false;
    let (callback, rx) = callback_channel();
    net.request_pair_code(callback);
    assert_eq!(rx.recv_timeout(WAIT_TIMEOUT).unwrap().0, ErrorCode::Success);
    assert_eq!(spy.state().count("pair_code"), 2);
}

#[test]
fn unpair_returns_to_unpaired_and_forgets_deeplinks() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    assert!(!net.pair_deeplink().is_empty());
    assert!(!net.claim_deeplink(p(1)).is_empty());

    let (callback, rx) = callback_channel();
    net.request_unpair(callback);
    assert_eq!(rx.recv_timeout(WAIT_TIMEOUT).unwrap().0, ErrorCode::Success);

    assert_eq!(net.status(), AuthStatus::AuthenticatedUnpaired);
    assert!(net.pair_deeplink().is_empty());
    assert!(net.claim_deeplink(p(1)).is_empty());
}

#[test]
fn request_after_shutdown_reports_unknown() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    net.shutdown();

    let (tx, rx) = crossbeam_channel::unbounded();
    net.request_top_scores(
        0,
        Box::new(move |code, _| {
            let _ = tx.send((code, std::thread::current().id()));
        }),
    );
    let (code, thread) = rx.try_recv().unwrap();
    assert_eq!(code, ErrorCode::Unknown);
    assert_eq!(thread, std::thread::current().id());
    assert_eq!(spy.state().count("top_scores"), 0);
}

#[test]
fn deeplinks_follow_the_qrcode_format() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    assert_eq!(
        net.pair_deeplink(),
        "https://scorbit.link/qrcode?$deeplink_path=scorbitron&machineid=4419\
         &uuid=f4de2fc036bf5209b019d40c961d079e"
    );
    assert_eq!(
        net.claim_deeplink(p(2)),
        "https://scorbit.link/qrcode?$deeplink_path=77&opdb=opdb-xyz&position=2"
    );
}

#[test]
fn deeplinks_are_memoized() {
    let spy = SpyTransport::paired();
    let net = net_in(&spy, AuthStatus::AuthenticatedPaired);
    let first = net.claim_deeplink(p(3));
    assert_eq!(net.claim_deeplink(p(3)), first);
    assert_eq!(net.pair_deeplink(), net.pair_deeplink());
}

#[test]
fn claim_deeplink_needs_a_venue_machine() {
    let spy = SpyTransport::paired();
    spy.state().venuemachine_id = None;
    let net = build_net_with(&spy, device_info(), quiet_config());
    net.authenticate();
    wait_for_status(&net, AuthStatus::AuthenticatedPaired);
    assert!(net.claim_deeplink(p(1)).is_empty());
    assert!(!net.pair_deeplink().is_empty());
}
