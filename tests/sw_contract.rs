//! Contract test between the Rust notification model and `public/sw.js`.
//!
//! The service worker is plain JavaScript, so nothing ties its strings to
//! `pix_console::notify` at compile time. This test pins the mirrored
//! constants: the default title, the dismiss action id and the kind to
//! click-route table. When a kind is added or a route moves, both sides
//! must change together or this fails.

use std::fs;
use std::path::Path;

use pix_console::notify::{NotificationKind, DEFAULT_TITLE, DISMISS_ACTION};

const ALL_KINDS: [NotificationKind; 5] = [
    NotificationKind::PaymentReceived,
    NotificationKind::TransferReceived,
    NotificationKind::WithdrawalUpdated,
    NotificationKind::TicketReply,
    NotificationKind::Generic,
];

fn service_worker_source() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("public/sw.js");
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("public/sw.js must exist for web push: {}", e))
}

/// Whitespace-insensitive view of the source, so reformatting the worker
/// does not break the contract.
fn normalized(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn the_default_title_matches() {
    let sw = service_worker_source();
    let needle = format!(r#"const DEFAULT_TITLE = "{}";"#, DEFAULT_TITLE);
    assert!(
        sw.contains(&needle),
        "sw.js must declare the shared default title {:?}",
        DEFAULT_TITLE
    );
}

#[test]
fn the_dismiss_action_id_matches() {
    let sw = service_worker_source();
    let needle = format!(r#"const DISMISS_ACTION = "{}";"#, DISMISS_ACTION);
    assert!(
        sw.contains(&needle),
        "sw.js must declare the shared dismiss action id {:?}",
        DISMISS_ACTION
    );
}

#[test]
fn every_kind_routes_clicks_to_the_same_page() {
    let sw = normalized(&service_worker_source());
    for kind in ALL_KINDS {
        let needle = format!(r#"{}: "{}""#, kind.as_str(), kind.click_route());
        assert!(
            sw.contains(&needle),
            "sw.js click-route table must map {} to {}",
            kind.as_str(),
            kind.click_route()
        );
    }
}

#[test]
fn unknown_kinds_fall_back_to_the_generic_route() {
    // NotificationKind::parse sends unknown tags to Generic; the worker
    // does the same with its route lookup.
    let sw = normalized(&service_worker_source());
    assert!(
        sw.contains("CLICK_ROUTES[kind] || CLICK_ROUTES.generic"),
        "sw.js must fall back to the generic route for unknown kinds"
    );
    assert_eq!(
        NotificationKind::parse("audit_event"),
        NotificationKind::Generic
    );
}

#[test]
fn clicks_can_route_because_the_kind_rides_in_notification_data() {
    let sw = normalized(&service_worker_source());
    assert!(
        sw.contains("data: { kind: payload.kind, reference: payload.reference }"),
        "showNotification must carry kind and reference for click routing"
    );
}
