//! Change-gated reporting through the full service dispatch path.

use crate::mock_ports::Harness;
use thermogate::config::APP_VERSION;
use thermogate::error::TransmitError;
use thermogate::events::Event;
use thermogate::link::LinkState;

#[test]
fn no_publish_while_disconnected() {
    let mut h = Harness::started();
    // Metadata is pending, so the detector would say "report"; the
    // connectivity gate must win.
    assert_ne!(h.service.link_state(), LinkState::Connected);
    h.next_report_tick();
    h.next_report_tick();
    assert!(h.hw.published.is_empty());
    assert!(h.service.snapshot().pending_metadata);
}

#[test]
fn session_ready_publishes_boot_metadata_immediately() {
    let mut h = Harness::started();
    h.link_up();
    // The immediate tick is armed at zero delay; expire it without moving
    // uptime anywhere near the report period.
    h.run_to(1);
    assert_eq!(h.hw.published.len(), 1);
    assert_eq!(h.hw.published[0].app_version, Some(APP_VERSION));
    assert!(h.hw.report_led);

    h.deliver(Event::PublishOutcome(Ok(())));
    assert!(!h.service.snapshot().pending_metadata);
    assert!(!h.hw.report_led);
}

#[test]
fn change_gate_holds_below_threshold() {
    let mut h = Harness::started();
    let inside = h.inside_addr();
    let outside = h.outside_addr();
    h.link_up();
    h.advertise(&inside, "den", 2000, -50);
    h.advertise(&outside, "yard", 1500, -70);
    h.run_to(1);
    h.deliver(Event::PublishOutcome(Ok(())));
    let published = h.hw.published.len();

    // 20.0 -> 20.3 with a 0.5 C threshold: no report.
    h.advertise(&inside, "den", 2030, -50);
    h.next_report_tick();
    assert_eq!(h.hw.published.len(), published);

    // 20.0 -> 20.6 crosses the threshold.
    h.advertise(&inside, "den", 2060, -50);
    h.next_report_tick();
    assert_eq!(h.hw.published.len(), published + 1);
}

#[test]
fn failed_transmit_retries_with_same_delta() {
    let mut h = Harness::started();
    h.link_up();
    h.run_to(1);
    assert_eq!(h.hw.published.len(), 1);

    h.deliver(Event::PublishOutcome(Err(TransmitError::SendFailed)));
    assert!(h.service.snapshot().pending_metadata, "failure must not clear state");

    // Unchanged records: the next tick must decide "report needed" again.
    h.next_report_tick();
    assert_eq!(h.hw.published.len(), 2);
    assert_eq!(h.hw.published[1].app_version, Some(APP_VERSION));

    h.deliver(Event::PublishOutcome(Ok(())));
    assert!(!h.service.snapshot().pending_metadata);

    // And a stray duplicate outcome must not double-clear anything.
    let snapshot_inside = h.service.snapshot().inside_temperature;
    h.deliver(Event::PublishOutcome(Ok(())));
    assert_eq!(h.service.snapshot().inside_temperature, snapshot_inside);
}

#[test]
fn immediate_publish_rejection_is_a_failed_attempt() {
    let mut h = Harness::started();
    h.link_up();
    h.hw.fail_publish = true;
    h.run_to(1);
    assert!(h.hw.published.is_empty());
    assert!(h.service.snapshot().pending_metadata);
    assert!(!h.hw.report_led);

    h.hw.fail_publish = false;
    h.next_report_tick();
    assert_eq!(h.hw.published.len(), 1);
}

#[test]
fn one_report_outstanding_at_a_time() {
    let mut h = Harness::started();
    h.link_up();
    h.run_to(1);
    assert_eq!(h.hw.published.len(), 1);

    // No outcome yet: further ticks must not stack a second publish.
    h.next_report_tick();
    h.next_report_tick();
    assert_eq!(h.hw.published.len(), 1);

    h.deliver(Event::PublishOutcome(Ok(())));
    assert!(!h.service.snapshot().pending_metadata);
}

#[test]
fn disconnect_between_ticks_suppresses_reporting() {
    let mut h = Harness::started();
    let inside = h.inside_addr();
    h.link_up();
    h.run_to(1);
    h.deliver(Event::PublishOutcome(Ok(())));
    let published = h.hw.published.len();

    h.deliver(Event::Link(thermogate::events::LinkEvent::Disconnected));
    // A large delta arrives while the link is down.
    h.advertise(&inside, "den", 3000, -50);
    h.next_report_tick();
    assert_eq!(h.hw.published.len(), published, "gate must win over the delta");
}

#[test]
fn report_carries_current_labels_and_rssi() {
    let mut h = Harness::started();
    let inside = h.inside_addr();
    let outside = h.outside_addr();
    h.advertise(&inside, "den", 2153, -48);
    h.advertise(&outside, "yard", -325, -77);
    h.link_up();
    h.run_to(1);

    let doc = &h.hw.published[0];
    assert_eq!(doc.inside.name.as_str(), "den");
    assert!((doc.inside.temperature - 21.53).abs() < 0.001);
    assert_eq!(doc.inside.rssi, -48);
    assert_eq!(doc.outside.name.as_str(), "yard");
    assert!((doc.outside.temperature - (-3.25)).abs() < 0.001);
    assert_eq!(doc.outside.rssi, -77);
}
