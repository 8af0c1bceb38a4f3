//! Connectivity supervision through the full service dispatch path.

use crate::mock_ports::Harness;
use thermogate::events::{Event, LinkEvent};
use thermogate::link::LinkState;

#[test]
fn startup_attempts_connect_once() {
    let h = Harness::started();
    assert_eq!(h.service.link_state(), LinkState::Connecting);
    assert_eq!(h.hw.connects, 1);
}

#[test]
fn connected_event_lights_the_link() {
    let mut h = Harness::started();
    h.deliver(Event::Link(LinkEvent::Connected));
    assert_eq!(h.service.link_state(), LinkState::Connected);
    assert!(h.hw.link_led);
}

#[test]
fn link_lost_schedules_one_bounded_reconnect() {
    let mut h = Harness::started();
    h.deliver(Event::Link(LinkEvent::Connected));

    h.run_to(100);
    h.deliver(Event::Link(LinkEvent::Disconnected));
    assert_eq!(h.service.link_state(), LinkState::Disconnected);
    assert!(!h.hw.link_led);

    // Duplicate loss reports must not stack extra attempts.
    h.deliver(Event::Link(LinkEvent::Disconnected));

    // Backoff is 30 s: nothing fires before it elapses.
    h.run_to(129);
    assert_eq!(h.hw.connects, 1);
    h.run_to(130);
    assert_eq!(h.hw.connects, 2);
    assert_eq!(h.service.link_state(), LinkState::Connecting);
}

#[test]
fn reconnect_cancelled_if_session_returns_first() {
    let mut h = Harness::started();
    h.deliver(Event::Link(LinkEvent::Connected));
    h.run_to(100);
    h.deliver(Event::Link(LinkEvent::Disconnected));

    // The transport recovers on its own before the backoff expires.
    h.run_to(110);
    h.deliver(Event::Link(LinkEvent::Connected));

    h.run_to(1000);
    assert_eq!(h.hw.connects, 1, "cancelled reconnect must never fire");
    assert_eq!(h.service.link_state(), LinkState::Connected);
}

#[test]
fn rejected_connect_attempt_self_heals() {
    let mut h = Harness::new();
    h.hw.fail_connect = true;
    h.service
        .start(h.now, &mut h.hw, &mut h.wheel, &mut h.sink);
    assert_eq!(h.service.link_state(), LinkState::Disconnected);
    assert_eq!(h.hw.connects, 1);

    // Each failed attempt re-arms the next one at the fixed backoff.
    h.run_to(30);
    assert_eq!(h.hw.connects, 2);
    h.run_to(60);
    assert_eq!(h.hw.connects, 3);

    h.hw.fail_connect = false;
    h.run_to(90);
    assert_eq!(h.hw.connects, 4);
    assert_eq!(h.service.link_state(), LinkState::Connecting);
    h.deliver(Event::Link(LinkEvent::Connected));
    assert_eq!(h.service.link_state(), LinkState::Connected);
}

#[test]
fn connect_failed_event_during_attempt() {
    let mut h = Harness::started();
    assert_eq!(h.service.link_state(), LinkState::Connecting);
    h.deliver(Event::Link(LinkEvent::ConnectFailed));
    assert_eq!(h.service.link_state(), LinkState::Disconnected);

    h.run_to(30);
    assert_eq!(h.hw.connects, 2, "backoff retry after reported failure");
}

#[test]
fn transition_times_are_recorded() {
    let mut h = Harness::started();
    h.run_to(7);
    h.deliver(Event::Link(LinkEvent::Connected));
    // The supervisor's transition stamp is surfaced through AppEvents; the
    // sink saw DISCONNECTED->CONNECTING then CONNECTING->CONNECTED.
    let changes: Vec<_> = h
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            thermogate::app::events::AppEvent::LinkChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (LinkState::Disconnected, LinkState::Connecting),
            (LinkState::Connecting, LinkState::Connected),
        ]
    );
}
