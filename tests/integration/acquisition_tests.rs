//! Acquisition cycle behaviour through the full service dispatch path.

use crate::mock_ports::Harness;
use thermogate::acquisition::Phase;

#[test]
fn freshness_resets_on_every_listen_entry() {
    let mut h = Harness::started();
    assert_eq!(h.service.phase(), Phase::Listen);

    let inside = h.inside_addr();
    h.advertise(&inside, "den", 2100, -50);
    assert!(h.service.records().inside.fresh);

    // LISTEN elapses with only one fresh source; REST follows, then the next
    // LISTEN entry must clear freshness again.
    h.run_to(60);
    assert_eq!(h.service.phase(), Phase::Rest);
    h.run_to(300);
    assert_eq!(h.service.phase(), Phase::Listen);
    assert!(!h.service.records().inside.fresh);
    assert!(!h.service.records().outside.fresh);
    assert_eq!(h.service.records().inside.signal_strength, -140);
    // Last known reading survives the reset.
    assert!((h.service.records().inside.temperature - 21.0).abs() < 0.001);
}

#[test]
fn early_exit_once_both_sources_report() {
    let mut h = Harness::started();
    let inside = h.inside_addr();
    let outside = h.outside_addr();

    h.advertise(&inside, "den", 2100, -50);
    assert_eq!(h.service.phase(), Phase::Listen, "one source is not enough");

    h.advertise(&outside, "yard", 450, -70);
    assert_eq!(h.service.phase(), Phase::Rest, "both fresh ends LISTEN now");
    assert_eq!(h.hw.stops, 1);
    assert!(!h.hw.acquisition_led);
}

#[test]
fn early_exit_shortens_but_cycle_resumes_on_schedule() {
    let mut h = Harness::started();
    let inside = h.inside_addr();
    let outside = h.outside_addr();

    h.run_to(5);
    h.advertise(&inside, "den", 2100, -50);
    h.advertise(&outside, "yard", 450, -70);
    assert_eq!(h.service.phase(), Phase::Rest);

    // REST runs its full configured duration from the early exit.
    h.run_to(244);
    assert_eq!(h.service.phase(), Phase::Rest);
    h.run_to(245);
    assert_eq!(h.service.phase(), Phase::Listen);
    assert_eq!(h.hw.starts, 2);
}

#[test]
fn unknown_sender_never_contributes_freshness() {
    let mut h = Harness::started();
    let stranger = heapless::String::try_from("11:22:33:44:55:66 (public)").unwrap();
    h.advertise(&stranger, "rogue", 9900, -30);
    h.advertise(&stranger, "rogue", 9900, -30);
    assert!(!h.service.records().inside.fresh);
    assert!(!h.service.records().outside.fresh);
    assert_eq!(h.service.phase(), Phase::Listen);
}

#[test]
fn scan_start_failure_leaves_cadence_intact() {
    let mut h = Harness::new();
    h.hw.fail_start = true;
    h.service
        .start(h.now, &mut h.hw, &mut h.wheel, &mut h.sink);

    assert_eq!(h.service.phase(), Phase::Listen, "logical phase unaffected");
    assert!(!h.hw.listening);

    // The originally planned boundary still moves the cycle to REST, and
    // the next LISTEN retries the radio.
    h.run_to(60);
    assert_eq!(h.service.phase(), Phase::Rest);
    h.hw.fail_start = false;
    h.run_to(300);
    assert_eq!(h.service.phase(), Phase::Listen);
    assert!(h.hw.listening);
}

#[test]
fn fresh_indicator_follows_decode_and_window() {
    let mut h = Harness::started();
    let inside = h.inside_addr();
    h.advertise(&inside, "den", 2100, -50);
    assert_eq!(h.hw.fresh_led, [true, false]);

    h.run_to(60); // REST
    h.run_to(300); // next LISTEN entry clears the per-source indicators
    assert_eq!(h.hw.fresh_led, [false, false]);
}
