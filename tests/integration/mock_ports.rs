//! Mock platform adapter and test harness for integration tests.
//!
//! Records every port call so tests can assert on the full interaction
//! history without real radio, session, or GPIO backends. The harness runs
//! the same advance-then-dispatch sequence as the production loop, minus the
//! global queue (events are dispatched directly).

use core::time::Duration;

use thermogate::app::events::AppEvent;
use thermogate::app::ports::{EventSink, IndicatorPort, LinkPort, PublisherPort, RadioPort};
use thermogate::app::service::GatewayService;
use thermogate::beacon::SourceId;
use thermogate::config::GatewayConfig;
use thermogate::document::ReportDocument;
use thermogate::error::{ConnectError, RadioError, TransmitError};
use thermogate::events::{Event, LinkEvent};
use thermogate::timers::TimerWheel;

// ── MockPlatform ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockPlatform {
    pub listening: bool,
    pub starts: u32,
    pub stops: u32,
    pub fail_start: bool,
    pub published: Vec<ReportDocument>,
    pub fail_publish: bool,
    pub connects: u32,
    pub fail_connect: bool,
    pub acquisition_led: bool,
    pub link_led: bool,
    pub report_led: bool,
    pub fresh_led: [bool; 2],
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RadioPort for MockPlatform {
    fn start_listening(&mut self) -> Result<(), RadioError> {
        self.starts += 1;
        if self.fail_start {
            return Err(RadioError::StartFailed);
        }
        self.listening = true;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), RadioError> {
        self.stops += 1;
        self.listening = false;
        Ok(())
    }
}

impl PublisherPort for MockPlatform {
    fn publish(&mut self, document: &ReportDocument) -> Result<(), TransmitError> {
        if self.fail_publish {
            return Err(TransmitError::SendFailed);
        }
        self.published.push(document.clone());
        Ok(())
    }
}

impl LinkPort for MockPlatform {
    fn connect(&mut self) -> Result<(), ConnectError> {
        self.connects += 1;
        if self.fail_connect {
            return Err(ConnectError::AttemptRejected);
        }
        Ok(())
    }
}

impl IndicatorPort for MockPlatform {
    fn set_acquisition_active(&mut self, on: bool) {
        self.acquisition_led = on;
    }

    fn set_link_active(&mut self, on: bool) {
        self.link_led = on;
    }

    fn set_report_in_flight(&mut self, on: bool) {
        self.report_led = on;
    }

    fn set_source_fresh(&mut self, source: SourceId, on: bool) {
        self.fresh_led[matches!(source, SourceId::Outside) as usize] = on;
    }
}

// ── VecSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Drives a [`GatewayService`] the way the production loop does: advance the
/// wheel to an uptime, dispatch every expiry, repeat until quiescent.
pub struct Harness {
    pub config: GatewayConfig,
    pub service: GatewayService,
    pub wheel: TimerWheel,
    pub hw: MockPlatform,
    pub sink: VecSink,
    pub now: Duration,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        let config = GatewayConfig::default();
        Self {
            service: GatewayService::new(&config),
            config,
            wheel: TimerWheel::new(),
            hw: MockPlatform::new(),
            sink: VecSink::default(),
            now: Duration::ZERO,
        }
    }

    /// Construct and start the service at uptime zero.
    pub fn started() -> Self {
        let mut h = Self::new();
        h.service
            .start(h.now, &mut h.hw, &mut h.wheel, &mut h.sink);
        h
    }

    /// Dispatch one event at the current uptime.
    pub fn deliver(&mut self, event: Event) {
        self.service
            .dispatch(event, self.now, &mut self.hw, &mut self.wheel, &mut self.sink);
    }

    /// Advance uptime to `secs`, expiring and dispatching timers until no
    /// further expiry is due (handlers may arm zero-delay timers).
    pub fn run_to(&mut self, secs: u64) {
        self.now = Duration::from_secs(secs);
        loop {
            let mut fired = Vec::new();
            self.wheel.advance(self.now, |id, handle| fired.push((id, handle)));
            if fired.is_empty() {
                return;
            }
            for (id, handle) in fired {
                self.deliver(Event::Timer { id, handle });
            }
        }
    }

    /// Bring the session up: connected plus ready, as the transport reports.
    pub fn link_up(&mut self) {
        self.deliver(Event::Link(LinkEvent::Connected));
        self.deliver(Event::Link(LinkEvent::SessionReady));
    }

    /// Deliver an advertisement carrying a name and a centidegree reading.
    pub fn advertise(&mut self, addr: &heapless::String<32>, name: &str, centi: i16, rssi: i8) {
        let mut data = heapless::Vec::new();
        data.push(name.len() as u8 + 1).unwrap();
        data.push(0x09).unwrap();
        data.extend_from_slice(name.as_bytes()).unwrap();
        let t = centi.to_le_bytes();
        data.extend_from_slice(&[5, 0x16, 0x6e, 0x2a, t[0], t[1]]).unwrap();
        self.deliver(Event::Advertisement {
            sender: addr.clone(),
            rssi,
            data,
        });
    }

    /// Shorthand for the two tracked identities.
    pub fn inside_addr(&self) -> heapless::String<32> {
        self.config.inside_addr.clone()
    }

    pub fn outside_addr(&self) -> heapless::String<32> {
        self.config.outside_addr.clone()
    }

    /// Number of currently armed timers.
    pub fn armed(&self) -> usize {
        self.wheel.armed_count()
    }

    /// Report ticks land every `report_interval_secs`; expire the next one.
    pub fn next_report_tick(&mut self) {
        let next = self.now.as_secs() + u64::from(self.config.report_interval_secs);
        self.run_to(next);
    }
}
