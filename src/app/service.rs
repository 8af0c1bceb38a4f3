//! Gateway service — the hexagonal core.
//!
//! [`GatewayService`] owns the shared state (the two sensor records, the
//! acknowledged snapshot, the connectivity state) and the three cooperating
//! state machines that mutate it. Every callback from the loop re-enters
//! here with the ports it needs passed by `&mut` — single-writer-per-field
//! discipline with run-to-completion semantics, no locks.
//!
//! ```text
//!  RadioPort ──▶ ┌──────────────────────────────┐ ──▶ PublisherPort
//!                │        GatewayService        │
//!  LinkPort  ──▶ │ Acquisition · Report · Link  │ ──▶ IndicatorPort
//!                └──────────────────────────────┘ ──▶ EventSink
//! ```

use core::time::Duration;

use log::{debug, info, warn};

use crate::acquisition::{AcquisitionCycle, Phase};
use crate::beacon::{BeaconDecoder, SourceRecords};
use crate::config::GatewayConfig;
use crate::document::{self, DesiredState};
use crate::events::{Event, LinkEvent};
use crate::link::{ConnectivitySupervisor, LinkState};
use crate::reporting::{ReportScheduler, ReportedSnapshot};

use super::events::AppEvent;
use super::ports::{
    EventSink, IndicatorPort, LinkPort, PublisherPort, RadioPort, TimerId, TimerPort,
};

/// Everything the service drives on the platform side, satisfied by one
/// aggregate adapter (or one mock in tests).
pub trait PlatformPorts: RadioPort + PublisherPort + LinkPort + IndicatorPort {}

impl<T: RadioPort + PublisherPort + LinkPort + IndicatorPort> PlatformPorts for T {}

// ───────────────────────────────────────────────────────────────
// GatewayService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrating all domain logic.
pub struct GatewayService {
    records: SourceRecords,
    snapshot: ReportedSnapshot,
    decoder: BeaconDecoder,
    acquisition: AcquisitionCycle,
    reporter: ReportScheduler,
    link: ConnectivitySupervisor,
    /// Latest desired-state document from the remote side, if any.
    desired: Option<DesiredState>,
}

impl GatewayService {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            records: SourceRecords::new(),
            snapshot: ReportedSnapshot::new(),
            decoder: BeaconDecoder::new(config),
            acquisition: AcquisitionCycle::new(config),
            reporter: ReportScheduler::new(config),
            link: ConnectivitySupervisor::new(config),
            desired: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the first LISTEN window, arm the report cadence, and start the
    /// initial connect attempt. Called once, before the loop runs.
    pub fn start(
        &mut self,
        now: Duration,
        hw: &mut impl PlatformPorts,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Started);
        if let Err(e) = self.acquisition.start(&mut self.records, &mut *hw, &mut *timers) {
            warn!("<acq> startup: {e}");
        }
        self.reporter.start(&mut *timers);
        self.link.start(now, hw, timers, sink);
        info!("gateway service started");
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Run one callback to completion. `now` is the loop's monotonic uptime.
    pub fn dispatch(
        &mut self,
        event: Event,
        now: Duration,
        hw: &mut impl PlatformPorts,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::Timer { id, handle } => match id {
                TimerId::AcquisitionPhase => {
                    if let Err(e) =
                        self.acquisition
                            .on_phase_timer(handle, &mut self.records, hw, timers)
                    {
                        warn!("<acq> phase transition: {e}");
                    }
                }
                TimerId::ReportTick => {
                    self.reporter.on_tick(
                        handle,
                        &self.records,
                        &self.snapshot,
                        self.link.is_connected(),
                        hw,
                        timers,
                        sink,
                    );
                }
                TimerId::Reconnect => {
                    self.link.on_reconnect_timer(handle, now, hw, timers, sink);
                }
            },

            Event::Advertisement { sender, rssi, data } => {
                if let Some(source) = self.decoder.decode(&mut self.records, &sender, rssi, &data)
                {
                    hw.set_source_fresh(source, self.records.get(source).fresh);
                    if let Err(e) = self.acquisition.on_source_fresh(&self.records, hw, timers) {
                        warn!("<acq> early exit: {e}");
                    }
                }
            }

            Event::Link(link_event) => {
                if link_event == LinkEvent::SessionReady {
                    // Boot metadata should go out without waiting a full
                    // report period.
                    self.reporter.request_immediate(&mut *timers);
                }
                self.link.on_link_event(link_event, now, hw, timers, sink);
            }

            Event::PublishOutcome(outcome) => {
                self.reporter
                    .on_publish_outcome(outcome, &mut self.snapshot, hw, sink);
            }

            Event::DocumentReceived(text) => self.on_document(&text, sink),
        }
    }

    // ── Queries (used by adapters and tests) ──────────────────

    pub fn records(&self) -> &SourceRecords {
        &self.records
    }

    pub fn snapshot(&self) -> &ReportedSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> Phase {
        self.acquisition.phase()
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn report_in_flight(&self) -> bool {
        self.reporter.in_flight()
    }

    pub fn desired(&self) -> Option<&DesiredState> {
        self.desired.as_ref()
    }

    // ── Internal ──────────────────────────────────────────────

    fn on_document(&mut self, text: &str, sink: &mut impl EventSink) {
        match document::parse_desired(text) {
            Ok(Some(state)) => {
                info!("<doc> desired state received: {state:?}");
                self.desired = Some(state);
                sink.emit(&AppEvent::DesiredReceived(state));
            }
            Ok(None) => debug!("<doc> document carries no state object"),
            Err(e) => warn!("<doc> could not decode document: {e}"),
        }
    }
}
