//! Change-gated reporting.
//!
//! A fixed-period tick evaluates whether the current readings differ enough
//! from the last acknowledged snapshot to justify a remote update. The tick
//! re-arms itself before anything else, so no failure path can stall the
//! cadence. Publishing is asynchronous: the issued values are remembered and
//! committed to the snapshot only when the transport acknowledges success,
//! so a failed attempt retries with an equivalent or larger delta.

use core::time::Duration;

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, IndicatorPort, PublisherPort, TimerHandle, TimerId, TimerPort};
use crate::beacon::{SensorRecord, SourceRecords};
use crate::config::{APP_VERSION, GatewayConfig};
use crate::document::ReportDocument;
use crate::error::TransmitError;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The last values the remote side acknowledged.
///
/// Updated if and only if a report attempt is acknowledged successful; a
/// failed attempt leaves it untouched so the next evaluation retries with
/// the same delta.
#[derive(Debug, Clone)]
pub struct ReportedSnapshot {
    pub inside_temperature: f32,
    pub outside_temperature: f32,
    /// One-shot: true until the first successful report of this boot, which
    /// must carry the static version metadata.
    pub pending_metadata: bool,
}

impl ReportedSnapshot {
    pub fn new() -> Self {
        Self {
            inside_temperature: SensorRecord::TEMP_NEVER,
            outside_temperature: SensorRecord::TEMP_NEVER,
            pending_metadata: true,
        }
    }
}

impl Default for ReportedSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Change detector
// ---------------------------------------------------------------------------

/// Pure decision over current records and the snapshot.
///
/// Sentinel temperatures participate in the comparison as-is: there is
/// deliberately no "never observed" special case, so the first valid reading
/// produces a huge delta against the `-127.0` sentinel and forces a report.
pub fn report_needed(records: &SourceRecords, snapshot: &ReportedSnapshot, threshold: f32) -> bool {
    if snapshot.pending_metadata {
        return true;
    }
    (records.inside.temperature - snapshot.inside_temperature).abs() > threshold
        || (records.outside.temperature - snapshot.outside_temperature).abs() > threshold
}

// ---------------------------------------------------------------------------
// Report scheduler
// ---------------------------------------------------------------------------

/// Values captured when a report was issued, committed on acknowledgement.
#[derive(Debug, Clone, Copy)]
struct IssuedReport {
    inside: f32,
    outside: f32,
    metadata_included: bool,
}

/// The fixed-period report evaluation machine.
pub struct ReportScheduler {
    period: Duration,
    threshold: f32,
    tick_timer: Option<TimerHandle>,
    /// At most one report outstanding; its issue-time values live here until
    /// the transport reports an outcome.
    in_flight: Option<IssuedReport>,
}

impl ReportScheduler {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            period: Duration::from_secs(u64::from(config.report_interval_secs)),
            threshold: config.temp_threshold_c,
            tick_timer: None,
            in_flight: None,
        }
    }

    /// Arm the first tick. Called once at startup.
    pub fn start(&mut self, timers: &mut impl TimerPort) {
        self.tick_timer = Some(timers.schedule_once(TimerId::ReportTick, self.period));
    }

    /// Pull the next tick forward to "now" (session just became ready, boot
    /// metadata should go out without waiting a full period).
    pub fn request_immediate(&mut self, timers: &mut impl TimerPort) {
        if let Some(handle) = self.tick_timer.take() {
            timers.cancel(handle);
        }
        self.tick_timer = Some(timers.schedule_once(TimerId::ReportTick, Duration::ZERO));
    }

    /// A report has been issued and its outcome is still pending.
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Evaluation tick.
    pub fn on_tick(
        &mut self,
        handle: TimerHandle,
        records: &SourceRecords,
        snapshot: &ReportedSnapshot,
        link_connected: bool,
        hw: &mut (impl PublisherPort + IndicatorPort),
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        if self.tick_timer != Some(handle) {
            return; // stale expiry
        }
        // Re-arm before anything can bail out; forward progress must not
        // depend on any of the steps below.
        self.tick_timer = Some(timers.schedule_once(TimerId::ReportTick, self.period));

        if !link_connected {
            debug!("<rep> not connected, skipping tick");
            return;
        }
        if self.in_flight.is_some() {
            debug!("<rep> previous report still in flight, skipping tick");
            return;
        }
        if !report_needed(records, snapshot, self.threshold) {
            info!("<rep> no updates to report");
            return;
        }

        let document = ReportDocument::from_records(
            records,
            snapshot.pending_metadata.then_some(APP_VERSION),
        );
        match hw.publish(&document) {
            Ok(()) => {
                self.in_flight = Some(IssuedReport {
                    inside: records.inside.temperature,
                    outside: records.outside.temperature,
                    metadata_included: snapshot.pending_metadata,
                });
                hw.set_report_in_flight(true);
                info!(
                    "<rep> report issued (inside {:.2}, outside {:.2})",
                    records.inside.temperature, records.outside.temperature
                );
                sink.emit(&AppEvent::ReportIssued {
                    inside: records.inside.temperature,
                    outside: records.outside.temperature,
                    with_metadata: snapshot.pending_metadata,
                });
            }
            Err(e) => {
                // Snapshot untouched; the next tick retries the same delta.
                warn!("<rep> publish failed: {e}");
                sink.emit(&AppEvent::ReportFailed(e));
            }
        }
    }

    /// Asynchronous publish outcome from the transport.
    pub fn on_publish_outcome(
        &mut self,
        outcome: Result<(), TransmitError>,
        snapshot: &mut ReportedSnapshot,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        let Some(issued) = self.in_flight.take() else {
            warn!("<rep> publish outcome with no report in flight");
            return;
        };
        hw.set_report_in_flight(false);
        match outcome {
            Ok(()) => {
                snapshot.inside_temperature = issued.inside;
                snapshot.outside_temperature = issued.outside;
                if issued.metadata_included {
                    snapshot.pending_metadata = false;
                }
                info!("<rep> report acknowledged");
                sink.emit(&AppEvent::ReportAcknowledged);
            }
            Err(e) => {
                warn!("<rep> report rejected: {e}");
                sink.emit(&AppEvent::ReportFailed(e));
            }
        }
    }
}
