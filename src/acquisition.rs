//! Duty-cycled beacon acquisition.
//!
//! Two-state machine driven by a single one-shot phase timer:
//!
//! ```text
//!  ┌────────┐  both fresh, or LISTEN timer  ┌──────┐
//!  │ LISTEN │──────────────────────────────▶│ REST │
//!  │ rx on  │◀──────────────────────────────│rx off│
//!  └────────┘          REST timer           └──────┘
//! ```
//!
//! The receiver dominates the radio power budget, so LISTEN ends as soon as
//! both tracked sources have reported this window. A radio start/stop
//! failure never moves the machine: the phase timer armed at entry still
//! fires at its originally planned time, bounding worst-case drift.

use core::time::Duration;

use log::{info, warn};

use crate::app::ports::{IndicatorPort, RadioPort, TimerHandle, TimerId, TimerPort};
use crate::beacon::{SourceId, SourceRecords};
use crate::config::GatewayConfig;
use crate::error::RadioError;

/// Acquisition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Radio reception active, freshness being collected.
    Listen,
    /// Radio reception off, waiting out the duty cycle.
    Rest,
}

/// The acquisition cycle state machine.
///
/// Owns the LISTEN-entry reset of the records' window-scoped fields; the
/// records themselves live in the gateway service and are passed into every
/// callback.
pub struct AcquisitionCycle {
    phase: Phase,
    /// Handle of the armed phase-boundary timer. `None` only transiently
    /// while a transition runs.
    phase_timer: Option<TimerHandle>,
    listen: Duration,
    rest: Duration,
}

impl AcquisitionCycle {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            phase: Phase::Listen,
            phase_timer: None,
            listen: Duration::from_secs(u64::from(config.listen_secs)),
            rest: Duration::from_secs(u64::from(config.rest_secs)),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enter LISTEN for the first time. Called once at startup.
    pub fn start(
        &mut self,
        records: &mut SourceRecords,
        hw: &mut (impl RadioPort + IndicatorPort),
        timers: &mut impl TimerPort,
    ) -> Result<(), RadioError> {
        self.enter_listen(records, hw, timers)
    }

    /// Phase-boundary timer expired.
    ///
    /// `handle` is compared against the armed timer so an expiry that was
    /// cancelled after being queued (early exit raced the timer) is ignored.
    pub fn on_phase_timer(
        &mut self,
        handle: TimerHandle,
        records: &mut SourceRecords,
        hw: &mut (impl RadioPort + IndicatorPort),
        timers: &mut impl TimerPort,
    ) -> Result<(), RadioError> {
        if self.phase_timer != Some(handle) {
            return Ok(()); // stale expiry
        }
        self.phase_timer = None;
        match self.phase {
            Phase::Listen => {
                info!("<acq> LISTEN window elapsed");
                self.enter_rest(hw, timers)
            }
            Phase::Rest => self.enter_listen(records, hw, timers),
        }
    }

    /// A source just decoded; end LISTEN early once both are fresh.
    pub fn on_source_fresh(
        &mut self,
        records: &SourceRecords,
        hw: &mut (impl RadioPort + IndicatorPort),
        timers: &mut impl TimerPort,
    ) -> Result<(), RadioError> {
        if self.phase != Phase::Listen || !records.all_fresh() {
            return Ok(());
        }
        info!(
            "<acq> inside ({:.2}) and outside ({:.2}) updated, ending LISTEN early",
            records.inside.temperature, records.outside.temperature
        );
        if let Some(handle) = self.phase_timer.take() {
            timers.cancel(handle);
        }
        self.enter_rest(hw, timers)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------
    //
    // Order matters in both: the phase flip and timer arm happen before the
    // radio call, so a radio failure leaves a fully scheduled phase behind.

    fn enter_listen(
        &mut self,
        records: &mut SourceRecords,
        hw: &mut (impl RadioPort + IndicatorPort),
        timers: &mut impl TimerPort,
    ) -> Result<(), RadioError> {
        self.phase = Phase::Listen;
        records.reset_window();
        hw.set_acquisition_active(true);
        hw.set_source_fresh(SourceId::Inside, false);
        hw.set_source_fresh(SourceId::Outside, false);
        self.phase_timer = Some(timers.schedule_once(TimerId::AcquisitionPhase, self.listen));
        info!("<acq> listening for {}s", self.listen.as_secs());
        hw.start_listening().inspect_err(|e| {
            warn!("<acq> listen start failed ({e}), window timer keeps its schedule");
        })
    }

    fn enter_rest(
        &mut self,
        hw: &mut (impl RadioPort + IndicatorPort),
        timers: &mut impl TimerPort,
    ) -> Result<(), RadioError> {
        self.phase = Phase::Rest;
        hw.set_acquisition_active(false);
        self.phase_timer = Some(timers.schedule_once(TimerId::AcquisitionPhase, self.rest));
        info!("<acq> resting for {}s", self.rest.as_secs());
        hw.stop_listening().inspect_err(|e| {
            warn!("<acq> listen stop failed ({e}), rest timer keeps its schedule");
        })
    }
}
