//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GatewayService (domain)
//! ```
//!
//! Driven adapters (radio scanner, cloud session, timers, indicator LEDs)
//! implement these traits. The [`GatewayService`](super::service::GatewayService)
//! consumes them via generics at call sites, so the domain core never touches
//! hardware directly and the whole core runs under host tests with mocks.
//!
//! Completion of asynchronous operations (a received advertisement, a publish
//! outcome, a link transition) never comes back through these traits — it
//! re-enters the single-threaded loop as an [`Event`](crate::events::Event).

use core::time::Duration;

use crate::beacon::SourceId;
use crate::document::ReportDocument;
use crate::error::{ConnectError, RadioError, TransmitError};

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → scanner)
// ───────────────────────────────────────────────────────────────

/// Controls the advertisement receiver. Address filtering and payload
/// reassembly happen below this boundary; received advertisements arrive as
/// [`Event::Advertisement`](crate::events::Event) values.
pub trait RadioPort {
    /// Open a listen window. Idempotency is not required of implementations;
    /// the acquisition cycle calls this exactly once per LISTEN entry.
    fn start_listening(&mut self) -> Result<(), RadioError>;

    /// Close the listen window.
    fn stop_listening(&mut self) -> Result<(), RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Publisher port (driven adapter: domain → cloud session)
// ───────────────────────────────────────────────────────────────

/// Issues a state report to the remote side. The call must not block on
/// transmission: `Ok(())` means "accepted for transmit", and the definitive
/// outcome arrives later as [`Event::PublishOutcome`](crate::events::Event).
/// An immediate `Err` counts as a failed attempt.
pub trait PublisherPort {
    fn publish(&mut self, document: &ReportDocument) -> Result<(), TransmitError>;
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain → session transport)
// ───────────────────────────────────────────────────────────────

/// Starts a session connect attempt. Progress and failure arrive as
/// [`Event::Link`](crate::events::Event) transitions; an immediate `Err`
/// means the attempt never left the station.
pub trait LinkPort {
    fn connect(&mut self) -> Result<(), ConnectError>;
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → timer service)
// ───────────────────────────────────────────────────────────────

/// Identifies which state machine a one-shot timer belongs to. Expiry is
/// delivered as [`Event::Timer`](crate::events::Event) carrying this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Acquisition phase boundary (end of LISTEN or REST).
    AcquisitionPhase,
    /// Report evaluation tick.
    ReportTick,
    /// Reconnect backoff expiry.
    Reconnect,
}

/// Opaque handle to an armed timer. Handles are generation-checked:
/// cancelling a handle whose timer already fired, or that was never armed,
/// is a safe no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub(crate) slot: u8,
    pub(crate) generation: u32,
}

impl TimerHandle {
    /// A handle that refers to nothing. Cancelling it is a no-op.
    pub const fn dead() -> Self {
        Self {
            slot: u8::MAX,
            generation: 0,
        }
    }
}

/// One-shot timer service with cancel-and-rearm semantics.
pub trait TimerPort {
    /// Arm a one-shot timer firing `after` from now. A `Duration::ZERO`
    /// delay fires on the next service poll, not recursively.
    fn schedule_once(&mut self, id: TimerId, after: Duration) -> TimerHandle;

    /// Disarm a timer. Must tolerate already-fired and never-armed handles.
    fn cancel(&mut self, handle: TimerHandle);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs, fire-and-forget)
// ───────────────────────────────────────────────────────────────

/// Boolean on/off intents for the visual indicator. Advisory only: the
/// signatures are infallible so no adapter failure can propagate back into
/// the core.
pub trait IndicatorPort {
    /// Acquisition LISTEN window open.
    fn set_acquisition_active(&mut self, on: bool);

    /// Session with the remote side established.
    fn set_link_active(&mut self, on: bool);

    /// A report has been issued and its outcome is pending.
    fn set_report_in_flight(&mut self, on: bool);

    /// The given source reported within the current LISTEN window.
    fn set_source_fresh(&mut self, source: SourceId, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, cloud
/// telemetry, a test buffer).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
