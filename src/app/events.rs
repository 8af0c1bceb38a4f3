//! Outbound application events.
//!
//! The [`GatewayService`](super::service::GatewayService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, feed a diagnostics
//! characteristic, or record them in a test buffer.

use crate::document::DesiredState;
use crate::error::TransmitError;
use crate::link::LinkState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The gateway service has started.
    Started,

    /// The connectivity supervisor transitioned.
    LinkChanged { from: LinkState, to: LinkState },

    /// A report was handed to the transport; outcome pending.
    ReportIssued {
        inside: f32,
        outside: f32,
        with_metadata: bool,
    },

    /// The transport acknowledged the outstanding report.
    ReportAcknowledged,

    /// A report could not be issued, or was rejected in flight.
    ReportFailed(TransmitError),

    /// The remote side delivered a desired-state document.
    DesiredReceived(DesiredState),
}
