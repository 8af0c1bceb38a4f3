//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART / USB-CDC in production). A future telemetry adapter would
//! implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | gateway service up"),
            AppEvent::LinkChanged { from, to } => {
                info!("LINK  | {} -> {}", from.name(), to.name());
            }
            AppEvent::ReportIssued {
                inside,
                outside,
                with_metadata,
            } => {
                info!(
                    "REPORT| issued inside={:.2} outside={:.2} metadata={}",
                    inside, outside, with_metadata
                );
            }
            AppEvent::ReportAcknowledged => info!("REPORT| acknowledged"),
            AppEvent::ReportFailed(e) => info!("REPORT| failed: {}", e),
            AppEvent::DesiredReceived(state) => info!("DOC   | desired: {:?}", state),
        }
    }
}
