//! Platform aggregation adapter.
//!
//! The gateway service takes one object satisfying every platform-side port
//! (avoiding multiple mutable borrows at the dispatch boundary). This
//! adapter owns the concrete radio, session, and indicator adapters and
//! delegates each port to the right one.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{IndicatorPort, LinkPort, PublisherPort, RadioPort};
use crate::beacon::SourceId;
use crate::document::ReportDocument;
use crate::drivers::indicator::IndicatorLeds;
use crate::error::{ConnectError, RadioError, TransmitError};

use super::cloud::CloudSessionAdapter;
use super::radio::BleScanAdapter;

pub struct PlatformAdapter<P: OutputPin> {
    pub radio: BleScanAdapter,
    pub cloud: CloudSessionAdapter,
    pub indicator: IndicatorLeds<P>,
}

impl<P: OutputPin> PlatformAdapter<P> {
    pub fn new(
        radio: BleScanAdapter,
        cloud: CloudSessionAdapter,
        indicator: IndicatorLeds<P>,
    ) -> Self {
        Self {
            radio,
            cloud,
            indicator,
        }
    }

    /// Give the adapters their per-iteration slice of the loop.
    pub fn poll(&mut self) {
        self.radio.poll();
        self.cloud.poll();
    }
}

impl<P: OutputPin> RadioPort for PlatformAdapter<P> {
    fn start_listening(&mut self) -> Result<(), RadioError> {
        self.radio.start_listening()
    }

    fn stop_listening(&mut self) -> Result<(), RadioError> {
        self.radio.stop_listening()
    }
}

impl<P: OutputPin> PublisherPort for PlatformAdapter<P> {
    fn publish(&mut self, document: &ReportDocument) -> Result<(), TransmitError> {
        self.cloud.publish(document)
    }
}

impl<P: OutputPin> LinkPort for PlatformAdapter<P> {
    fn connect(&mut self) -> Result<(), ConnectError> {
        self.cloud.connect()
    }
}

impl<P: OutputPin> IndicatorPort for PlatformAdapter<P> {
    fn set_acquisition_active(&mut self, on: bool) {
        self.indicator.set_acquisition_active(on);
    }

    fn set_link_active(&mut self, on: bool) {
        self.indicator.set_link_active(on);
    }

    fn set_report_in_flight(&mut self, on: bool) {
        self.indicator.set_report_in_flight(on);
    }

    fn set_source_fresh(&mut self, source: SourceId, on: bool) {
        self.indicator.set_source_fresh(source, on);
    }
}
