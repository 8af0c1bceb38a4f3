//! Indicator LED driver.
//!
//! Five discrete LEDs mapped onto the core's advisory intents: listen window
//! open, session up, report in flight, and one freshness LED per tracked
//! source. Generic over [`embedded_hal::digital::OutputPin`], so the same
//! driver runs against ESP-IDF pin drivers on-device and inert pins on the
//! host.
//!
//! A failed pin write is logged and dropped: the indicator is advisory and
//! must never push an error back into the core.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::IndicatorPort;
use crate::beacon::SourceId;

pub struct IndicatorLeds<P: OutputPin> {
    acquisition: P,
    link: P,
    report: P,
    inside_fresh: P,
    outside_fresh: P,
}

impl<P: OutputPin> IndicatorLeds<P> {
    pub fn new(acquisition: P, link: P, report: P, inside_fresh: P, outside_fresh: P) -> Self {
        Self {
            acquisition,
            link,
            report,
            inside_fresh,
            outside_fresh,
        }
    }

    fn drive(pin: &mut P, on: bool) {
        let result = if on { pin.set_high() } else { pin.set_low() };
        if result.is_err() {
            debug!("indicator pin write failed");
        }
    }
}

impl<P: OutputPin> IndicatorPort for IndicatorLeds<P> {
    fn set_acquisition_active(&mut self, on: bool) {
        Self::drive(&mut self.acquisition, on);
    }

    fn set_link_active(&mut self, on: bool) {
        Self::drive(&mut self.link, on);
    }

    fn set_report_in_flight(&mut self, on: bool) {
        Self::drive(&mut self.report, on);
    }

    fn set_source_fresh(&mut self, source: SourceId, on: bool) {
        match source {
            SourceId::Inside => Self::drive(&mut self.inside_fresh, on),
            SourceId::Outside => Self::drive(&mut self.outside_fresh, on),
        }
    }
}

// ---------------------------------------------------------------------------
// Inert pin — stand-in where no LED is wired (host simulation, stripped-down
// board variants).
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct InertPin;

impl embedded_hal::digital::ErrorType for InertPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for InertPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
