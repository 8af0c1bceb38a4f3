//! Beacon records and advertisement decoding.
//!
//! Two fixed-identity transmitters are tracked, one indoors and one
//! outdoors. Each broadcasts a short advertisement carrying its name and a
//! 16-bit service-data element with the temperature in centidegrees.
//! [`BeaconDecoder`] matches the sender against the configured identities and
//! folds the decoded fields into the matching [`SensorRecord`].

use log::debug;

use crate::config::GatewayConfig;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Which of the two tracked beacons a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceId {
    Inside,
    Outside,
}

impl SourceId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor record
// ---------------------------------------------------------------------------

/// Latest decoded reading from one beacon.
///
/// `fresh` and `signal_strength` are window-scoped: the acquisition cycle
/// resets them at every LISTEN entry. `label` and `temperature` persist so a
/// one-window dropout does not blank the last known reading downstream.
#[derive(Debug, Clone)]
pub struct SensorRecord {
    /// Name decoded from the advertisement; empty until first decode.
    pub label: heapless::String<16>,
    /// Degrees Celsius. [`SensorRecord::TEMP_NEVER`] until first decode.
    pub temperature: f32,
    /// True once this source decoded during the current LISTEN window.
    pub fresh: bool,
    /// Most recent RSSI in dBm. [`SensorRecord::RSSI_NEVER`] until observed
    /// this window.
    pub signal_strength: i8,
}

impl SensorRecord {
    /// Sentinel temperature: never observed.
    pub const TEMP_NEVER: f32 = -127.0;
    /// Sentinel RSSI: never observed this window.
    pub const RSSI_NEVER: i8 = -140;

    pub fn new() -> Self {
        Self {
            label: heapless::String::new(),
            temperature: Self::TEMP_NEVER,
            fresh: false,
            signal_strength: Self::RSSI_NEVER,
        }
    }

    /// LISTEN-entry reset: clear window-scoped fields only.
    pub fn reset_window(&mut self) {
        self.fresh = false;
        self.signal_strength = Self::RSSI_NEVER;
    }
}

impl Default for SensorRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of tracked records, owned by the gateway service for the process
/// lifetime. Written only by the decoder (on decode) and the acquisition
/// cycle (on window entry); everything else reads.
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    pub inside: SensorRecord,
    pub outside: SensorRecord,
}

impl SourceRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SourceId) -> &SensorRecord {
        match id {
            SourceId::Inside => &self.inside,
            SourceId::Outside => &self.outside,
        }
    }

    fn get_mut(&mut self, id: SourceId) -> &mut SensorRecord {
        match id {
            SourceId::Inside => &mut self.inside,
            SourceId::Outside => &mut self.outside,
        }
    }

    /// Reset both records' window-scoped fields (LISTEN entry).
    pub fn reset_window(&mut self) {
        self.inside.reset_window();
        self.outside.reset_window();
    }

    /// Both sources reported during the current window.
    pub fn all_fresh(&self) -> bool {
        self.inside.fresh && self.outside.fresh
    }
}

// ---------------------------------------------------------------------------
// Advertisement element walk
// ---------------------------------------------------------------------------

/// AD type: Shortened Local Name.
const AD_NAME_SHORTENED: u8 = 0x08;
/// AD type: Complete Local Name.
const AD_NAME_COMPLETE: u8 = 0x09;
/// AD type: Service Data, 16-bit UUID.
const AD_SVC_DATA16: u8 = 0x16;

/// Iterator over the `(length, type, payload)` elements of an advertisement.
///
/// Terminates on a zero length (early-terminator convention) and on any
/// length that runs past the buffer, so arbitrary bytes can never panic or
/// loop the walk.
pub struct AdElements<'a> {
    rest: &'a [u8],
}

impl<'a> AdElements<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for AdElements<'a> {
    /// `(ad_type, payload)`
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, tail) = self.rest.split_first()?;
        let len = len as usize;
        if len == 0 || tail.len() < len {
            self.rest = &[];
            return None;
        }
        let (element, rest) = tail.split_at(len);
        self.rest = rest;
        Some((element[0], &element[1..]))
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Matches advertisements to the two configured identities and updates the
/// corresponding record. Unknown senders and malformed fields are ignored;
/// a decode failure in one element never blocks the others (a label-only
/// frame updates only the label).
pub struct BeaconDecoder {
    inside_addr: heapless::String<32>,
    outside_addr: heapless::String<32>,
}

impl BeaconDecoder {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            inside_addr: config.inside_addr.clone(),
            outside_addr: config.outside_addr.clone(),
        }
    }

    /// Decode one advertisement into `records`.
    ///
    /// Returns the source that was updated, or `None` for unknown senders.
    /// The RSSI is recorded for any matched sender even if no element of the
    /// payload decoded.
    pub fn decode(
        &self,
        records: &mut SourceRecords,
        sender: &str,
        rssi: i8,
        data: &[u8],
    ) -> Option<SourceId> {
        let source = if sender == self.inside_addr.as_str() {
            SourceId::Inside
        } else if sender == self.outside_addr.as_str() {
            SourceId::Outside
        } else {
            return None;
        };

        let record = records.get_mut(source);
        record.signal_strength = rssi;

        for (ad_type, payload) in AdElements::new(data) {
            match ad_type {
                AD_NAME_SHORTENED | AD_NAME_COMPLETE => {
                    // Non-UTF-8 names are dropped per-field.
                    if let Ok(name) = core::str::from_utf8(payload) {
                        record.label.clear();
                        for ch in name.chars() {
                            if record.label.push(ch).is_err() {
                                break;
                            }
                        }
                    }
                }
                AD_SVC_DATA16 => {
                    // [uuid_lo, uuid_hi, temp_lo, temp_hi]: centidegrees,
                    // little-endian, after the 16-bit service UUID.
                    if payload.len() >= 4 {
                        let raw = i16::from_le_bytes([payload[2], payload[3]]);
                        record.temperature = f32::from(raw) / 100.0;
                        record.fresh = true;
                    }
                }
                _ => {}
            }
        }

        debug!(
            "<adv> {} '{}' {:.2}C ({}dBm) fresh={}",
            source.name(),
            record.label,
            record.temperature,
            record.signal_strength,
            record.fresh
        );
        Some(source)
    }
}
