//! Report and desired-state documents.
//!
//! The remote side speaks a JSON state-synchronization dialect: outbound
//! reports carry a `state.reported` object, inbound deltas carry a `state`
//! object with the fields the remote wants changed. The core only builds and
//! consumes the typed documents here; the session adapter owns the wire
//! encoding.

use serde::{Deserialize, Serialize};

use crate::beacon::{SensorRecord, SourceRecords};
use crate::error::TransmitError;

// ---------------------------------------------------------------------------
// Outbound report
// ---------------------------------------------------------------------------

/// One source's contribution to a report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceReport {
    pub name: heapless::String<16>,
    pub temperature: f32,
    pub rssi: i8,
}

impl SourceReport {
    fn from_record(record: &SensorRecord) -> Self {
        Self {
            name: record.label.clone(),
            temperature: record.temperature,
            rssi: record.signal_strength,
        }
    }
}

/// The document handed to the publisher port. `app_version` is present only
/// on the one-shot metadata report after boot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportDocument {
    #[serde(rename = "appVersion", skip_serializing_if = "Option::is_none")]
    pub app_version: Option<&'static str>,
    pub inside: SourceReport,
    pub outside: SourceReport,
}

impl ReportDocument {
    /// Capture the current records into a report.
    pub fn from_records(records: &SourceRecords, app_version: Option<&'static str>) -> Self {
        Self {
            app_version,
            inside: SourceReport::from_record(&records.inside),
            outside: SourceReport::from_record(&records.outside),
        }
    }
}

// Wire wrappers: { "state": { "reported": { ... } } }

#[derive(Serialize)]
struct WireReport<'a> {
    state: WireReportState<'a>,
}

#[derive(Serialize)]
struct WireReportState<'a> {
    reported: &'a ReportDocument,
}

/// Encode a report for the session transport. An encoding failure is
/// resource exhaustion and is handled like any other failed attempt.
pub fn to_wire_json(document: &ReportDocument) -> Result<String, TransmitError> {
    serde_json::to_string(&WireReport {
        state: WireReportState { reported: document },
    })
    .map_err(|_| TransmitError::Encode)
}

// ---------------------------------------------------------------------------
// Inbound desired state
// ---------------------------------------------------------------------------

/// Fields the remote side may ask the gateway to change. All optional; the
/// core retains the latest copy.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct DesiredState {
    #[serde(default, rename = "reportIntervalSecs")]
    pub report_interval_secs: Option<u32>,
    #[serde(default, rename = "tempThresholdC")]
    pub temp_threshold_c: Option<f32>,
}

#[derive(Deserialize)]
struct WireDelta {
    #[serde(default)]
    state: Option<DesiredState>,
}

/// Parse an inbound delta document. `Ok(None)` when the document is valid
/// JSON but carries no `state` object.
pub fn parse_desired(text: &str) -> Result<Option<DesiredState>, serde_json::Error> {
    serde_json::from_str::<WireDelta>(text).map(|d| d.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::APP_VERSION;

    fn records_with(inside: f32, outside: f32) -> SourceRecords {
        let mut r = SourceRecords::new();
        r.inside.temperature = inside;
        r.inside.label = heapless::String::try_from("den").unwrap();
        r.inside.signal_strength = -48;
        r.outside.temperature = outside;
        r.outside.signal_strength = -77;
        r
    }

    #[test]
    fn wire_shape_without_metadata() {
        let doc = ReportDocument::from_records(&records_with(21.5, 3.25), None);
        let json = to_wire_json(&doc).unwrap();
        assert!(json.starts_with(r#"{"state":{"reported":{"#));
        assert!(!json.contains("appVersion"));
        assert!(json.contains(r#""name":"den""#));
        assert!(json.contains(r#""temperature":21.5"#));
        assert!(json.contains(r#""rssi":-48"#));
    }

    #[test]
    fn wire_shape_with_metadata() {
        let doc = ReportDocument::from_records(&records_with(21.5, 3.25), Some(APP_VERSION));
        let json = to_wire_json(&doc).unwrap();
        assert!(json.contains(&format!(r#""appVersion":"{APP_VERSION}""#)));
    }

    #[test]
    fn sentinel_values_serialize_as_is() {
        let doc = ReportDocument::from_records(&SourceRecords::new(), None);
        let json = to_wire_json(&doc).unwrap();
        assert!(json.contains("-127"), "never-observed sentinel goes out verbatim");
    }

    #[test]
    fn parse_desired_full() {
        let d = parse_desired(r#"{"state":{"reportIntervalSecs":120,"tempThresholdC":1.0}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(d.report_interval_secs, Some(120));
        assert_eq!(d.temp_threshold_c, Some(1.0));
    }

    #[test]
    fn parse_desired_empty_state() {
        let d = parse_desired(r#"{"state":{}}"#).unwrap().unwrap();
        assert_eq!(d, DesiredState::default());
    }

    #[test]
    fn parse_desired_no_state() {
        assert_eq!(parse_desired(r#"{"version":4}"#).unwrap(), None);
    }

    #[test]
    fn parse_desired_malformed() {
        assert!(parse_desired("{not json").is_err());
    }
}
