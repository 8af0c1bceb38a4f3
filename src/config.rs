//! System configuration parameters
//!
//! All tunable parameters for the thermogate gateway. Values are fixed per
//! deployment; the beacon addresses identify the two tracked transmitters.

use serde::{Deserialize, Serialize};

/// Application version reported once per boot in the first successful report.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    // --- Acquisition duty cycle ---
    /// LISTEN window length (seconds) — radio receiver active.
    pub listen_secs: u32,
    /// REST window length (seconds) — radio receiver off.
    pub rest_secs: u32,

    // --- Reporting ---
    /// Report evaluation period (seconds).
    pub report_interval_secs: u32,
    /// Temperature delta (degrees C) that justifies a report.
    pub temp_threshold_c: f32,

    // --- Connectivity ---
    /// Fixed backoff between reconnect attempts (seconds).
    pub reconnect_backoff_secs: u32,

    // --- Beacon identities ---
    /// Address string of the indoor beacon, as reported by the radio stack.
    pub inside_addr: heapless::String<32>,
    /// Address string of the outdoor beacon.
    pub outside_addr: heapless::String<32>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            // Acquisition: one minute listening, four minutes resting.
            // The receiver dominates power draw, so REST >> LISTEN.
            listen_secs: 60,
            rest_secs: 240,

            // Reporting
            report_interval_secs: 300,
            temp_threshold_c: 0.5,

            // Connectivity
            reconnect_backoff_secs: 30,

            // Beacon identities
            inside_addr: heapless::String::try_from("d6:6f:5e:2f:a3:81 (random)")
                .unwrap_or_default(),
            outside_addr: heapless::String::try_from("f0:49:04:8f:16:e5 (random)")
                .unwrap_or_default(),
        }
    }
}
