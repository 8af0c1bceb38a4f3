//! Monotonic time adapter.
//!
//! The loop stamps every dispatch with an uptime from here; the timer wheel
//! and the connectivity supervisor's transition times all use it.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` (microsecond
//!   precision, monotonic).
//! - **`not(target_os = "espidf")`** — `std::time::Instant` for host-side
//!   simulation and tests.

use core::time::Duration;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Uptime since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime(&self) -> Duration {
        Duration::from_micros((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64)
    }

    /// Uptime since adapter construction (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}
