//! Connectivity supervision.
//!
//! ```text
//!               connect attempt            link established
//!  DISCONNECTED ──────────────▶ CONNECTING ───────────────▶ CONNECTED
//!       ▲                           │                           │
//!       │      attempt failed       │                           │
//!       ├───────────────────────────┘         link lost         │
//!       └───────────────────────────────────────────────────────┘
//! ```
//!
//! While disconnected, exactly one reconnect attempt is armed at the fixed
//! backoff — attempts are never retried faster, bounding reconnect storms.
//! Each attempt re-arms on its own failure path, so the machine heals
//! without external supervision. Reaching CONNECTED cancels the pending
//! reconnect (cancelling an unarmed timer is a no-op).

use core::time::Duration;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, IndicatorPort, LinkPort, TimerHandle, TimerId, TimerPort};
use crate::config::GatewayConfig;
use crate::events::LinkEvent;

/// Session connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
        }
    }
}

/// The connectivity supervisor state machine.
pub struct ConnectivitySupervisor {
    state: LinkState,
    /// Uptime of the last state transition.
    since: Duration,
    backoff: Duration,
    reconnect_timer: Option<TimerHandle>,
}

impl ConnectivitySupervisor {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            state: LinkState::Disconnected,
            since: Duration::ZERO,
            backoff: Duration::from_secs(u64::from(config.reconnect_backoff_secs)),
            reconnect_timer: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Uptime at which the current state was entered.
    pub fn last_transition(&self) -> Duration {
        self.since
    }

    /// Kick off the initial connect attempt. Called once at startup.
    pub fn start(
        &mut self,
        now: Duration,
        hw: &mut (impl LinkPort + IndicatorPort),
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        self.attempt_connect(now, hw, timers, sink);
    }

    /// A link transition reported by the session transport.
    pub fn on_link_event(
        &mut self,
        event: LinkEvent,
        now: Duration,
        hw: &mut (impl LinkPort + IndicatorPort),
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        match event {
            LinkEvent::Connecting => {
                // Transport-initiated progress note; align if we were idle.
                if self.state == LinkState::Disconnected {
                    self.set_state(LinkState::Connecting, now, sink);
                }
            }
            LinkEvent::Connected => {
                if let Some(handle) = self.reconnect_timer.take() {
                    timers.cancel(handle);
                }
                self.set_state(LinkState::Connected, now, sink);
                hw.set_link_active(true);
            }
            LinkEvent::SessionReady => {
                // Reporting reacts to this; no state change here.
                info!("<link> session ready");
            }
            LinkEvent::Disconnected | LinkEvent::ConnectFailed => {
                hw.set_link_active(false);
                self.set_state(LinkState::Disconnected, now, sink);
                self.arm_reconnect(timers);
            }
        }
    }

    /// Reconnect backoff expired.
    pub fn on_reconnect_timer(
        &mut self,
        handle: TimerHandle,
        now: Duration,
        hw: &mut (impl LinkPort + IndicatorPort),
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        if self.reconnect_timer != Some(handle) {
            return; // stale expiry
        }
        self.reconnect_timer = None;
        if self.state == LinkState::Disconnected {
            self.attempt_connect(now, hw, timers, sink);
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn attempt_connect(
        &mut self,
        now: Duration,
        hw: &mut (impl LinkPort + IndicatorPort),
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        self.set_state(LinkState::Connecting, now, sink);
        if let Err(e) = hw.connect() {
            warn!("<link> connect attempt failed: {e}");
            self.set_state(LinkState::Disconnected, now, sink);
            self.arm_reconnect(timers);
        }
    }

    /// Arm the single reconnect attempt, never faster than the backoff.
    fn arm_reconnect(&mut self, timers: &mut impl TimerPort) {
        if self.reconnect_timer.is_some() {
            return;
        }
        info!("<link> reconnecting in {}s", self.backoff.as_secs());
        self.reconnect_timer = Some(timers.schedule_once(TimerId::Reconnect, self.backoff));
    }

    fn set_state(&mut self, next: LinkState, now: Duration, sink: &mut impl EventSink) {
        if next == self.state {
            return;
        }
        info!("<link> {} -> {}", self.state.name(), next.name());
        sink.emit(&AppEvent::LinkChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
        self.since = now;
    }
}
