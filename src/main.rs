//! Thermogate Firmware — Main Entry Point
//!
//! Hexagonal architecture over a single cooperative event loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  BleScanAdapter    CloudSessionAdapter   IndicatorLeds         │
//! │  (RadioPort)       (LinkPort+Publisher)  (IndicatorPort)       │
//! │  LogEventSink      MonotonicClock        TimerWheel            │
//! │  (EventSink)       (uptime)              (TimerPort)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            GatewayService (pure logic)                 │    │
//! │  │  Acquisition · Reporting · Connectivity                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Event queue (lock-free SPSC, drained run-to-completion)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use thermogate::adapters::cloud::CloudSessionAdapter;
use thermogate::adapters::log_sink::LogEventSink;
use thermogate::adapters::platform::PlatformAdapter;
use thermogate::adapters::radio::BleScanAdapter;
use thermogate::adapters::time::MonotonicClock;
use thermogate::app::service::GatewayService;
use thermogate::config::{GatewayConfig, APP_VERSION};
use thermogate::drivers::indicator::{IndicatorLeds, InertPin};
use thermogate::events::{drain_events, push_event, Event};
use thermogate::timers::TimerWheel;

/// Loop period. Short enough that timer expiry jitter stays well below the
/// shortest configured period.
const LOOP_PERIOD_MS: u64 = 50;

/// One-shot boot gate: block until the network layer below the session is
/// registered. Everything after this point is non-blocking.
fn wait_network_ready() {
    #[cfg(target_os = "espidf")]
    {
        // Wi-Fi STA bring-up and DHCP settle are owned by the connectivity
        // image; it signals readiness via the netif event loop. Wiring lands
        // together with the transport handles.
    }
    #[cfg(not(target_os = "espidf"))]
    info!("network(sim): registration immediately ready");
}

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    let config = GatewayConfig::default();

    info!("##########################################################");
    info!("Version:             {}", APP_VERSION);
    info!("Inside beacon:       {}", config.inside_addr);
    info!("Outside beacon:      {}", config.outside_addr);
    info!("Listen / rest:       {}s / {}s", config.listen_secs, config.rest_secs);
    info!("Report interval:     {}s", config.report_interval_secs);
    info!("Reconnect backoff:   {}s", config.reconnect_backoff_secs);
    info!("##########################################################");

    // ── 2. Boot gate ──────────────────────────────────────────
    wait_network_ready();

    // ── 3. Construct adapters ─────────────────────────────────
    let clock = MonotonicClock::new();
    let mut wheel = TimerWheel::new();
    let mut sink = LogEventSink::new();
    // LED wiring is board-variant specific; the base image ships without
    // indicator LEDs, hence inert pins.
    let mut platform = PlatformAdapter::new(
        BleScanAdapter::new(&config),
        CloudSessionAdapter::new(),
        IndicatorLeds::new(InertPin, InertPin, InertPin, InertPin, InertPin),
    );

    // ── 4. Start the service ──────────────────────────────────
    let mut service = GatewayService::new(&config);
    service.start(clock.uptime(), &mut platform, &mut wheel, &mut sink);

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    loop {
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(core::time::Duration::from_millis(LOOP_PERIOD_MS));
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(LOOP_PERIOD_MS as u32);

        // Let the adapters raise whatever completed since last iteration.
        platform.poll();

        // Expire due one-shots into the queue...
        let now = clock.uptime();
        wheel.advance(now, |id, handle| {
            push_event(Event::Timer { id, handle });
        });

        // ...and run every pending callback to completion.
        drain_events(|event| {
            service.dispatch(event, now, &mut platform, &mut wheel, &mut sink);
        });
    }
}
