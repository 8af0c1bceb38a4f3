//! Thermogate firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod acquisition;
pub mod app;
pub mod beacon;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod link;
pub mod reporting;
pub mod timers;

// Platform adapters and the indicator driver; implementations are gated by
// target inside each module.
pub mod adapters;
pub mod drivers;
