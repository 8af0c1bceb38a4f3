//! Unified error types for the thermogate firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform. All variants are `Copy` so they
//! can be passed through the state machines without allocation.
//!
//! Every class here is transient: the owning state machine leaves its state
//! untouched and the next scheduled timer retries. Nothing in this module is
//! fatal, and the core never terminates the process on any of these.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A radio listen-window operation failed.
    Radio(RadioError),
    /// A link connect attempt failed.
    Link(ConnectError),
    /// A report could not be issued or was rejected in flight.
    Transmit(TransmitError),
    /// Peripheral or stack initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Transmit(e) => write!(f, "transmit: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The radio stack refused to start a listen window.
    StartFailed,
    /// The radio stack refused to stop the listen window.
    StopFailed,
    /// The radio stack is not initialised yet.
    NotReady,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFailed => write!(f, "listen start failed"),
            Self::StopFailed => write!(f, "listen stop failed"),
            Self::NotReady => write!(f, "radio stack not ready"),
        }
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// The transport rejected the connect attempt outright.
    AttemptRejected,
    /// No network registration below the session layer.
    NoNetwork,
    /// A session is already established or being established.
    AlreadyConnected,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptRejected => write!(f, "connect attempt rejected"),
            Self::NoNetwork => write!(f, "no network registration"),
            Self::AlreadyConnected => write!(f, "session already up"),
        }
    }
}

impl From<ConnectError> for Error {
    fn from(e: ConnectError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Transmit errors
// ---------------------------------------------------------------------------

/// Failures while issuing a report. Resource exhaustion while encoding the
/// document is folded in here and handled identically to a send failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitError {
    /// The session is not established.
    NotConnected,
    /// The document could not be encoded (out of buffer / allocator).
    Encode,
    /// The transport rejected the publish.
    SendFailed,
}

impl fmt::Display for TransmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "session not connected"),
            Self::Encode => write!(f, "document encoding failed"),
            Self::SendFailed => write!(f, "publish rejected by transport"),
        }
    }
}

impl From<TransmitError> for Error {
    fn from(e: TransmitError) -> Self {
        Self::Transmit(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
