//! Callback-to-loop event channel.
//!
//! Events are produced by:
//! - the radio stack's advertisement callback
//! - the session transport's link/publish callbacks
//! - the timer service (expiry of any armed one-shot)
//!
//! Events are consumed by the main loop, which dispatches them one at a time
//! to the gateway service — run-to-completion, so no handler ever observes a
//! half-mutated sensor record or snapshot.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Radio cb     │────▶│              │     │              │
//! │ Session cb   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Timer expiry │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::app::ports::{TimerHandle, TimerId};
use crate::error::TransmitError;

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// Advertisement payloads are bounded by the legacy advertising PDU.
pub const ADV_DATA_CAP: usize = 31;

/// Inbound documents are bounded; anything longer is truncated at the
/// transport before it reaches the queue.
pub const DOCUMENT_CAP: usize = 512;

/// Link-layer transitions reported by the session transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// A connect attempt is in progress.
    Connecting,
    /// The session is established.
    Connected,
    /// Subscriptions are up; the session is fully usable.
    SessionReady,
    /// The session dropped.
    Disconnected,
    /// A connect attempt failed or timed out.
    ConnectFailed,
}

/// Everything that can re-enter the cooperative loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// An armed one-shot timer expired. The handle lets the owning state
    /// machine discard an expiry that was cancelled after it was queued.
    Timer { id: TimerId, handle: TimerHandle },
    /// One advertisement was received during a listen window.
    Advertisement {
        sender: heapless::String<32>,
        rssi: i8,
        data: heapless::Vec<u8, ADV_DATA_CAP>,
    },
    /// The session transport changed state.
    Link(LinkEvent),
    /// The outcome of the most recently issued report.
    PublishOutcome(Result<(), TransmitError>),
    /// The remote side delivered a state document.
    DocumentReceived(heapless::String<DOCUMENT_CAP>),
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Callback contexts write (produce), the main loop reads (consume).
// Uses atomic head/tail indices over an uninitialised slot array; the
// SPSC discipline (one producer side, one consumer side) is what makes
// the unsynchronised slot writes sound.

pub struct EventQueue {
    head: AtomicUsize,
    tail: AtomicUsize,
    slots: [UnsafeCell<MaybeUninit<Event>>; EVENT_QUEUE_CAP],
}

// SAFETY: slots are only written by the producer side at `head` and only
// read by the consumer side at `tail`; the Acquire/Release pairs on the
// indices order those accesses. `Event` itself holds no references.
unsafe impl Sync for EventQueue {}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: [const { UnsafeCell::new(MaybeUninit::uninit()) }; EVENT_QUEUE_CAP],
        }
    }

    /// Push an event. Safe to call from callback context (lock-free).
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP;

        if next_head == tail {
            return false; // Queue full — drop event.
        }

        // SAFETY: this slot is outside the tail..head live range, so the
        // consumer will not read it until the Release store below.
        unsafe {
            (*self.slots[head].get()).write(event);
        }

        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the next event. Called from the main loop (single consumer).
    pub fn pop(&self) -> Option<Event> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None; // Empty.
        }

        // SAFETY: the producer published this slot with the Release store
        // of `head`; moving the value out leaves the slot logically free.
        let event = unsafe { (*self.slots[tail].get()).assume_init_read() };
        self.tail
            .store((tail + 1) % EVENT_QUEUE_CAP, Ordering::Release);

        Some(event)
    }

    /// Drain all pending events into a callback, FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        tail == head
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Process-wide instance ─────────────────────────────────────
//
// Kept in a static so radio/session callbacks can reach it without
// threading a handle through the platform stacks.

static QUEUE: EventQueue = EventQueue::new();

/// Push onto the process-wide queue.
pub fn push_event(event: Event) -> bool {
    QUEUE.push(event)
}

/// Drain the process-wide queue into a handler.
pub fn drain_events(handler: impl FnMut(Event)) {
    QUEUE.drain(handler);
}
