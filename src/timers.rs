//! One-shot timer service.
//!
//! Fixed-capacity wheel of armed one-shots, polled from the main loop with a
//! monotonic uptime. Expiry is delivered through a caller-supplied callback
//! (the loop pushes [`Event::Timer`](crate::events::Event) values), keeping
//! the wheel itself independent of the event system and independently
//! testable.
//!
//! Handles are generation-checked: a slot reused for a new timer gets a new
//! generation, so cancelling a stale handle — already fired, or never armed —
//! is a safe no-op and can never kill a later timer.

use core::time::Duration;

use log::error;

use crate::app::ports::{TimerHandle, TimerId, TimerPort};

/// Maximum concurrently armed timers (stack-allocated).
/// Three state machines own at most one timer each; headroom for growth.
const MAX_TIMERS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Armed {
    id: TimerId,
    deadline: Duration,
    generation: u32,
}

/// The timer wheel.
pub struct TimerWheel {
    slots: [Option<Armed>; MAX_TIMERS],
    /// Uptime as of the last `advance` call; deadlines are measured from it.
    now: Duration,
    next_generation: u32,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TIMERS],
            now: Duration::ZERO,
            next_generation: 1,
        }
    }

    /// Fire every timer whose deadline has passed, clearing its slot before
    /// the callback runs so a handler re-arming the same id gets a fresh
    /// slot and generation. The fired handle is passed along so dispatch can
    /// discard expiries that were cancelled after queueing.
    pub fn advance(&mut self, now: Duration, mut fire: impl FnMut(TimerId, TimerHandle)) {
        self.now = now;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(armed) = slot {
                if armed.deadline <= now {
                    let id = armed.id;
                    let handle = TimerHandle {
                        slot: index as u8,
                        generation: armed.generation,
                    };
                    *slot = None;
                    fire(id, handle);
                }
            }
        }
    }

    /// Number of currently armed timers.
    pub fn armed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

impl Default for TimerWheel {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerPort for TimerWheel {
    fn schedule_once(&mut self, id: TimerId, after: Duration) -> TimerHandle {
        let deadline = self.now.saturating_add(after);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                let generation = self.next_generation;
                self.next_generation = self.next_generation.wrapping_add(1);
                *slot = Some(Armed {
                    id,
                    deadline,
                    generation,
                });
                return TimerHandle {
                    slot: index as u8,
                    generation,
                };
            }
        }
        // Should be unreachable with three owners; dropping the arm request
        // is still recoverable because every machine re-arms on its next
        // event, but it deserves a loud log line.
        error!("timer wheel full, dropping {:?}", id);
        TimerHandle::dead()
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let Some(slot) = self.slots.get_mut(handle.slot as usize) else {
            return; // dead or out-of-range handle
        };
        if let Some(armed) = slot {
            if armed.generation == handle.generation {
                *slot = None;
            }
        }
    }
}
