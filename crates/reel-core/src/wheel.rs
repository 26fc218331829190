#![forbid(unsafe_code)]

//! Wheel burst coalescing.
//!
//! A single physical scroll on a trackpad or a free-spinning wheel produces a
//! flood of wheel events. Without coalescing each one would request its own
//! transition and all but the first would be dropped by the cool-down lock,
//! which makes the carousel feel unresponsive at the end of the burst.
//!
//! [`WheelCoalescer`] implements a trailing debounce:
//! - every qualifying event replaces the pending one (latest direction wins)
//!   and re-arms the deadline to `now + debounce`;
//! - once a poll observes `now >= deadline` the pending decision fires once.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use reel_core::event::Direction;
//! use reel_core::wheel::WheelCoalescer;
//!
//! let ms = Duration::from_millis;
//! let mut wheel = WheelCoalescer::new(ms(50), false);
//! for t in [0, 10, 20, 30, 40] {
//!     assert!(wheel.push(1.0, ms(t)));
//! }
//! assert_eq!(wheel.poll(ms(89)), None);
//! let fired = wheel.poll(ms(90)).unwrap();
//! assert_eq!(fired.direction, Direction::Forward);
//! assert_eq!(fired.coalesced, 5);
//! assert!(!wheel.has_pending());
//! ```

use std::time::Duration;

use crate::event::Direction;

/// A wheel decision released by the debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelFire {
    /// Direction of the last event in the burst.
    pub direction: Direction,
    /// Time the debounce elapsed (not the time it was observed).
    pub at: Duration,
    /// Number of events folded into this decision.
    pub coalesced: u32,
}

#[derive(Debug, Clone, Copy)]
struct PendingWheel {
    direction: Direction,
    deadline: Duration,
    count: u32,
}

/// Trailing-edge debouncer for wheel events.
///
/// Not thread-safe; drive it from the same place that drives the engine.
#[derive(Debug, Clone)]
pub struct WheelCoalescer {
    debounce: Duration,
    invert: bool,
    pending: Option<PendingWheel>,
}

impl WheelCoalescer {
    /// Create a coalescer with the given quiet window.
    #[must_use]
    pub const fn new(debounce: Duration, invert: bool) -> Self {
        Self {
            debounce,
            invert,
            pending: None,
        }
    }

    /// Push one wheel event.
    ///
    /// Returns `false` when `delta_y` carries no direction (zero or NaN); such
    /// events neither fire nor disturb a pending burst.
    pub fn push(&mut self, delta_y: f64, now: Duration) -> bool {
        let Some(direction) = Direction::from_wheel_delta(delta_y) else {
            return false;
        };
        let direction = if self.invert {
            direction.reverse()
        } else {
            direction
        };
        let count = self
            .pending
            .map_or(1, |pending| pending.count.saturating_add(1));
        self.pending = Some(PendingWheel {
            direction,
            deadline: now.saturating_add(self.debounce),
            count,
        });
        true
    }

    /// Release the pending decision if its quiet window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<WheelFire> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        Some(WheelFire {
            direction: pending.direction,
            at: pending.deadline,
            coalesced: pending.count,
        })
    }

    /// Discard any pending decision. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a decision is waiting for its quiet window.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of events in the pending burst (0 when idle).
    #[must_use]
    pub fn pending_count(&self) -> u32 {
        self.pending.map_or(0, |p| p.count)
    }

    /// When the pending decision will fire, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.deadline)
    }
}
