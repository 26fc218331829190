#![forbid(unsafe_code)]

//! Auto-advance timer.
//!
//! Fires on a fixed period while the carousel is left alone. Hovering the
//! carousel or any drag/touch gesture suspends it; once every interaction has
//! ended the timer waits `resume_delay`, then re-arms a full period.
//!
//! ```text
//!   Stopped --start--> Running{due} --interaction--> Suspended
//!                          ^                            |
//!                          |                     interaction ends
//!                          |                            v
//!                          +----- resume_at ------ Resuming{resume_at}
//! ```
//!
//! The timer is host-driven: [`poll`](AutoAdvanceTimer::poll) reports whether
//! an advance is due at `now` and re-arms. A poll that arrives several periods
//! late fires once and skips the missed slots.

use std::time::Duration;

use crate::config::AutoAdvanceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Stopped,
    Running { due: Duration },
    Suspended,
    Resuming { resume_at: Duration },
}

/// Periodic advance scheduler.
#[derive(Debug, Clone)]
pub struct AutoAdvanceTimer {
    config: AutoAdvanceConfig,
    state: TimerState,
    hovered: bool,
    interacting: bool,
    fired: u64,
}

impl AutoAdvanceTimer {
    /// Create a stopped timer.
    #[must_use]
    pub fn new(config: AutoAdvanceConfig) -> Self {
        Self {
            config,
            state: TimerState::Stopped,
            hovered: false,
            interacting: false,
            fired: 0,
        }
    }

    /// Arm the timer at `now`. No-op when disabled.
    ///
    /// If an interaction is already in progress the timer starts suspended.
    pub fn start(&mut self, now: Duration) {
        if !self.config.enabled {
            return;
        }
        self.state = if self.is_held() {
            TimerState::Suspended
        } else {
            TimerState::Running {
                due: now.saturating_add(self.config.period()),
            }
        };
    }

    /// Stop the timer entirely.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Record pointer hover over the carousel.
    pub fn set_hovered(&mut self, hovered: bool, now: Duration) {
        self.hovered = hovered;
        self.update_hold(now);
    }

    /// Record a drag/touch gesture starting or ending.
    pub fn set_interacting(&mut self, interacting: bool, now: Duration) {
        self.interacting = interacting;
        self.update_hold(now);
    }

    /// Whether an advance is due at `now`. Re-arms when it returns `true`.
    pub fn poll(&mut self, now: Duration) -> bool {
        let period = self.config.period();
        if let TimerState::Resuming { resume_at } = self.state {
            if now < resume_at {
                return false;
            }
            self.state = TimerState::Running {
                due: resume_at.saturating_add(period),
            };
        }
        let TimerState::Running { due } = self.state else {
            return false;
        };
        if now < due {
            return false;
        }
        self.state = TimerState::Running {
            due: next_slot(due, now, period),
        };
        self.fired += 1;
        true
    }

    /// Whether the timer is currently held back by interaction.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        matches!(
            self.state,
            TimerState::Suspended | TimerState::Resuming { .. }
        )
    }

    /// Whether the timer has been started and not stopped.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        !matches!(self.state, TimerState::Stopped)
    }

    /// Next time an advance can fire, if known.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        match self.state {
            TimerState::Running { due } => Some(due),
            TimerState::Resuming { resume_at } => {
                Some(resume_at.saturating_add(self.config.period()))
            }
            TimerState::Stopped | TimerState::Suspended => None,
        }
    }

    /// Number of advances fired so far (diagnostic).
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    fn is_held(&self) -> bool {
        self.hovered || self.interacting
    }

    fn update_hold(&mut self, now: Duration) {
        match (self.state, self.is_held()) {
            (TimerState::Stopped, _) => {}
            (TimerState::Running { .. } | TimerState::Resuming { .. }, true) => {
                self.state = TimerState::Suspended;
            }
            (TimerState::Suspended, false) => {
                self.state = TimerState::Resuming {
                    resume_at: now.saturating_add(self.config.resume_delay()),
                };
            }
            _ => {}
        }
    }
}

/// First slot strictly after `now`, aligned to `due + k * period`.
fn next_slot(due: Duration, now: Duration, period: Duration) -> Duration {
    let period_ns = period.as_nanos().max(1);
    let late_ns = now.saturating_sub(due).as_nanos();
    let skipped = late_ns / period_ns + 1;
    let offset = skipped.saturating_mul(period_ns);
    due.saturating_add(Duration::from_nanos(u64::try_from(offset).unwrap_or(u64::MAX)))
}
