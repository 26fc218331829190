#![forbid(unsafe_code)]

//! The carousel engine.
//!
//! [`CarouselEngine`] owns the centered index and guarantees at most one
//! visual transition in flight. Handlers are plain `&mut self` methods invoked
//! by a thin host adapter; none of them block. Time-based continuations (the
//! cool-down release, a debounced wheel decision, auto-advance) are settled at
//! the start of every handler and on [`tick`](CarouselEngine::tick), so the
//! observable ordering matches timers firing on schedule.
//!
//! # Invariants
//!
//! 1. `current < card_count` at all times; steps wrap modulo `card_count`.
//! 2. Exactly one card is [`Slot::Center`](crate::slot::Slot::Center).
//! 3. The transition lock is taken together with every committed index change
//!    and holds for the configured cool-down.
//! 4. While the lock is held, commands are dropped, never queued.
//! 5. Every committed change reaches the [`LayoutSink`] synchronously.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use reel_core::{CarouselConfig, CarouselEngine, Layout, Transition};
//!
//! let ms = Duration::from_millis;
//! let mut engine =
//!     CarouselEngine::new(5, CarouselConfig::default(), Vec::<Layout>::new()).unwrap();
//! assert!(matches!(engine.advance(ms(0)), Transition::Committed { to: 1, .. }));
//! assert_eq!(engine.advance(ms(100)), Transition::Dropped);
//! assert!(matches!(engine.advance(ms(500)), Transition::Committed { to: 2, .. }));
//! assert_eq!(engine.sink().len(), 2);
//! ```

use std::time::Duration;

use crate::auto_advance::AutoAdvanceTimer;
use crate::config::{CarouselConfig, ConfigError};
use crate::event::{CarouselInput, Direction};
use crate::gesture::{GestureClassifier, GestureOutcome};
use crate::slot::{Layout, LayoutSink, Slot};
use crate::wheel::WheelCoalescer;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction error type.
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselError {
    /// A carousel needs at least one card.
    EmptyCarousel,
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
}

impl core::fmt::Display for CarouselError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyCarousel => write!(f, "carousel needs at least one card"),
            Self::InvalidConfig(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CarouselError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyCarousel => None,
            Self::InvalidConfig(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CarouselError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a direction-committing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The index changed and a layout was requested.
    Committed {
        from: usize,
        to: usize,
        /// Signed index distance travelled (wrapped, shortest for jumps).
        offset: isize,
    },
    /// A transition was already in flight; the command was dropped.
    Dropped,
    /// The target was already centered.
    Unchanged,
    /// The target does not exist.
    Ignored,
}

impl Transition {
    /// Whether the index changed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Result of handling one [`CarouselInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// Nothing the host needs to act on.
    Nothing,
    /// A wheel decision is waiting for its debounce window.
    Pending,
    /// A command was evaluated.
    Transition(Transition),
    /// A stationary touch. Hosts suppress the default action on `double`.
    Tap { double: bool },
}

/// Coarse engine phase, for hosts and diagnostics.
///
/// A gesture takes precedence: the engine reports `Dragging` even if the lock
/// from a previous commit is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnginePhase {
    Idle,
    Dragging,
    Animating,
}

/// Cool-down latch for committed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionLock {
    Free,
    Held { until: Duration },
}

impl TransitionLock {
    fn is_held(self, now: Duration) -> bool {
        matches!(self, Self::Held { until } if now < until)
    }

    fn release_expired(&mut self, now: Duration) {
        if let Self::Held { until } = *self
            && now >= until
        {
            *self = Self::Free;
        }
    }
}

// ---------------------------------------------------------------------------
// CarouselEngine
// ---------------------------------------------------------------------------

/// Carousel state machine.
#[derive(Debug)]
pub struct CarouselEngine<S: LayoutSink = ()> {
    config: CarouselConfig,
    card_count: usize,
    current: usize,
    lock: TransitionLock,
    gestures: GestureClassifier,
    wheel: WheelCoalescer,
    auto_advance: AutoAdvanceTimer,
    viewport_width: f64,
    sink: S,
    commits: u64,
    dropped: u64,
}

impl<S: LayoutSink> CarouselEngine<S> {
    /// Create an engine for `card_count` cards centered on card 0.
    ///
    /// Nothing is emitted until [`mount`](Self::mount).
    pub fn new(card_count: usize, config: CarouselConfig, sink: S) -> Result<Self, CarouselError> {
        if card_count == 0 {
            return Err(CarouselError::EmptyCarousel);
        }
        config.validate()?;
        Ok(Self {
            gestures: GestureClassifier::new(config.gesture.clone()),
            wheel: WheelCoalescer::new(config.wheel.debounce(), config.wheel.invert),
            auto_advance: AutoAdvanceTimer::new(config.auto_advance.clone()),
            config,
            card_count,
            current: 0,
            lock: TransitionLock::Free,
            viewport_width: 0.0,
            sink,
            commits: 0,
            dropped: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Centered card.
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of cards.
    #[inline]
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Whether a committed transition is still cooling down at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.lock.is_held(now)
    }

    /// Whether a drag or touch gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gestures.is_active()
    }

    /// Coarse phase at `now`.
    #[must_use]
    pub fn phase(&self, now: Duration) -> EnginePhase {
        if self.gestures.is_active() {
            EnginePhase::Dragging
        } else if self.lock.is_held(now) {
            EnginePhase::Animating
        } else {
            EnginePhase::Idle
        }
    }

    /// Velocity of the active gesture in px/ms (0 when idle).
    #[must_use]
    pub fn drag_velocity(&self) -> f64 {
        self.gestures.velocity()
    }

    /// Swipe feedback for a horizontal touch, as a fraction of the viewport.
    #[must_use]
    pub fn swipe_progress(&self) -> Option<f64> {
        self.gestures.swipe_progress(self.viewport_width)
    }

    /// Gesture classifier (read-only).
    #[must_use]
    pub fn gestures(&self) -> &GestureClassifier {
        &self.gestures
    }

    /// Wheel coalescer (read-only).
    #[must_use]
    pub fn wheel(&self) -> &WheelCoalescer {
        &self.wheel
    }

    /// Auto-advance timer (read-only).
    #[must_use]
    pub fn auto_advance(&self) -> &AutoAdvanceTimer {
        &self.auto_advance
    }

    /// Number of committed transitions (diagnostic).
    #[must_use]
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Number of dropped commands (diagnostic).
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Layout sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable layout sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the engine, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Pure slot of every card for the current index.
    #[must_use]
    pub fn compute_positions(&self) -> Vec<Slot> {
        self.layout(false).slots
    }

    /// Layout snapshot for the current index.
    #[must_use]
    pub fn layout(&self, instant: bool) -> Layout {
        Layout::compute(self.current, self.card_count, instant)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Initial mount: emit an instant layout and arm auto-advance.
    pub fn mount(&mut self, now: Duration) {
        self.relayout(now);
        self.auto_advance.start(now);
    }

    /// Re-emit the current layout with transitions suppressed.
    pub fn relayout(&mut self, now: Duration) {
        self.settle(now);
        let layout = self.layout(true);
        self.sink.request_layout(&layout);
    }

    /// Move to the next card.
    pub fn advance(&mut self, now: Duration) -> Transition {
        self.settle(now);
        self.step(Direction::Forward, now)
    }

    /// Move to the previous card.
    pub fn retreat(&mut self, now: Duration) -> Transition {
        self.settle(now);
        self.step(Direction::Backward, now)
    }

    /// Center `target` in one atomic update along the shortest circular path.
    pub fn jump_to(&mut self, target: usize, now: Duration) -> Transition {
        self.settle(now);
        if target >= self.card_count {
            crate::debug!(target, card_count = self.card_count, "jump target out of range");
            return Transition::Ignored;
        }
        if target == self.current {
            return Transition::Unchanged;
        }
        if self.lock.is_held(now) {
            return self.drop_command("jump");
        }
        let offset = shortest_offset(self.current, target, self.card_count);
        self.commit(target, offset, now)
    }

    /// Settle time-driven work: debounced wheel, lock expiry, auto-advance.
    ///
    /// Returns the outcome of the work this tick evaluated, if any. When a
    /// wheel decision commits and an auto-advance falls due in the same tick,
    /// the commit is reported even though the auto-advance is dropped.
    pub fn tick(&mut self, now: Duration) -> Option<Transition> {
        let wheel = self.settle(now);
        let auto = if self.auto_advance.poll(now) {
            crate::trace!(now_ms = now.as_millis() as u64, "auto-advance due");
            Some(self.step(Direction::Forward, now))
        } else {
            None
        };
        match (wheel, auto) {
            (Some(w), Some(a)) if w.is_committed() && !a.is_committed() => Some(w),
            (w, a) => a.or(w),
        }
    }

    // -----------------------------------------------------------------------
    // Input dispatch
    // -----------------------------------------------------------------------

    /// Handle one host input event.
    pub fn handle(&mut self, input: CarouselInput) -> Response {
        let span = crate::trace_span!("carousel_input", kind = input.kind());
        let _guard = span.enter();

        let now = input.now();
        if !matches!(input, CarouselInput::Tick { .. }) {
            self.settle(now);
        }

        match input {
            CarouselInput::Wheel { delta_y, now } => {
                if self.wheel.push(delta_y, now) {
                    Response::Pending
                } else {
                    Response::Nothing
                }
            }
            CarouselInput::PointerDown { x, now } => {
                if self.gestures.pointer_down(x, now) {
                    self.auto_advance.set_interacting(true, now);
                }
                Response::Nothing
            }
            CarouselInput::PointerMove { x, now } => {
                self.gestures.pointer_move(x, now);
                Response::Nothing
            }
            CarouselInput::PointerUp { x, now } => {
                let outcome = self.gestures.pointer_up(x);
                self.finish_gesture(outcome, now)
            }
            CarouselInput::PointerEnter { now } => {
                self.auto_advance.set_hovered(true, now);
                Response::Nothing
            }
            CarouselInput::PointerLeave { now } => {
                if self.gestures.is_pointer_drag() {
                    let outcome = self.gestures.cancel();
                    self.finish_gesture(outcome, now);
                }
                self.auto_advance.set_hovered(false, now);
                Response::Nothing
            }
            CarouselInput::TouchStart { x, y, now } => {
                if self.gestures.touch_start(x, y, now) {
                    self.auto_advance.set_interacting(true, now);
                }
                Response::Nothing
            }
            CarouselInput::TouchMove { x, y, now } => {
                self.gestures.touch_move(x, y, now);
                Response::Nothing
            }
            CarouselInput::TouchEnd { x, now, .. } => {
                let outcome = self.gestures.touch_end(x, now);
                self.finish_gesture(outcome, now)
            }
            CarouselInput::TouchCancel { now } => {
                let outcome = self.gestures.cancel();
                self.finish_gesture(outcome, now)
            }
            CarouselInput::CardClicked { index, now } => {
                if index == self.current {
                    return Response::Nothing;
                }
                Response::Transition(self.jump_to(index, now))
            }
            CarouselInput::Key { key, now } => Response::Transition(self.step(key.direction(), now)),
            CarouselInput::Blur { now } => {
                let outcome = self.gestures.cancel();
                self.finish_gesture(outcome, now);
                if self.wheel.cancel() {
                    crate::trace!("pending wheel decision discarded on blur");
                }
                self.auto_advance.set_hovered(false, now);
                Response::Nothing
            }
            CarouselInput::Resize {
                viewport_width,
                now,
            } => {
                self.viewport_width = viewport_width;
                self.relayout(now);
                Response::Nothing
            }
            CarouselInput::Tick { now } => match self.tick(now) {
                Some(transition) => Response::Transition(transition),
                None => Response::Nothing,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Fire a due wheel decision at its own deadline, then release the lock
    /// if the cool-down has elapsed by `now`.
    fn settle(&mut self, now: Duration) -> Option<Transition> {
        let fired = self.wheel.poll(now).map(|fire| {
            crate::trace!(coalesced = fire.coalesced, "wheel burst settled");
            self.step(fire.direction, fire.at)
        });
        self.lock.release_expired(now);
        fired
    }

    fn step(&mut self, direction: Direction, now: Duration) -> Transition {
        if self.lock.is_held(now) {
            return self.drop_command(match direction {
                Direction::Forward => "advance",
                Direction::Backward => "retreat",
            });
        }
        let offset = self.config.index_step.delta(direction);
        let n = self.card_count as isize;
        let to = (self.current as isize + offset).rem_euclid(n) as usize;
        self.commit(to, offset, now)
    }

    fn commit(&mut self, to: usize, offset: isize, now: Duration) -> Transition {
        let from = self.current;
        self.current = to;
        self.lock = TransitionLock::Held {
            until: now.saturating_add(self.config.transition_cooldown()),
        };
        self.commits += 1;
        crate::debug!(from, to, offset, "carousel transition committed");
        let layout = self.layout(false);
        self.sink.request_layout(&layout);
        Transition::Committed { from, to, offset }
    }

    fn drop_command(&mut self, _command: &'static str) -> Transition {
        self.dropped += 1;
        crate::trace!(command = _command, "command dropped: transition in flight");
        Transition::Dropped
    }

    fn finish_gesture(&mut self, outcome: GestureOutcome, now: Duration) -> Response {
        if outcome != GestureOutcome::Ignored {
            crate::trace!(?outcome, "gesture finished");
            self.auto_advance.set_interacting(false, now);
        }
        match outcome {
            GestureOutcome::Swipe(direction) => Response::Transition(self.step(direction, now)),
            GestureOutcome::Tap { double } => Response::Tap { double },
            GestureOutcome::Settled | GestureOutcome::Cancelled | GestureOutcome::Ignored => {
                Response::Nothing
            }
        }
    }
}

/// Signed shortest circular distance from `from` to `to` on a ring of `count`.
///
/// The result satisfies `|d| <= count / 2`; an exact half-way tie is positive.
/// An empty ring has no distance and yields 0.
#[must_use]
pub fn shortest_offset(from: usize, to: usize, count: usize) -> isize {
    if count == 0 {
        return 0;
    }
    let n = count as isize;
    let d = (to as isize - from as isize).rem_euclid(n);
    if 2 * d > n { d - n } else { d }
}
