#![forbid(unsafe_code)]

//! Drag, swipe, and tap classification.
//!
//! [`GestureClassifier`] turns one continuous pointer or touch interaction into
//! a single [`GestureOutcome`], evaluated once when the gesture ends.
//!
//! # Decision rule
//!
//! At gesture end, with `dx = end_x - start_x` and the last sampled velocity
//! `v` (px/ms):
//!
//! - `|dx| > drag_threshold` commits in the direction of `dx`;
//! - otherwise `|v| > velocity_threshold` commits in the direction of `dx`,
//!   or of `v` when `dx` is exactly zero;
//! - otherwise nothing happens (a tap or an aborted drag).
//!
//! Rightward motion reveals the previous card ([`Direction::Backward`]).
//!
//! # Touch axis lock
//!
//! A touch is undecided until it moves beyond the slop on either axis. It is
//! then locked horizontal when `|dx| > |dy|`, vertical otherwise, for the rest
//! of the gesture. Only horizontal touches sample velocity or commit; vertical
//! ones belong to page scrolling.
//!
//! # Invariants
//!
//! 1. At most one gesture is tracked; a second start while active is ignored.
//! 2. Every end or cancel returns the classifier to [`GestureState::Idle`].
//! 3. Velocity never outlives its gesture.

use std::time::Duration;

use crate::config::GestureConfig;
use crate::event::Direction;

// ---------------------------------------------------------------------------
// Tracking state
// ---------------------------------------------------------------------------

/// Horizontal drag samples shared by pointer and touch gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTrack {
    start_x: f64,
    start_time: Duration,
    last_x: f64,
    velocity: f64,
}

impl DragTrack {
    fn new(x: f64, now: Duration) -> Self {
        Self {
            start_x: x,
            start_time: now,
            last_x: x,
            velocity: 0.0,
        }
    }

    /// First difference against the gesture start time.
    fn sample(&mut self, x: f64, now: Duration) {
        let elapsed_ms = now.saturating_sub(self.start_time).as_secs_f64() * 1000.0;
        if elapsed_ms > 0.0 {
            self.velocity = (x - self.last_x) / elapsed_ms;
        }
        self.last_x = x;
    }

    /// Signed velocity in px/ms.
    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Displacement of `x` from the start position.
    #[must_use]
    pub fn displacement(&self, x: f64) -> f64 {
        x - self.start_x
    }
}

/// Axis classification of a touch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisLock {
    Undecided,
    Horizontal,
    Vertical,
}

/// Touch gesture samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchTrack {
    drag: DragTrack,
    start_y: f64,
    axis: AxisLock,
}

/// Current gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Pointer(DragTrack),
    Touch(TouchTrack),
}

/// Result of ending (or cancelling) a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureOutcome {
    /// Distance or velocity crossed a threshold.
    Swipe(Direction),
    /// A stationary touch; `double` when it followed another tap closely.
    Tap { double: bool },
    /// The gesture ended below every threshold.
    Settled,
    /// The gesture was interrupted; nothing is committed.
    Cancelled,
    /// No matching gesture was active.
    Ignored,
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

/// Stateful gesture classifier.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    state: GestureState,
    last_tap: Option<Duration>,
}

impl GestureClassifier {
    /// Create an idle classifier.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            last_tap: None,
        }
    }

    /// Current gesture state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Whether any gesture is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Whether a mouse/pen drag is in progress.
    #[must_use]
    pub fn is_pointer_drag(&self) -> bool {
        matches!(self.state, GestureState::Pointer(_))
    }

    /// Velocity of the active gesture (0 when idle).
    #[must_use]
    pub fn velocity(&self) -> f64 {
        match &self.state {
            GestureState::Idle => 0.0,
            GestureState::Pointer(drag) => drag.velocity(),
            GestureState::Touch(touch) => touch.drag.velocity(),
        }
    }

    /// Axis lock of the active touch, if any.
    #[must_use]
    pub fn touch_axis(&self) -> Option<AxisLock> {
        match &self.state {
            GestureState::Touch(touch) => Some(touch.axis),
            _ => None,
        }
    }

    /// Horizontal progress of a horizontal touch as a fraction of `viewport_width`.
    ///
    /// Drives the renderer's swipe feedback; `None` unless a horizontal touch
    /// is active and the width is positive.
    #[must_use]
    pub fn swipe_progress(&self, viewport_width: f64) -> Option<f64> {
        match &self.state {
            GestureState::Touch(touch)
                if touch.axis == AxisLock::Horizontal && viewport_width > 0.0 =>
            {
                Some(touch.drag.displacement(touch.drag.last_x) / viewport_width)
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// Begin a pointer drag. Returns `false` if a gesture is already active.
    pub fn pointer_down(&mut self, x: f64, now: Duration) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = GestureState::Pointer(DragTrack::new(x, now));
        true
    }

    /// Sample pointer motion. Ignored unless a pointer drag is active.
    pub fn pointer_move(&mut self, x: f64, now: Duration) {
        if let GestureState::Pointer(drag) = &mut self.state {
            drag.sample(x, now);
        }
    }

    /// End a pointer drag and classify it.
    pub fn pointer_up(&mut self, x: f64) -> GestureOutcome {
        let GestureState::Pointer(drag) = self.state else {
            return GestureOutcome::Ignored;
        };
        self.state = GestureState::Idle;
        match self.decide(drag.displacement(x), drag.velocity()) {
            Some(direction) => GestureOutcome::Swipe(direction),
            None => GestureOutcome::Settled,
        }
    }

    // -----------------------------------------------------------------------
    // Touch
    // -----------------------------------------------------------------------

    /// Begin a touch gesture. Returns `false` if a gesture is already active.
    pub fn touch_start(&mut self, x: f64, y: f64, now: Duration) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = GestureState::Touch(TouchTrack {
            drag: DragTrack::new(x, now),
            start_y: y,
            axis: AxisLock::Undecided,
        });
        true
    }

    /// Sample touch motion, locking the axis once the slop is exceeded.
    pub fn touch_move(&mut self, x: f64, y: f64, now: Duration) {
        let slop = self.config.touch_slop_px;
        let GestureState::Touch(touch) = &mut self.state else {
            return;
        };
        if touch.axis == AxisLock::Undecided {
            let dx = (x - touch.drag.start_x).abs();
            let dy = (y - touch.start_y).abs();
            if dx > slop || dy > slop {
                touch.axis = if dx > dy {
                    AxisLock::Horizontal
                } else {
                    AxisLock::Vertical
                };
                crate::trace!(axis = ?touch.axis, dx, dy, "touch axis locked");
            }
        }
        if touch.axis == AxisLock::Horizontal {
            touch.drag.sample(x, now);
        }
    }

    /// End a touch gesture and classify it.
    pub fn touch_end(&mut self, x: f64, now: Duration) -> GestureOutcome {
        let GestureState::Touch(touch) = self.state else {
            return GestureOutcome::Ignored;
        };
        self.state = GestureState::Idle;
        let dx = touch.drag.displacement(x);

        if touch.axis == AxisLock::Horizontal {
            return match self.decide(dx, touch.drag.velocity()) {
                Some(direction) => GestureOutcome::Swipe(direction),
                None => GestureOutcome::Settled,
            };
        }
        if dx.abs() < self.config.tap_threshold_px {
            let double = self
                .last_tap
                .is_some_and(|prev| now.saturating_sub(prev) < self.config.double_tap_window());
            self.last_tap = Some(now);
            return GestureOutcome::Tap { double };
        }
        GestureOutcome::Settled
    }

    /// Abort any gesture without committing.
    pub fn cancel(&mut self) -> GestureOutcome {
        if !self.is_active() {
            return GestureOutcome::Ignored;
        }
        self.state = GestureState::Idle;
        GestureOutcome::Cancelled
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn decide(&self, dx: f64, velocity: f64) -> Option<Direction> {
        if dx.abs() > self.config.drag_threshold_px {
            return Direction::from_horizontal_motion(dx);
        }
        if velocity.abs() > self.config.velocity_threshold {
            // Displacement still picks the side; velocity only confirms intent.
            return Direction::from_horizontal_motion(dx)
                .or_else(|| Direction::from_horizontal_motion(velocity));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureConfig::default())
    }

    #[test]
    fn slow_long_drag_right_is_backward_swipe() {
        let mut g = classifier();
        assert!(g.pointer_down(100.0, ms(0)));
        g.pointer_move(130.0, ms(600));
        g.pointer_move(160.0, ms(1200));
        assert!(g.velocity().abs() < 0.5);
        assert_eq!(g.pointer_up(160.0), GestureOutcome::Swipe(Direction::Backward));
        assert!(!g.is_active());
    }

    #[test]
    fn short_slow_drag_settles() {
        let mut g = classifier();
        g.pointer_down(0.0, ms(0));
        g.pointer_move(20.0, ms(200));
        assert!((g.velocity() - 0.1).abs() < 1e-9);
        assert_eq!(g.pointer_up(20.0), GestureOutcome::Settled);
        assert_eq!(g.velocity(), 0.0);
    }

    #[test]
    fn fast_flick_commits_by_velocity() {
        let mut g = classifier();
        g.pointer_down(200.0, ms(0));
        g.pointer_move(170.0, ms(20));
        assert!(g.velocity() < -0.5);
        assert_eq!(g.pointer_up(170.0), GestureOutcome::Swipe(Direction::Forward));
    }

    #[test]
    fn distance_sign_beats_velocity_sign() {
        let mut g = classifier();
        g.pointer_down(0.0, ms(0));
        g.pointer_move(-80.0, ms(100));
        // Snap back slightly at the very end: velocity is positive and large.
        g.pointer_move(-60.0, ms(110));
        assert!(g.velocity() > 0.0);
        assert_eq!(g.pointer_up(-60.0), GestureOutcome::Swipe(Direction::Forward));
    }

    #[test]
    fn short_drag_with_opposing_flick_follows_displacement() {
        let mut g = classifier();
        g.pointer_down(0.0, ms(0));
        g.pointer_move(130.0, ms(100));
        g.pointer_move(30.0, ms(150));
        assert!(g.velocity() < -0.5);
        assert_eq!(g.pointer_up(30.0), GestureOutcome::Swipe(Direction::Backward));
    }

    #[test]
    fn zero_displacement_flick_uses_velocity_sign() {
        let mut g = classifier();
        g.pointer_down(0.0, ms(0));
        g.pointer_move(40.0, ms(10));
        g.pointer_move(0.0, ms(20));
        assert!(g.velocity() < -0.5);
        assert_eq!(g.pointer_up(0.0), GestureOutcome::Swipe(Direction::Forward));
    }

    #[test]
    fn zero_elapsed_keeps_previous_velocity() {
        let mut g = classifier();
        g.pointer_down(0.0, ms(5));
        g.pointer_move(40.0, ms(5));
        assert_eq!(g.velocity(), 0.0);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut g = classifier();
        assert!(g.pointer_down(0.0, ms(0)));
        assert!(!g.pointer_down(10.0, ms(1)));
        assert!(!g.touch_start(10.0, 0.0, ms(1)));
        assert!(g.is_pointer_drag());
    }

    #[test]
    fn pointer_up_without_down_is_ignored() {
        let mut g = classifier();
        assert_eq!(g.pointer_up(10.0), GestureOutcome::Ignored);
    }

    #[test]
    fn horizontal_touch_commits() {
        let mut g = classifier();
        g.touch_start(300.0, 300.0, ms(0));
        g.touch_move(220.0, 290.0, ms(400));
        assert_eq!(g.touch_axis(), Some(AxisLock::Horizontal));
        assert_eq!(
            g.touch_end(220.0, ms(410)),
            GestureOutcome::Swipe(Direction::Forward)
        );
    }

    #[test]
    fn vertical_touch_never_commits() {
        let mut g = classifier();
        g.touch_start(300.0, 300.0, ms(0));
        g.touch_move(290.0, 220.0, ms(50));
        assert_eq!(g.touch_axis(), Some(AxisLock::Vertical));
        // Even a later large horizontal excursion stays vertical.
        g.touch_move(150.0, 200.0, ms(60));
        assert_eq!(g.velocity(), 0.0);
        assert_eq!(g.touch_end(150.0, ms(70)), GestureOutcome::Settled);
    }

    #[test]
    fn touch_within_slop_stays_undecided() {
        let mut g = classifier();
        g.touch_start(0.0, 0.0, ms(0));
        g.touch_move(8.0, 6.0, ms(30));
        assert_eq!(g.touch_axis(), Some(AxisLock::Undecided));
        assert_eq!(g.swipe_progress(400.0), None);
    }

    #[test]
    fn stationary_touches_report_double_tap() {
        let mut g = classifier();
        g.touch_start(50.0, 50.0, ms(0));
        assert_eq!(g.touch_end(52.0, ms(80)), GestureOutcome::Tap { double: false });
        g.touch_start(50.0, 50.0, ms(200));
        assert_eq!(g.touch_end(50.0, ms(250)), GestureOutcome::Tap { double: true });
        g.touch_start(50.0, 50.0, ms(900));
        assert_eq!(g.touch_end(50.0, ms(950)), GestureOutcome::Tap { double: false });
    }

    #[test]
    fn swipe_progress_tracks_horizontal_touch() {
        let mut g = classifier();
        g.touch_start(100.0, 0.0, ms(0));
        g.touch_move(300.0, 0.0, ms(100));
        assert_eq!(g.swipe_progress(800.0), Some(0.25));
        assert_eq!(g.swipe_progress(0.0), None);
    }

    #[test]
    fn cancel_resets_without_commit() {
        let mut g = classifier();
        g.touch_start(0.0, 0.0, ms(0));
        g.touch_move(-200.0, 0.0, ms(10));
        assert_eq!(g.cancel(), GestureOutcome::Cancelled);
        assert!(!g.is_active());
        assert_eq!(g.touch_end(-200.0, ms(20)), GestureOutcome::Ignored);
        assert_eq!(g.cancel(), GestureOutcome::Ignored);
    }
}
