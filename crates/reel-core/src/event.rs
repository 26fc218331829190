#![forbid(unsafe_code)]

//! Canonical input events consumed by the carousel engine.
//!
//! Hosts translate DOM (or any other) input into [`CarouselInput`] values and
//! feed them to [`CarouselEngine::handle`](crate::engine::CarouselEngine::handle).
//! Every event carries a monotonic timestamp supplied by the host; positions
//! are in CSS pixels.

use std::time::Duration;

/// Logical carousel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the next card (`advance`).
    Forward,
    /// Toward the previous card (`retreat`).
    Backward,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Direction selected by horizontal pointer motion.
    ///
    /// Dragging content rightward reveals the previous card; leftward reveals
    /// the next one. Zero motion selects nothing.
    #[must_use]
    pub fn from_horizontal_motion(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Backward)
        } else if dx < 0.0 {
            Some(Self::Forward)
        } else {
            None
        }
    }

    /// Direction selected by a vertical wheel delta (positive scrolls down).
    #[must_use]
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Self::Forward)
        } else if delta_y < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }
}

/// Navigation keys the carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Left,
    Right,
}

impl NavKey {
    /// Direction bound to this key.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Right => Direction::Forward,
            Self::Left => Direction::Backward,
        }
    }
}

/// Normalized, host-stamped carousel input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    /// One wheel tick over a card.
    Wheel { delta_y: f64, now: Duration },
    /// Primary button pressed on a card.
    PointerDown { x: f64, now: Duration },
    /// Pointer moved anywhere in the document.
    PointerMove { x: f64, now: Duration },
    /// Primary button released.
    PointerUp { x: f64, now: Duration },
    /// Pointer entered the carousel.
    PointerEnter { now: Duration },
    /// Pointer left the carousel.
    PointerLeave { now: Duration },
    /// First finger down on a card.
    TouchStart { x: f64, y: f64, now: Duration },
    /// Finger moved.
    TouchMove { x: f64, y: f64, now: Duration },
    /// Finger lifted; position is the changed touch.
    TouchEnd { x: f64, y: f64, now: Duration },
    /// Touch sequence cancelled by the platform.
    TouchCancel { now: Duration },
    /// A card was clicked.
    CardClicked { index: usize, now: Duration },
    /// Navigation key pressed.
    Key { key: NavKey, now: Duration },
    /// Window lost focus.
    Blur { now: Duration },
    /// Viewport resized.
    Resize { viewport_width: f64, now: Duration },
    /// Host timer / animation-frame tick.
    Tick { now: Duration },
}

impl CarouselInput {
    /// Timestamp carried by the event.
    #[must_use]
    pub const fn now(&self) -> Duration {
        match *self {
            Self::Wheel { now, .. }
            | Self::PointerDown { now, .. }
            | Self::PointerMove { now, .. }
            | Self::PointerUp { now, .. }
            | Self::PointerEnter { now }
            | Self::PointerLeave { now }
            | Self::TouchStart { now, .. }
            | Self::TouchMove { now, .. }
            | Self::TouchEnd { now, .. }
            | Self::TouchCancel { now }
            | Self::CardClicked { now, .. }
            | Self::Key { now, .. }
            | Self::Blur { now }
            | Self::Resize { now, .. }
            | Self::Tick { now } => now,
        }
    }

    /// Short stable name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Wheel { .. } => "wheel",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerEnter { .. } => "pointer_enter",
            Self::PointerLeave { .. } => "pointer_leave",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchMove { .. } => "touch_move",
            Self::TouchEnd { .. } => "touch_end",
            Self::TouchCancel { .. } => "touch_cancel",
            Self::CardClicked { .. } => "card_clicked",
            Self::Key { .. } => "key",
            Self::Blur { .. } => "blur",
            Self::Resize { .. } => "resize",
            Self::Tick { .. } => "tick",
        }
    }
}
