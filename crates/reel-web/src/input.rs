#![forbid(unsafe_code)]

//! JSON input schema for `reel-web`.
//!
//! The page script forwards DOM events as small JSON objects tagged by `kind`.
//! Timestamps (`t`) are `performance.now()` milliseconds; positions are CSS
//! pixels (`clientX`/`clientY`). This module:
//! - decodes that schema into [`CarouselInput`],
//! - normalizes DOM `key` strings to [`NavKey`],
//! - encodes engine inputs back to JSON for record/replay traces.

use std::time::Duration;

use bitflags::bitflags;
use reel_core::engine::{Response, Transition};
use reel_core::{CarouselEngine, CarouselInput, LayoutSink, NavKey};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held during an input event.
    ///
    /// These flags are encoded as a compact `u8` bitset in JSON (`mods`).
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Modifiers that turn an arrow key into a browser/OS shortcut.
    pub const SHORTCUT: Self = Self::ALT.union(Self::CTRL).union(Self::SUPER);
}

/// Phase for mouse pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Enter,
    Leave,
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Wire form of one DOM event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEventJson {
    Wheel {
        dy: f64,
        t: f64,
        #[serde(default)]
        mods: u8,
    },
    Pointer {
        phase: PointerPhase,
        #[serde(default)]
        x: f64,
        t: f64,
    },
    Touch {
        phase: TouchPhase,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        t: f64,
    },
    Click {
        card: usize,
        t: f64,
    },
    Key {
        key: String,
        t: f64,
        #[serde(default)]
        mods: u8,
    },
    Blur {
        t: f64,
    },
    Resize {
        width: f64,
        t: f64,
    },
    Tick {
        t: f64,
    },
}

impl InputEventJson {
    /// Convert to an engine input.
    ///
    /// Returns `None` for events the carousel does not react to: keys other
    /// than the horizontal arrows, arrows pressed as part of a shortcut, and
    /// ctrl+wheel (pinch zoom on trackpads).
    #[must_use]
    pub fn to_input(&self) -> Option<CarouselInput> {
        Some(match *self {
            Self::Wheel { dy, t, mods } => {
                if Modifiers::from_bits_truncate(mods).contains(Modifiers::CTRL) {
                    return None;
                }
                CarouselInput::Wheel {
                    delta_y: dy,
                    now: duration_from_ms(t),
                }
            }
            Self::Pointer { phase, x, t } => {
                let now = duration_from_ms(t);
                match phase {
                    PointerPhase::Down => CarouselInput::PointerDown { x, now },
                    PointerPhase::Move => CarouselInput::PointerMove { x, now },
                    PointerPhase::Up => CarouselInput::PointerUp { x, now },
                    PointerPhase::Enter => CarouselInput::PointerEnter { now },
                    PointerPhase::Leave => CarouselInput::PointerLeave { now },
                }
            }
            Self::Touch { phase, x, y, t } => {
                let now = duration_from_ms(t);
                match phase {
                    TouchPhase::Start => CarouselInput::TouchStart { x, y, now },
                    TouchPhase::Move => CarouselInput::TouchMove { x, y, now },
                    TouchPhase::End => CarouselInput::TouchEnd { x, y, now },
                    TouchPhase::Cancel => CarouselInput::TouchCancel { now },
                }
            }
            Self::Click { card, t } => CarouselInput::CardClicked {
                index: card,
                now: duration_from_ms(t),
            },
            Self::Key { ref key, t, mods } => CarouselInput::Key {
                key: normalize_dom_key(key, Modifiers::from_bits_truncate(mods))?,
                now: duration_from_ms(t),
            },
            Self::Blur { t } => CarouselInput::Blur {
                now: duration_from_ms(t),
            },
            Self::Resize { width, t } => CarouselInput::Resize {
                viewport_width: width,
                now: duration_from_ms(t),
            },
            Self::Tick { t } => CarouselInput::Tick {
                now: duration_from_ms(t),
            },
        })
    }

    /// Serialize to the wire form.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&CarouselInput> for InputEventJson {
    fn from(value: &CarouselInput) -> Self {
        let t = duration_to_ms(value.now());
        match *value {
            CarouselInput::Wheel { delta_y, .. } => Self::Wheel {
                dy: delta_y,
                t,
                mods: 0,
            },
            CarouselInput::PointerDown { x, .. } => Self::Pointer {
                phase: PointerPhase::Down,
                x,
                t,
            },
            CarouselInput::PointerMove { x, .. } => Self::Pointer {
                phase: PointerPhase::Move,
                x,
                t,
            },
            CarouselInput::PointerUp { x, .. } => Self::Pointer {
                phase: PointerPhase::Up,
                x,
                t,
            },
            CarouselInput::PointerEnter { .. } => Self::Pointer {
                phase: PointerPhase::Enter,
                x: 0.0,
                t,
            },
            CarouselInput::PointerLeave { .. } => Self::Pointer {
                phase: PointerPhase::Leave,
                x: 0.0,
                t,
            },
            CarouselInput::TouchStart { x, y, .. } => Self::Touch {
                phase: TouchPhase::Start,
                x,
                y,
                t,
            },
            CarouselInput::TouchMove { x, y, .. } => Self::Touch {
                phase: TouchPhase::Move,
                x,
                y,
                t,
            },
            CarouselInput::TouchEnd { x, y, .. } => Self::Touch {
                phase: TouchPhase::End,
                x,
                y,
                t,
            },
            CarouselInput::TouchCancel { .. } => Self::Touch {
                phase: TouchPhase::Cancel,
                x: 0.0,
                y: 0.0,
                t,
            },
            CarouselInput::CardClicked { index, .. } => Self::Click { card: index, t },
            CarouselInput::Key { key, .. } => Self::Key {
                key: dom_key_name(key).to_string(),
                t,
                mods: 0,
            },
            CarouselInput::Blur { .. } => Self::Blur { t },
            CarouselInput::Resize { viewport_width, .. } => Self::Resize {
                width: viewport_width,
                t,
            },
            CarouselInput::Tick { .. } => Self::Tick { t },
        }
    }
}

/// Decode one wire event.
///
/// `Ok(None)` means the event is well-formed but irrelevant to the carousel.
pub fn decode_input(json: &str) -> Result<Option<CarouselInput>, serde_json::Error> {
    let event: InputEventJson = serde_json::from_str(json)?;
    Ok(event.to_input())
}

/// Decode one wire event and feed it to `engine`.
///
/// Returns the [`response_label`] of the outcome.
pub fn dispatch<S: LayoutSink>(
    engine: &mut CarouselEngine<S>,
    json: &str,
) -> Result<&'static str, serde_json::Error> {
    Ok(match decode_input(json)? {
        Some(input) => response_label(&engine.handle(input)),
        None => "ignored",
    })
}

/// Map a DOM `KeyboardEvent.key` to a carousel navigation key.
///
/// Only the horizontal arrows navigate; Shift is tolerated, any other held
/// modifier means the user is issuing a shortcut.
#[must_use]
pub fn normalize_dom_key(dom_key: &str, mods: Modifiers) -> Option<NavKey> {
    if mods.intersects(Modifiers::SHORTCUT) {
        return None;
    }
    match dom_key {
        "ArrowLeft" | "Left" => Some(NavKey::Left),
        "ArrowRight" | "Right" => Some(NavKey::Right),
        _ => None,
    }
}

fn dom_key_name(key: NavKey) -> &'static str {
    match key {
        NavKey::Left => "ArrowLeft",
        NavKey::Right => "ArrowRight",
    }
}

/// Stable string for a [`Response`], returned to JS.
#[must_use]
pub const fn response_label(response: &Response) -> &'static str {
    match response {
        Response::Nothing => "nothing",
        Response::Pending => "pending",
        Response::Transition(Transition::Committed { .. }) => "committed",
        Response::Transition(Transition::Dropped) => "dropped",
        Response::Transition(Transition::Unchanged) => "unchanged",
        Response::Transition(Transition::Ignored) => "ignored",
        Response::Tap { double: false } => "tap",
        Response::Tap { double: true } => "double_tap",
    }
}

/// Host milliseconds to engine time, microsecond resolution.
///
/// Non-finite and negative timestamps clamp to zero.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_micros((ms * 1000.0).round() as u64)
}

/// Engine time to host milliseconds.
#[must_use]
pub fn duration_to_ms(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}
