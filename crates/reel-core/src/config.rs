#![forbid(unsafe_code)]

//! Carousel configuration.
//!
//! Every threshold the engine consults lives here. Defaults are tuned for a
//! 500 ms CSS slide transition; hosts can override any subset through JSON
//! (missing fields fall back to the defaults):
//!
//! ```
//! use reel_core::config::{CarouselConfig, IndexStep};
//!
//! let config = CarouselConfig::from_json_str(
//!     r#"{ "index_step": "decrement", "auto_advance": { "period_ms": 5000 } }"#,
//! )
//! .unwrap();
//! assert_eq!(config.index_step, IndexStep::Decrement);
//! assert_eq!(config.auto_advance.period_ms, 5000);
//! assert_eq!(config.auto_advance.resume_delay_ms, 1000);
//! assert_eq!(config.gesture.drag_threshold_px, 50.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event::Direction;

/// Default cool-down after a committed transition; matches the CSS transition.
pub const DEFAULT_TRANSITION_COOLDOWN_MS: u64 = 500;
/// Default wheel debounce window.
pub const DEFAULT_WHEEL_DEBOUNCE_MS: u64 = 50;
/// Default auto-advance period.
pub const DEFAULT_AUTO_ADVANCE_PERIOD_MS: u64 = 3000;
/// Default delay before auto-advance resumes after interaction ends.
pub const DEFAULT_AUTO_ADVANCE_RESUME_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A distance/velocity threshold is NaN, infinite, or negative.
    InvalidThreshold {
        /// Field name as it appears in JSON.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A duration that must be non-zero was zero.
    ZeroDuration(&'static str),
    /// The JSON document did not match the configuration schema.
    Parse(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidThreshold { field, value } => {
                write!(f, "invalid threshold `{field}`: {value}")
            }
            Self::ZeroDuration(field) => write!(f, "`{field}` must be greater than zero"),
            Self::Parse(msg) => write!(f, "invalid carousel config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Direction convention
// ---------------------------------------------------------------------------

/// How a forward step changes the centered index.
///
/// Card markup order decides whether "next" should increment or decrement the
/// index, so the engine takes it as configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStep {
    /// `advance` moves `current` to `current + 1`.
    #[default]
    Increment,
    /// `advance` moves `current` to `current - 1`.
    Decrement,
}

impl IndexStep {
    /// Signed index delta for one step in `direction`.
    #[must_use]
    pub const fn delta(self, direction: Direction) -> isize {
        match (self, direction) {
            (Self::Increment, Direction::Forward) | (Self::Decrement, Direction::Backward) => 1,
            (Self::Increment, Direction::Backward) | (Self::Decrement, Direction::Forward) => -1,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Drag, swipe, and tap thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Horizontal displacement that commits a swipe. Default: 50 px.
    pub drag_threshold_px: f64,
    /// Pointer speed that commits a swipe regardless of distance. Default: 0.5 px/ms.
    pub velocity_threshold: f64,
    /// Movement needed before a touch is locked to an axis. Default: 10 px.
    pub touch_slop_px: f64,
    /// A touch ending within this horizontal distance is a tap. Default: 10 px.
    pub tap_threshold_px: f64,
    /// Two taps closer than this are a double tap. Default: 300 ms.
    pub double_tap_window_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 50.0,
            velocity_threshold: 0.5,
            touch_slop_px: 10.0,
            tap_threshold_px: 10.0,
            double_tap_window_ms: 300,
        }
    }
}

impl GestureConfig {
    /// Double-tap window as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

/// Wheel coalescing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Quiet period that ends a wheel burst. Default: 50 ms.
    pub debounce_ms: u64,
    /// Map positive `delta_y` to `retreat` instead of `advance`.
    pub invert: bool,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_WHEEL_DEBOUNCE_MS,
            invert: false,
        }
    }
}

impl WheelConfig {
    /// Debounce window as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Auto-advance timer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAdvanceConfig {
    /// Whether the timer runs at all.
    pub enabled: bool,
    /// Time between automatic advances. Default: 3000 ms.
    pub period_ms: u64,
    /// Delay after the last interaction ends before the timer re-arms. Default: 1000 ms.
    pub resume_delay_ms: u64,
}

impl Default for AutoAdvanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_ms: DEFAULT_AUTO_ADVANCE_PERIOD_MS,
            resume_delay_ms: DEFAULT_AUTO_ADVANCE_RESUME_MS,
        }
    }
}

impl AutoAdvanceConfig {
    /// Period as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Resume delay as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// CarouselConfig
// ---------------------------------------------------------------------------

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Lock duration after a committed transition. Default: 500 ms.
    pub transition_cooldown_ms: u64,
    /// Index direction of a forward step.
    pub index_step: IndexStep,
    /// Drag/touch thresholds.
    pub gesture: GestureConfig,
    /// Wheel coalescing.
    pub wheel: WheelConfig,
    /// Auto-advance timer.
    pub auto_advance: AutoAdvanceConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            transition_cooldown_ms: DEFAULT_TRANSITION_COOLDOWN_MS,
            index_step: IndexStep::default(),
            gesture: GestureConfig::default(),
            wheel: WheelConfig::default(),
            auto_advance: AutoAdvanceConfig::default(),
        }
    }
}

impl CarouselConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("drag_threshold_px", self.gesture.drag_threshold_px),
            ("velocity_threshold", self.gesture.velocity_threshold),
            ("touch_slop_px", self.gesture.touch_slop_px),
            ("tap_threshold_px", self.gesture.tap_threshold_px),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        if self.transition_cooldown_ms == 0 {
            return Err(ConfigError::ZeroDuration("transition_cooldown_ms"));
        }
        if self.auto_advance.enabled && self.auto_advance.period_ms == 0 {
            return Err(ConfigError::ZeroDuration("auto_advance.period_ms"));
        }
        Ok(())
    }

    /// Cool-down as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn transition_cooldown(&self) -> Duration {
        Duration::from_millis(self.transition_cooldown_ms)
    }

    /// Set the forward index convention.
    #[must_use]
    pub fn with_index_step(mut self, step: IndexStep) -> Self {
        self.index_step = step;
        self
    }

    /// Set the transition cool-down.
    #[must_use]
    pub fn with_transition_cooldown(mut self, cooldown: Duration) -> Self {
        self.transition_cooldown_ms = duration_ms(cooldown);
        self
    }

    /// Set the auto-advance period, enabling the timer.
    #[must_use]
    pub fn with_auto_advance(mut self, period: Duration) -> Self {
        self.auto_advance.enabled = true;
        self.auto_advance.period_ms = duration_ms(period);
        self
    }

    /// Disable the auto-advance timer.
    #[must_use]
    pub fn without_auto_advance(mut self) -> Self {
        self.auto_advance.enabled = false;
        self
    }

    /// Invert the wheel direction mapping.
    #[must_use]
    pub fn with_inverted_wheel(mut self, invert: bool) -> Self {
        self.wheel.invert = invert;
        self
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
