#![forbid(unsafe_code)]

//! Core: a host-driven carousel interaction engine.
//!
//! The engine owns the centered index, classifies drag/touch/wheel input into
//! direction decisions, guards committed transitions with a cool-down lock, and
//! drives an auto-advance timer. It never touches a DOM and never reads a
//! clock: the host pushes [`event::CarouselInput`] values stamped with a
//! monotonic [`Duration`](std::time::Duration) and receives
//! [`slot::Layout`] requests through a [`slot::LayoutSink`].

pub mod auto_advance;
pub mod config;
pub mod engine;
pub mod event;
pub mod gesture;
pub mod logging;
pub mod slot;
pub mod wheel;

pub use config::{CarouselConfig, ConfigError};
pub use engine::{CarouselEngine, CarouselError, EnginePhase, Response, Transition};
pub use event::{CarouselInput, Direction, NavKey};
pub use slot::{Layout, LayoutSink, Slot};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
