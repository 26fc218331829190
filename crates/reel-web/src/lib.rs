#![forbid(unsafe_code)]

//! WASM frontend for the reel carousel.
//!
//! The page keeps ownership of the DOM. It forwards events to
//! [`ReelCarousel::input`] as JSON (see [`input`]) and applies the slot class
//! names it receives through the `onLayout` callback. A
//! `requestAnimationFrame` loop (or a coarse `setInterval`) calls `tick` so
//! debounced wheel decisions, the transition cool-down, and auto-advance run
//! on time.

pub mod input;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::ReelCarousel;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct ReelCarousel;

#[cfg(not(target_arch = "wasm32"))]
impl ReelCarousel {
    pub fn new() -> Self {
        Self
    }
}
