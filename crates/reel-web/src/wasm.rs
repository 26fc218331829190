#![forbid(unsafe_code)]

use reel_core::{CarouselConfig, CarouselEngine, Layout, LayoutSink};
use wasm_bindgen::prelude::*;

use crate::input::{dispatch, duration_from_ms};

/// Forwards layouts to the page's `onLayout(current, classNames, instant)`.
#[derive(Debug, Default)]
struct JsLayoutSink {
    callback: Option<js_sys::Function>,
}

impl LayoutSink for JsLayoutSink {
    fn request_layout(&mut self, layout: &Layout) {
        let Some(callback) = &self.callback else {
            return;
        };
        let current = JsValue::from(layout.current as u32);
        let instant = JsValue::from_bool(layout.instant);
        if let Err(err) = callback.call3(&JsValue::NULL, &current, &class_array(layout), &instant) {
            web_sys::console::error_1(&err);
        }
    }
}

fn class_array(layout: &Layout) -> js_sys::Array {
    layout
        .class_names()
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}

/// JS-facing carousel.
///
/// All timestamps are `performance.now()` milliseconds.
#[wasm_bindgen]
pub struct ReelCarousel {
    engine: CarouselEngine<JsLayoutSink>,
    destroyed: bool,
}

#[wasm_bindgen]
impl ReelCarousel {
    /// Create a carousel over `card_count` cards.
    ///
    /// `options` is an optional JSON object with any subset of the engine
    /// configuration, e.g. `{"wheel":{"invert":true}}`.
    #[wasm_bindgen(constructor)]
    pub fn new(card_count: u32, options: Option<String>) -> Result<ReelCarousel, JsValue> {
        let config = match options.as_deref() {
            Some(json) => CarouselConfig::from_json_str(json).map_err(to_js_error)?,
            None => CarouselConfig::default(),
        };
        let engine = CarouselEngine::new(card_count as usize, config, JsLayoutSink::default())
            .map_err(to_js_error)?;
        Ok(Self {
            engine,
            destroyed: false,
        })
    }

    /// Register the layout callback, replacing any previous one.
    #[wasm_bindgen(js_name = onLayout)]
    pub fn on_layout(&mut self, callback: js_sys::Function) {
        self.engine.sink_mut().callback = Some(callback);
    }

    /// Emit the initial (instant) layout and start auto-advance.
    pub fn mount(&mut self, now_ms: f64) {
        if self.destroyed {
            return;
        }
        self.engine.mount(duration_from_ms(now_ms));
    }

    /// Feed one DOM event encoded as JSON. Returns the outcome label.
    pub fn input(&mut self, event: &str) -> Result<String, JsValue> {
        if self.destroyed {
            return Ok("ignored".to_string());
        }
        dispatch(&mut self.engine, event)
            .map(str::to_string)
            .map_err(to_js_error)
    }

    /// Advance time. Returns whether the index changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.destroyed {
            return false;
        }
        self.engine
            .tick(duration_from_ms(now_ms))
            .is_some_and(|t| t.is_committed())
    }

    /// Centered card.
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> u32 {
        self.engine.current_index() as u32
    }

    /// Slot class name of every card, in card order.
    pub fn slots(&self) -> js_sys::Array {
        class_array(&self.engine.layout(false))
    }

    /// Whether a transition is still cooling down at `now_ms`.
    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.engine.is_animating(duration_from_ms(now_ms))
    }

    /// Horizontal swipe progress as a fraction of the viewport width.
    #[wasm_bindgen(js_name = swipeProgress)]
    pub fn swipe_progress(&self) -> Option<f64> {
        self.engine.swipe_progress()
    }

    /// Explicit teardown for JS callers. Drops the callback so the page's
    /// closures can be reclaimed; later calls are no-ops.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.engine.sink_mut().callback = None;
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
