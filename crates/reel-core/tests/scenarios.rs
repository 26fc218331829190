//! End-to-end interaction scenarios driven through `CarouselEngine::handle`.
//!
//! Each test replays a host event stream (timestamps in ms) and checks the
//! committed index changes and the layouts the renderer would receive.

use std::time::Duration;

use pretty_assertions::assert_eq;
use reel_core::engine::{EnginePhase, Response, Transition};
use reel_core::{CarouselConfig, CarouselEngine, CarouselInput, Layout, NavKey, Slot};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn engine(n: usize) -> CarouselEngine<Vec<Layout>> {
    CarouselEngine::new(
        n,
        CarouselConfig::default().without_auto_advance(),
        Vec::<Layout>::new(),
    )
    .expect("valid engine")
}

fn committed(engine: &CarouselEngine<Vec<Layout>>) -> Vec<usize> {
    engine
        .sink()
        .iter()
        .filter(|layout| !layout.instant)
        .map(|layout| layout.current)
        .collect()
}

// ── Lock ─────────────────────────────────────────────────────────────

#[test]
fn five_cards_advance_lock_release() {
    let mut e = engine(5);
    e.advance(ms(0));
    assert_eq!(e.current_index(), 1);
    assert_eq!(e.advance(ms(200)), Transition::Dropped);
    assert_eq!(e.current_index(), 1);
    e.advance(ms(500));
    assert_eq!(e.current_index(), 2);
    assert_eq!(committed(&e), vec![1, 2]);
}

// ── Pointer drags ─────────────────────────────────────────────────────

#[test]
fn slow_sixty_pixel_drag_commits_once() {
    let mut e = engine(5);
    e.handle(CarouselInput::PointerDown {
        x: 400.0,
        now: ms(0),
    });
    e.handle(CarouselInput::PointerMove {
        x: 430.0,
        now: ms(400),
    });
    e.handle(CarouselInput::PointerMove {
        x: 460.0,
        now: ms(800),
    });
    assert!(e.is_dragging());
    let r = e.handle(CarouselInput::PointerUp {
        x: 460.0,
        now: ms(810),
    });
    assert_eq!(
        r,
        Response::Transition(Transition::Committed {
            from: 0,
            to: 4,
            offset: -1
        })
    );
    assert!(!e.is_dragging());
    assert_eq!(e.drag_velocity(), 0.0);
    assert_eq!(committed(&e), vec![4]);
}

#[test]
fn short_slow_drag_commits_nothing() {
    let mut e = engine(5);
    e.handle(CarouselInput::PointerDown { x: 0.0, now: ms(0) });
    e.handle(CarouselInput::PointerMove {
        x: 20.0,
        now: ms(200),
    });
    let r = e.handle(CarouselInput::PointerUp {
        x: 20.0,
        now: ms(210),
    });
    assert_eq!(r, Response::Nothing);
    assert_eq!(e.current_index(), 0);
    assert!(e.sink().is_empty());
}

#[test]
fn drag_ending_during_cooldown_is_dropped() {
    let mut e = engine(5);
    e.advance(ms(0));
    e.handle(CarouselInput::PointerDown {
        x: 0.0,
        now: ms(50),
    });
    assert_eq!(e.phase(ms(50)), EnginePhase::Dragging);
    e.handle(CarouselInput::PointerMove {
        x: -200.0,
        now: ms(150),
    });
    let r = e.handle(CarouselInput::PointerUp {
        x: -200.0,
        now: ms(200),
    });
    assert_eq!(r, Response::Transition(Transition::Dropped));
    assert_eq!(e.current_index(), 1);
    assert_eq!(e.phase(ms(200)), EnginePhase::Animating);
}

// ── Touch ─────────────────────────────────────────────────────────────

#[test]
fn horizontal_touch_commits_vertical_does_not() {
    let mut e = engine(5);
    e.handle(CarouselInput::TouchStart {
        x: 200.0,
        y: 300.0,
        now: ms(0),
    });
    e.handle(CarouselInput::TouchMove {
        x: 120.0,
        y: 290.0,
        now: ms(300),
    });
    let r = e.handle(CarouselInput::TouchEnd {
        x: 120.0,
        y: 290.0,
        now: ms(310),
    });
    assert!(matches!(r, Response::Transition(t) if t.is_committed()));
    assert_eq!(e.current_index(), 1);

    e.handle(CarouselInput::TouchStart {
        x: 200.0,
        y: 300.0,
        now: ms(1000),
    });
    e.handle(CarouselInput::TouchMove {
        x: 190.0,
        y: 220.0,
        now: ms(1300),
    });
    let r = e.handle(CarouselInput::TouchEnd {
        x: 190.0,
        y: 220.0,
        now: ms(1310),
    });
    assert_eq!(r, Response::Nothing);
    assert_eq!(e.current_index(), 1);
    assert_eq!(committed(&e), vec![1]);
}

#[test]
fn touch_cancel_discards_gesture() {
    let mut e = engine(5);
    e.handle(CarouselInput::TouchStart {
        x: 0.0,
        y: 0.0,
        now: ms(0),
    });
    e.handle(CarouselInput::TouchMove {
        x: -300.0,
        y: 0.0,
        now: ms(50),
    });
    assert!(e.drag_velocity() < 0.0);
    assert_eq!(
        e.handle(CarouselInput::TouchCancel { now: ms(60) }),
        Response::Nothing
    );
    assert!(!e.is_dragging());
    assert_eq!(e.drag_velocity(), 0.0);
    let r = e.handle(CarouselInput::TouchEnd {
        x: -300.0,
        y: 0.0,
        now: ms(70),
    });
    assert_eq!(r, Response::Nothing);
    assert_eq!(e.current_index(), 0);
}

#[test]
fn quick_double_tap_is_reported() {
    let mut e = engine(3);
    e.handle(CarouselInput::TouchStart {
        x: 10.0,
        y: 10.0,
        now: ms(0),
    });
    assert_eq!(
        e.handle(CarouselInput::TouchEnd {
            x: 10.0,
            y: 10.0,
            now: ms(60)
        }),
        Response::Tap { double: false }
    );
    e.handle(CarouselInput::TouchStart {
        x: 10.0,
        y: 10.0,
        now: ms(150),
    });
    assert_eq!(
        e.handle(CarouselInput::TouchEnd {
            x: 11.0,
            y: 10.0,
            now: ms(200)
        }),
        Response::Tap { double: true }
    );
    assert_eq!(e.current_index(), 0);
}

// ── Wheel ─────────────────────────────────────────────────────────────

#[test]
fn wheel_burst_commits_exactly_one_advance() {
    let mut e = engine(5);
    for t in [0, 10, 20, 30, 40] {
        assert_eq!(
            e.handle(CarouselInput::Wheel {
                delta_y: 53.0,
                now: ms(t)
            }),
            Response::Pending
        );
    }
    assert_eq!(e.current_index(), 0);
    assert_eq!(
        e.handle(CarouselInput::Tick { now: ms(60) }),
        Response::Nothing
    );
    assert!(matches!(
        e.handle(CarouselInput::Tick { now: ms(90) }),
        Response::Transition(Transition::Committed { to: 1, .. })
    ));
    e.handle(CarouselInput::Tick { now: ms(400) });
    assert_eq!(committed(&e), vec![1]);
}

#[test]
fn blur_cancels_pending_wheel() {
    let mut e = engine(5);
    e.handle(CarouselInput::Wheel {
        delta_y: -1.0,
        now: ms(0),
    });
    e.handle(CarouselInput::Blur { now: ms(20) });
    e.handle(CarouselInput::Tick { now: ms(200) });
    assert_eq!(e.current_index(), 0);
    assert!(e.sink().is_empty());
}

#[test]
fn wheel_up_retreats() {
    let mut e = engine(4);
    e.handle(CarouselInput::Wheel {
        delta_y: -10.0,
        now: ms(0),
    });
    e.tick(ms(50));
    assert_eq!(e.current_index(), 3);
}

// ── Clicks and keys ─────────────────────────────────────────────────

#[test]
fn click_jumps_backward_on_eight_cards() {
    let mut e = engine(8);
    let r = e.handle(CarouselInput::CardClicked {
        index: 5,
        now: ms(0),
    });
    assert_eq!(
        r,
        Response::Transition(Transition::Committed {
            from: 0,
            to: 5,
            offset: -3
        })
    );
    assert_eq!(e.sink().len(), 1);
    assert_eq!(e.sink()[0].slot_of(5), Some(Slot::Center));
}

#[test]
fn arrow_keys_step_and_respect_lock() {
    let mut e = engine(3);
    e.handle(CarouselInput::Key {
        key: NavKey::Left,
        now: ms(0),
    });
    assert_eq!(e.current_index(), 2);
    let r = e.handle(CarouselInput::Key {
        key: NavKey::Right,
        now: ms(100),
    });
    assert_eq!(r, Response::Transition(Transition::Dropped));
    e.handle(CarouselInput::Key {
        key: NavKey::Right,
        now: ms(600),
    });
    assert_eq!(e.current_index(), 0);
}

// ── Auto-advance ─────────────────────────────────────────────────────

#[test]
fn auto_advance_runs_and_pauses_for_interaction() {
    let mut e = CarouselEngine::new(4, CarouselConfig::default(), Vec::<Layout>::new()).unwrap();
    e.mount(ms(0));
    assert!(e.tick(ms(2999)).is_none());
    assert!(matches!(
        e.tick(ms(3000)),
        Some(Transition::Committed { to: 1, .. })
    ));

    e.handle(CarouselInput::PointerEnter { now: ms(4000) });
    assert!(e.tick(ms(6000)).is_none());
    assert!(e.tick(ms(20_000)).is_none());
    e.handle(CarouselInput::PointerLeave { now: ms(20_000) });
    // Resume after 1s, then a full period.
    assert!(e.tick(ms(23_999)).is_none());
    assert!(matches!(
        e.tick(ms(24_000)),
        Some(Transition::Committed { to: 2, .. })
    ));
    assert_eq!(e.current_index(), 2);
}

#[test]
fn auto_advance_drops_when_user_transition_in_flight() {
    let mut e = CarouselEngine::new(4, CarouselConfig::default(), ()).unwrap();
    e.mount(ms(0));
    e.advance(ms(2800));
    assert_eq!(e.tick(ms(3000)), Some(Transition::Dropped));
    assert_eq!(e.current_index(), 1);
    assert!(matches!(
        e.tick(ms(6000)),
        Some(Transition::Committed { to: 2, .. })
    ));
}

#[test]
fn touch_suspends_auto_advance_until_resume_delay() {
    let mut e = CarouselEngine::new(4, CarouselConfig::default(), ()).unwrap();
    e.mount(ms(0));
    e.handle(CarouselInput::TouchStart {
        x: 0.0,
        y: 0.0,
        now: ms(2500),
    });
    assert!(e.tick(ms(3000)).is_none());
    e.handle(CarouselInput::TouchEnd {
        x: 0.0,
        y: 0.0,
        now: ms(3100),
    });
    assert!(e.auto_advance().is_suspended());
    assert_eq!(e.auto_advance().next_due(), Some(ms(7100)));
    assert!(e.tick(ms(7099)).is_none());
    assert_eq!(e.current_index(), 0);
    assert!(e.tick(ms(7100)).is_some());
    assert_eq!(e.current_index(), 1);
}

// ── Drag direction ───────────────────────────────────────────────

#[test]
fn short_rightward_drag_with_leftward_flick_retreats() {
    let mut e = engine(5);
    e.handle(CarouselInput::PointerDown { x: 0.0, now: ms(0) });
    e.handle(CarouselInput::PointerMove {
        x: 130.0,
        now: ms(100),
    });
    e.handle(CarouselInput::PointerMove {
        x: 30.0,
        now: ms(150),
    });
    let r = e.handle(CarouselInput::PointerUp {
        x: 30.0,
        now: ms(160),
    });
    assert!(matches!(
        r,
        Response::Transition(Transition::Committed { to: 4, .. })
    ));
}
