use super::*;
use crate::config::PanelState;
use crate::test_support::{counter, Harness};
use slidepanel_core::{Point, Rect};
use slidepanel_foundation::{RegionMap, RegionTag};

#[test]
fn new_rejects_invalid_config() {
    let harness = Harness::new();
    let result = Panel::new(PanelConfig::new(300.0, 200.0), harness.runtime.frame_clock());
    assert!(matches!(result, Err(ConfigError::InvalidExtents { .. })));

    let result = Panel::new(
        PanelConfig::default().with_snap_point(1.0),
        harness.runtime.frame_clock(),
    );
    assert!(matches!(result, Err(ConfigError::SnapPointOutOfRange { .. })));
}

#[test]
fn default_state_sets_initial_position() {
    let harness = Harness::new();
    assert_eq!(harness.panel(PanelConfig::default()).position(), 0.0);
    let open = harness.panel(PanelConfig::default().with_default_state(PanelState::Open));
    assert_eq!(open.position(), 1.0);
    assert_eq!(open.frame().height, 500.0);
}

#[test]
fn open_fires_opened_once() {
    let mut harness = Harness::new();
    let (panel, controller) = harness.attached(PanelConfig::default());
    let (opened, on_opened) = counter();
    let (closed, on_closed) = counter();
    panel.on_opened(on_opened);
    panel.on_closed(on_closed);

    let completion = controller.open().unwrap();
    harness.settle(&panel, 120);
    harness.advance();
    harness.advance();

    assert_eq!(panel.position(), 1.0);
    assert!(completion.is_finished());
    assert_eq!(opened.get(), 1);
    assert_eq!(closed.get(), 0);
}

#[test]
fn position_listener_sees_monotonic_opening() {
    let mut harness = Harness::new();
    let (panel, controller) = harness.attached(PanelConfig::default());
    let samples = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&samples);
    panel.on_position_changed(move |value| sink.borrow_mut().push(value));

    controller.open().unwrap();
    harness.settle(&panel, 120);

    let samples = samples.borrow();
    assert!(samples.len() > 3);
    assert!(samples.windows(2).all(|pair| pair[1] >= pair[0]));
    assert_eq!(samples.last().copied(), Some(1.0));
}

#[test]
fn hidden_or_locked_panels_ignore_pointers() {
    let mut harness = Harness::new();
    let (panel, controller) = harness.attached(PanelConfig::default());
    controller.hide().unwrap();
    harness.settle(&panel, 10);
    assert!(!panel.is_visible());
    assert_eq!(
        panel.dispatch_pointer(&PointerEvent::down(Point::new(10.0, 400.0), 0)),
        PointerDisposition::Ignored
    );

    let locked = harness.panel(PanelConfig::default().with_draggable(false));
    assert_eq!(
        locked.dispatch_pointer(&PointerEvent::down(Point::new(10.0, 400.0), 0)),
        PointerDisposition::Ignored
    );
    assert_eq!(locked.gesture_phase(), GesturePhase::Idle);
}

#[test]
fn backdrop_tap_closes_only_when_configured() {
    let mut harness = Harness::new();
    let plain = harness.panel(PanelConfig::default().with_default_state(PanelState::Open));
    assert!(plain.on_backdrop_tap().is_none());

    let no_close = harness.panel(
        PanelConfig::default()
            .with_default_state(PanelState::Open)
            .with_backdrop(0.5, false),
    );
    assert!(no_close.on_backdrop_tap().is_none());

    let panel = harness.panel(
        PanelConfig::default()
            .with_default_state(PanelState::Open)
            .with_backdrop(0.5, true),
    );
    assert!(panel.on_backdrop_tap().is_some());
    harness.settle(&panel, 120);
    assert_eq!(panel.position(), 0.0);
}

#[test]
fn scroll_state_is_pinned_while_panel_partially_open() {
    let harness = Harness::new();
    let panel = harness.panel(PanelConfig::default());
    let scroll = ScrollState::new(0.0);
    scroll.set_extents(0.0, 800.0);
    panel.attach_scroll_state(&scroll);

    panel.dispatch_pointer(&PointerEvent::down(Point::new(10.0, 400.0), 0));
    scroll.dispatch_raw_delta(60.0);
    assert_eq!(scroll.value(), 0.0);

    panel.detach_scrollable();
    scroll.dispatch_raw_delta(60.0);
    assert_eq!(scroll.value(), 60.0);
}

#[test]
fn reentrant_dispatch_is_ignored() {
    let harness = Harness::new();
    let panel = Rc::new(harness.panel(PanelConfig::default()));
    let weak = Rc::downgrade(&panel);
    let nested = Rc::new(Cell::new(None));
    let nested_sink = Rc::clone(&nested);
    let phase = Rc::new(Cell::new(None));
    let phase_sink = Rc::clone(&phase);
    panel.on_position_changed(move |_| {
        if let Some(panel) = weak.upgrade() {
            phase_sink.set(Some(panel.gesture_phase()));
            let disposition =
                panel.dispatch_pointer(&PointerEvent::down(Point::new(0.0, 0.0), 99));
            nested_sink.set(Some(disposition));
        }
    });

    panel.dispatch_pointer(&PointerEvent::down(Point::new(10.0, 400.0), 0));
    assert_eq!(panel.gesture_phase(), GesturePhase::Classifying);
    panel.dispatch_pointer(&PointerEvent::moved(Point::new(10.0, 360.0), 10));

    assert_eq!(nested.get(), Some(PointerDisposition::Ignored));
    assert_eq!(phase.get(), Some(GesturePhase::Dragging));
    assert_eq!(panel.gesture_phase(), GesturePhase::Dragging);
    assert!((panel.position() - 0.1).abs() < 1e-9);
}

#[test]
fn hit_tester_classifies_on_down() {
    let harness = Harness::new();
    let panel = harness.panel(PanelConfig::default().with_default_state(PanelState::Open));
    panel.set_hit_tester(RegionMap::new().with_region(
        Rect::new(0.0, 0.0, 400.0, 50.0),
        1,
        RegionTag::IgnoreDraggable,
    ));

    assert_eq!(
        panel.dispatch_pointer(&PointerEvent::down(Point::new(10.0, 10.0), 0)),
        PointerDisposition::Ignored
    );
    panel.dispatch_pointer(&PointerEvent::moved(Point::new(10.0, 200.0), 10));
    assert_eq!(panel.position(), 1.0);
}

#[test]
fn dispose_cancels_motion_and_detaches() {
    let mut harness = Harness::new();
    let (panel, controller) = harness.attached(PanelConfig::default());
    let completion = controller.open().unwrap();
    harness.advance();
    assert!(panel.is_animating());

    panel.dispose();
    panel.dispose();

    assert!(completion.is_cancelled());
    assert!(!panel.is_animating());
    assert!(!controller.is_attached());
    assert_eq!(
        panel.dispatch_pointer(&PointerEvent::down(Point::new(10.0, 400.0), 0)),
        PointerDisposition::Ignored
    );
    assert!(!harness.runtime.has_frame_callbacks());
}

#[test]
fn dropping_panel_detaches_controller() {
    let mut harness = Harness::new();
    let (panel, controller) = harness.attached(PanelConfig::default());
    let completion = controller.open().unwrap();
    harness.advance();

    drop(panel);
    harness.advance();

    assert!(completion.is_cancelled());
    assert!(controller.open().unwrap_err().is_not_attached());
}
