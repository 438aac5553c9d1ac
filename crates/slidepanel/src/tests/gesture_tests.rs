use super::*;
use slidepanel_core::{Rect, Runtime};
use slidepanel_foundation::{RegionMap, RegionTag};

fn release(position: f64, velocity_y: f64) -> ReleaseContext {
    ReleaseContext {
        position,
        velocity: Velocity::new(0.0, velocity_y),
        is_animating: false,
        scrolling_enabled: false,
    }
}

fn snapping(snap: f64) -> PanelConfig {
    PanelConfig::default().with_snap_point(snap)
}

#[test]
fn release_is_skipped_while_animating_or_scrolling() {
    let config = PanelConfig::default();
    let mut cx = release(0.4, 2_000.0);
    cx.is_animating = true;
    assert_eq!(decide_release(&config, &cx), ReleaseAction::Hold);

    let mut cx = release(1.0, 2_000.0);
    cx.scrolling_enabled = true;
    assert_eq!(decide_release(&config, &cx), ReleaseAction::Hold);
}

#[test]
fn fast_closing_release_flings_closed_without_snap_point() {
    let config = PanelConfig::default();
    for position in [0.1, 0.5, 0.9, 1.0] {
        assert_eq!(
            decide_release(&config, &release(position, 500.0)),
            ReleaseAction::Fling { velocity: -1.25 }
        );
    }
}

#[test]
fn fast_release_springs_to_snap_point_unless_nearest_or_overridden() {
    let config = snapping(0.5);

    assert_eq!(
        decide_release(&config, &release(0.875, 500.0)),
        ReleaseAction::SpringTo {
            target: 0.5,
            velocity: -1.25
        }
    );
    // Nearest resting point is the snap point itself.
    assert_eq!(
        decide_release(&config, &release(0.5, -500.0)),
        ReleaseAction::Fling { velocity: 1.25 }
    );
    // Eight times the threshold skips the snap point.
    assert_eq!(
        decide_release(&config, &release(0.875, 3_000.0)),
        ReleaseAction::Fling { velocity: -7.5 }
    );
}

#[test]
fn fast_release_without_snapping_coasts() {
    let config = PanelConfig::default().with_panel_snapping(false);

    match decide_release(&config, &release(0.5, -400.0)) {
        ReleaseAction::Coast { target, duration } => {
            assert!((target - 0.66).abs() < 1e-9, "coast target {target}");
            assert_eq!(duration, Duration::from_millis(410));
        }
        other => panic!("expected coast, got {other:?}"),
    }
    assert_eq!(
        decide_release(&config, &release(0.95, -4_000.0)),
        ReleaseAction::Coast {
            target: 1.0,
            duration: Duration::from_millis(410)
        }
    );
}

#[test]
fn slow_release_goes_to_nearest_resting_point() {
    let config = PanelConfig::default();
    assert_eq!(
        decide_release(&config, &release(0.375, 100.0)),
        ReleaseAction::Fling { velocity: -1.0 }
    );
    assert_eq!(
        decide_release(&config, &release(0.625, 100.0)),
        ReleaseAction::Fling { velocity: 1.0 }
    );
    // Tie between closed and open resolves to closed.
    assert_eq!(
        decide_release(&config, &release(0.5, 0.0)),
        ReleaseAction::Fling { velocity: -1.0 }
    );
}

#[test]
fn slow_release_ties_prefer_closed_then_snap() {
    let config = snapping(0.25);
    assert_eq!(
        decide_release(&config, &release(0.125, 0.0)),
        ReleaseAction::Fling { velocity: -1.0 }
    );
    assert_eq!(
        decide_release(&config, &release(0.625, 0.0)),
        ReleaseAction::SpringTo {
            target: 0.25,
            velocity: 0.0
        }
    );
}

#[test]
fn release_at_snap_point_springs_in_place() {
    let config = snapping(0.5);
    assert_eq!(
        decide_release(&config, &release(0.5, 0.0)),
        ReleaseAction::SpringTo {
            target: 0.5,
            velocity: 0.0
        }
    );
}

#[test]
fn slow_release_without_snapping_holds() {
    let config = PanelConfig::default().with_panel_snapping(false);
    assert_eq!(
        decide_release(&config, &release(0.4, 100.0)),
        ReleaseAction::Hold
    );
}

#[test]
fn downward_panel_flips_visual_velocity() {
    let config = PanelConfig::default().with_slide_direction(SlideDirection::Down);
    assert_eq!(
        decide_release(&config, &release(0.5, 500.0)),
        ReleaseAction::Fling { velocity: 1.25 }
    );
}

#[test]
fn non_finite_velocity_counts_as_slow() {
    let config = PanelConfig::default();
    assert_eq!(
        decide_release(&config, &release(0.25, f64::NAN)),
        ReleaseAction::Fling { velocity: -1.0 }
    );
}

struct MachineFixture {
    _runtime: Runtime,
    config: PanelConfig,
    value: AnimationValue,
    scroll: ScrollCoordinator,
    regions: RegionMap,
    machine: GestureStateMachine,
}

impl MachineFixture {
    fn new(position: f64) -> Self {
        let runtime = Runtime::default();
        let value = AnimationValue::new(position, runtime.frame_clock());
        let regions = RegionMap::new()
            .with_region(Rect::new(0.0, 0.0, 400.0, 40.0), 1, RegionTag::IgnoreDraggable)
            .with_region(
                Rect::new(0.0, 100.0, 400.0, 80.0),
                1,
                RegionTag::HorizontalScrollable,
            );
        Self {
            _runtime: runtime,
            config: PanelConfig::default(),
            value,
            scroll: ScrollCoordinator::new(),
            regions,
            machine: GestureStateMachine::new(),
        }
    }

    fn send(&mut self, event: PointerEvent) -> PointerDisposition {
        let cx = GestureContext {
            config: &self.config,
            value: &self.value,
            scroll: &self.scroll,
            hit_tester: Some(&self.regions),
        };
        self.machine.handle(&event, &cx)
    }
}

#[test]
fn vertical_drag_moves_panel_and_fling_on_release() {
    let mut fixture = MachineFixture::new(0.0);
    let x = 200.0;

    assert_eq!(
        fixture.send(PointerEvent::down(Point::new(x, 400.0), 0)),
        PointerDisposition::Panel
    );
    assert_eq!(fixture.machine.phase(), GesturePhase::Classifying);

    for step in 1..=4 {
        let y = 400.0 - 30.0 * step as f64;
        assert_eq!(
            fixture.send(PointerEvent::moved(Point::new(x, y), step * 10)),
            PointerDisposition::Panel
        );
    }
    assert_eq!(fixture.machine.phase(), GesturePhase::Dragging);
    assert_eq!(
        fixture.machine.session().map(|session| session.axis_lock),
        Some(AxisLock::Vertical)
    );
    assert!((fixture.value.value() - 0.3).abs() < 1e-9);

    fixture.send(PointerEvent::up(Point::new(x, 280.0), 45));
    assert_eq!(fixture.machine.phase(), GesturePhase::Idle);
    assert!(fixture.machine.session().is_none());
    assert!(fixture.value.is_animating());
}

#[test]
fn ignore_draggable_session_never_touches_panel() {
    let mut fixture = MachineFixture::new(0.5);

    assert_eq!(
        fixture.send(PointerEvent::down(Point::new(10.0, 20.0), 0)),
        PointerDisposition::Ignored
    );
    assert!(fixture.machine.session().is_some_and(|session| session.ignored));
    assert_eq!(
        fixture.send(PointerEvent::moved(Point::new(10.0, 200.0), 10)),
        PointerDisposition::Ignored
    );
    assert_eq!(
        fixture.machine.session().map(|session| session.axis_lock),
        Some(AxisLock::Unlocked)
    );
    assert_eq!(
        fixture.send(PointerEvent::up(Point::new(10.0, 200.0), 20)),
        PointerDisposition::Ignored
    );
    assert_eq!(fixture.value.value(), 0.5);
    assert!(!fixture.value.is_animating());
}

#[test]
fn horizontal_lock_on_horizontal_child_ignores_moves() {
    let mut fixture = MachineFixture::new(0.5);

    fixture.send(PointerEvent::down(Point::new(50.0, 120.0), 0));
    assert_eq!(
        fixture.send(PointerEvent::moved(Point::new(90.0, 125.0), 10)),
        PointerDisposition::HorizontalChild
    );
    assert_eq!(
        fixture.send(PointerEvent::moved(Point::new(100.0, 60.0), 20)),
        PointerDisposition::HorizontalChild
    );
    assert_eq!(fixture.value.value(), 0.5);
    assert_eq!(
        fixture.machine.session().map(|session| session.axis_lock),
        Some(AxisLock::Horizontal)
    );
}

#[test]
fn vertical_lock_on_horizontal_child_drags_panel() {
    let mut fixture = MachineFixture::new(0.5);

    fixture.send(PointerEvent::down(Point::new(50.0, 120.0), 0));
    assert_eq!(
        fixture.send(PointerEvent::moved(Point::new(52.0, 80.0), 10)),
        PointerDisposition::Panel
    );
    assert!((fixture.value.value() - 0.6).abs() < 1e-9);
}

#[test]
fn cancel_settles_with_zero_velocity() {
    let mut fixture = MachineFixture::new(0.0);

    fixture.send(PointerEvent::down(Point::new(200.0, 400.0), 0));
    for step in 1..=4 {
        let y = 400.0 - 30.0 * step as f64;
        fixture.send(PointerEvent::moved(Point::new(200.0, y), step * 10));
    }
    fixture.send(PointerEvent::cancel(Point::new(200.0, 280.0), 45));

    // A zero-velocity release at 0.3 heads for the closed position.
    assert_eq!(fixture.machine.phase(), GesturePhase::Idle);
    assert!(fixture.value.is_animating());
    assert!(fixture.value.velocity() <= 0.0);
}

#[test]
fn moves_without_session_or_from_other_pointers_are_ignored() {
    let mut fixture = MachineFixture::new(0.5);
    assert_eq!(
        fixture.send(PointerEvent::moved(Point::new(0.0, 300.0), 0)),
        PointerDisposition::Ignored
    );

    fixture.send(PointerEvent::down(Point::new(200.0, 400.0), 0).with_id(1));
    assert_eq!(
        fixture.send(PointerEvent::moved(Point::new(200.0, 300.0), 10).with_id(2)),
        PointerDisposition::Ignored
    );
    assert_eq!(
        fixture.send(PointerEvent::up(Point::new(200.0, 300.0), 20).with_id(2)),
        PointerDisposition::Ignored
    );
    assert_eq!(fixture.value.value(), 0.5);
}

#[test]
fn new_pointer_down_replaces_session() {
    let mut fixture = MachineFixture::new(0.5);
    fixture.send(PointerEvent::down(Point::new(200.0, 400.0), 0).with_id(1));
    fixture.send(PointerEvent::down(Point::new(200.0, 300.0), 5).with_id(2));

    assert_eq!(
        fixture.machine.session().map(|session| session.pointer),
        Some(2)
    );
}

#[test]
fn shared_phase_follows_the_session() {
    let mut fixture = MachineFixture::new(0.5);
    let phase = fixture.machine.phase_cell();
    assert_eq!(phase.get(), GesturePhase::Idle);

    fixture.send(PointerEvent::down(Point::new(200.0, 400.0), 0));
    assert_eq!(phase.get(), GesturePhase::Classifying);
    fixture.send(PointerEvent::moved(Point::new(200.0, 380.0), 10));
    assert_eq!(phase.get(), GesturePhase::Dragging);
    fixture.send(PointerEvent::up(Point::new(200.0, 380.0), 10));
    assert_eq!(phase.get(), GesturePhase::Idle);
}
