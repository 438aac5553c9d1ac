//! Pointer gesture state machine and the release decision.
//!
//! Phases run `Idle -> Classifying` on pointer-down, `Classifying -> Dragging`
//! on the first move, and back to `Idle` on pointer-up or cancel.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use slidepanel_animation::{AnimationSpec, AnimationValue, Easing, MotionCompletion, SpringSpec};
use slidepanel_core::{Point, Velocity};
use slidepanel_foundation::gesture_constants::{
    COAST_DURATION_MILLIS, COAST_VELOCITY_FACTOR, MAX_FLING_VELOCITY,
};
use slidepanel_foundation::{
    HitClass, HitTester, PointerEvent, PointerEventKind, PointerId, VelocityTracker,
};

use crate::config::{PanelConfig, SlideDirection};
use crate::scroll_coordinator::{MoveRoute, ScrollCoordinator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Classifying,
    Dragging,
}

/// Axis a gesture committed to on its first move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    Unlocked,
    Horizontal,
    Vertical,
}

/// Per pointer-down state, discarded on pointer-up.
#[derive(Debug, Clone)]
pub struct GestureSession {
    pub pointer: PointerId,
    pub hit_class: HitClass,
    pub axis_lock: AxisLock,
    pub last_position: Point,
    /// Session belongs to an ignore-draggable region and never touches the panel.
    pub ignored: bool,
}

/// Who consumed a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDisposition {
    Panel,
    Scroll,
    HorizontalChild,
    Ignored,
}

/// Panel state sampled at release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseContext {
    pub position: f64,
    pub velocity: Velocity,
    pub is_animating: bool,
    pub scrolling_enabled: bool,
}

/// Motion chosen when the pointer lifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseAction {
    /// Leave the panel where it is.
    Hold,
    /// Spring toward the bound matching the sign of `velocity`.
    Fling { velocity: f64 },
    /// Spring to an intermediate position.
    SpringTo { target: f64, velocity: f64 },
    /// Decelerating tween over `duration`.
    Coast { target: f64, duration: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RestingPoint {
    Closed,
    Snap,
    Open,
}

/// Cap on the tracked release velocity. Never below the snap override speed,
/// so the override stays reachable.
fn max_release_velocity(config: &PanelConfig) -> f64 {
    MAX_FLING_VELOCITY.max(config.fling_threshold * config.snap_override_multiplier)
}

/// Signed release velocity in positions per second.
fn visual_velocity(velocity_y: f64, config: &PanelConfig) -> f64 {
    let vv = -velocity_y / config.range();
    match config.slide_direction {
        SlideDirection::Up => vv,
        SlideDirection::Down => -vv,
    }
}

pub fn decide_release(config: &PanelConfig, cx: &ReleaseContext) -> ReleaseAction {
    if cx.is_animating {
        return ReleaseAction::Hold;
    }
    if cx.position >= 1.0 && cx.scrolling_enabled {
        return ReleaseAction::Hold;
    }

    let position = cx.position;
    let speed = if cx.velocity.y.is_finite() {
        cx.velocity.y
    } else {
        0.0
    };
    let vv = visual_velocity(speed, config);

    let d_close = position;
    let d_open = 1.0 - position;
    let d_snap = config
        .snap_point
        .map_or(f64::INFINITY, |snap| (snap - position).abs());

    // Ties resolve in the order closed, snap, open.
    let mut nearest = (RestingPoint::Closed, d_close);
    if d_snap < nearest.1 {
        nearest = (RestingPoint::Snap, d_snap);
    }
    if d_open < nearest.1 {
        nearest = (RestingPoint::Open, d_open);
    }
    let min_distance = nearest.1;

    if speed.abs() >= config.fling_threshold {
        if config.panel_snapping {
            if let Some(snap) = config.snap_point {
                let override_snap =
                    speed.abs() >= config.snap_override_multiplier * config.fling_threshold;
                if override_snap || min_distance == d_snap {
                    ReleaseAction::Fling { velocity: vv }
                } else {
                    ReleaseAction::SpringTo {
                        target: snap,
                        velocity: vv,
                    }
                }
            } else {
                ReleaseAction::Fling { velocity: vv }
            }
        } else {
            ReleaseAction::Coast {
                target: (position + vv * COAST_VELOCITY_FACTOR).clamp(0.0, 1.0),
                duration: Duration::from_millis(COAST_DURATION_MILLIS),
            }
        }
    } else if config.panel_snapping {
        match nearest.0 {
            RestingPoint::Closed => ReleaseAction::Fling { velocity: -1.0 },
            RestingPoint::Open => ReleaseAction::Fling { velocity: 1.0 },
            RestingPoint::Snap => ReleaseAction::SpringTo {
                target: config.snap_point.unwrap_or(position),
                velocity: vv,
            },
        }
    } else {
        ReleaseAction::Hold
    }
}

/// Starts the motion for `action`; `None` for [`ReleaseAction::Hold`].
pub fn apply_release(action: ReleaseAction, value: &AnimationValue) -> Option<MotionCompletion> {
    match action {
        ReleaseAction::Hold => None,
        ReleaseAction::Fling { velocity } => Some(value.fling(velocity)),
        ReleaseAction::SpringTo { target, velocity } => Some(value.run_spring(
            SpringSpec::default(),
            value.value(),
            target,
            velocity,
        )),
        ReleaseAction::Coast { target, duration } => Some(value.animate_to(
            target,
            AnimationSpec::tween(duration.as_millis() as u64, Easing::Decelerate),
        )),
    }
}

/// Collaborators the state machine reads and drives while handling one event.
pub(crate) struct GestureContext<'a> {
    pub config: &'a PanelConfig,
    pub value: &'a AnimationValue,
    pub scroll: &'a ScrollCoordinator,
    pub hit_tester: Option<&'a dyn HitTester>,
}

#[derive(Debug, Default)]
pub struct GestureStateMachine {
    phase: Rc<Cell<GesturePhase>>,
    session: Option<GestureSession>,
    tracker: VelocityTracker,
}

impl GestureStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase.get()
    }

    /// Shared view of the phase, readable while an event is being handled.
    pub(crate) fn phase_cell(&self) -> Rc<Cell<GesturePhase>> {
        Rc::clone(&self.phase)
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub(crate) fn handle(
        &mut self,
        event: &PointerEvent,
        cx: &GestureContext<'_>,
    ) -> PointerDisposition {
        match event.kind {
            PointerEventKind::Down => self.on_down(event, cx),
            PointerEventKind::Move => self.on_move(event, cx),
            PointerEventKind::Up => self.on_release(event, cx, false),
            PointerEventKind::Cancel => self.on_release(event, cx, true),
        }
    }

    fn on_down(&mut self, event: &PointerEvent, cx: &GestureContext<'_>) -> PointerDisposition {
        if let Some(previous) = self.session.take() {
            log::debug!(
                "pointer {} down replaced unfinished session of pointer {}",
                event.id,
                previous.pointer
            );
        }
        self.tracker.reset();

        let hit_class = cx
            .hit_tester
            .map_or(HitClass::Normal, |tester| tester.classify_at(event.position));
        let ignored = hit_class.is_ignore_draggable();
        self.session = Some(GestureSession {
            pointer: event.id,
            hit_class,
            axis_lock: AxisLock::Unlocked,
            last_position: event.position,
            ignored,
        });
        self.phase.set(GesturePhase::Classifying);

        if ignored {
            cx.scroll.clear_force_drag();
            log::debug!("pointer {} down on ignore-draggable region", event.id);
            return PointerDisposition::Ignored;
        }

        cx.scroll.begin_session(cx.value.value(), hit_class);
        self.tracker.add_position(event.timestamp_ms, event.position);
        log::trace!("pointer {} down classified as {hit_class:?}", event.id);
        PointerDisposition::Panel
    }

    fn on_move(&mut self, event: &PointerEvent, cx: &GestureContext<'_>) -> PointerDisposition {
        let Some(session) = self.session.as_mut() else {
            return PointerDisposition::Ignored;
        };
        if session.pointer != event.id || session.ignored {
            return PointerDisposition::Ignored;
        }

        let delta = event.position - session.last_position;
        session.last_position = event.position;

        if session.axis_lock == AxisLock::Unlocked {
            session.axis_lock = if delta.x.abs() > delta.y.abs() {
                AxisLock::Horizontal
            } else {
                AxisLock::Vertical
            };
            log::debug!("pointer {} locked to {:?} axis", event.id, session.axis_lock);
        }
        if session.axis_lock == AxisLock::Horizontal
            && session.hit_class == HitClass::HorizontalScrollable
        {
            return PointerDisposition::HorizontalChild;
        }

        self.phase.set(GesturePhase::Dragging);
        let route = cx
            .scroll
            .on_gesture_move(delta.y, session.hit_class, cx.value, cx.config);
        self.tracker.add_position(event.timestamp_ms, event.position);
        log::trace!("pointer {} move dy={} routed {route:?}", event.id, delta.y);

        match route {
            MoveRoute::Panel { .. } => PointerDisposition::Panel,
            MoveRoute::Scroll => PointerDisposition::Scroll,
        }
    }

    fn on_release(
        &mut self,
        event: &PointerEvent,
        cx: &GestureContext<'_>,
        cancelled: bool,
    ) -> PointerDisposition {
        if self.session.as_ref().map(|session| session.pointer) != Some(event.id) {
            return PointerDisposition::Ignored;
        }
        let Some(session) = self.session.take() else {
            return PointerDisposition::Ignored;
        };
        self.phase.set(GesturePhase::Idle);
        let velocity = if cancelled {
            Velocity::ZERO
        } else {
            // The up sample lets a pause before release count as a stop.
            if self
                .tracker
                .newest_time_ms()
                .is_some_and(|newest| event.timestamp_ms > newest)
            {
                self.tracker.add_position(event.timestamp_ms, event.position);
            }
            self.tracker.velocity_with_max(max_release_velocity(cx.config))
        };
        self.tracker.reset();

        if session.ignored {
            return PointerDisposition::Ignored;
        }

        let release = ReleaseContext {
            position: cx.value.value(),
            velocity,
            is_animating: cx.value.is_animating(),
            scrolling_enabled: cx.scroll.scrolling_enabled(),
        };
        let action = decide_release(cx.config, &release);
        log::debug!(
            "pointer {} {} at {:.3} with vy={:.1}: {action:?}",
            event.id,
            if cancelled { "cancelled" } else { "released" },
            release.position,
            velocity.y
        );
        apply_release(action, cx.value);

        if release.position >= 1.0 && release.scrolling_enabled {
            PointerDisposition::Scroll
        } else {
            PointerDisposition::Panel
        }
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
