//! The live panel instance.
//!
//! [`Panel`] owns the animation value, the gesture state machine and the
//! scroll coordinator. Controllers only ever hold a weak reference to it, so
//! dropping the panel detaches every controller and cancels any motion.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use slidepanel_animation::{
    AnimationSpec, AnimationValue, Bound, Easing, ListenerId, MotionCompletion,
};
use slidepanel_core::FrameClock;
use slidepanel_foundation::{HitTester, PointerEvent, ScrollBinding, ScrollState};

use crate::config::PanelConfig;
use crate::controller::PanelController;
use crate::error::{check_position, ConfigError, PanelError, PreconditionError};
use crate::gesture::{GestureContext, GesturePhase, GestureStateMachine, PointerDisposition};
use crate::presentation::PanelFrame;
use crate::scroll_coordinator::{PanelScrollPhysics, ScrollCoordinator};

pub(crate) struct PanelShared {
    config: PanelConfig,
    value: AnimationValue,
    visible: Cell<bool>,
    scroll: ScrollCoordinator,
    gestures: RefCell<GestureStateMachine>,
    phase: Rc<Cell<GesturePhase>>,
    hit_tester: RefCell<Option<Rc<dyn HitTester>>>,
    scroll_subscription: RefCell<Option<(ScrollState, u64)>>,
    controller: RefCell<Option<PanelController>>,
    disposed: Cell<bool>,
}

impl PanelShared {
    pub(crate) fn value(&self) -> &AnimationValue {
        &self.value
    }

    pub(crate) fn scroll(&self) -> &ScrollCoordinator {
        &self.scroll
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn open(&self) -> MotionCompletion {
        self.value.fling(1.0)
    }

    pub(crate) fn close(&self) -> MotionCompletion {
        self.value.fling(-1.0)
    }

    /// Flings closed, then sets visibility once the motion finishes.
    pub(crate) fn close_then_set_visible(self: &Rc<Self>, visible: bool) -> MotionCompletion {
        let completion = self.close();
        let weak = Rc::downgrade(self);
        completion.when_finished(move || {
            if let Some(shared) = weak.upgrade() {
                shared.visible.set(visible);
                log::debug!("panel {}", if visible { "shown" } else { "hidden" });
            }
        });
        completion
    }

    pub(crate) fn animate_to(
        &self,
        target: f64,
        duration: Option<Duration>,
        easing: Option<Easing>,
    ) -> Result<MotionCompletion, PanelError> {
        let target = check_position(target)?;
        let duration = duration.unwrap_or_else(|| {
            let remaining = (target - self.value.value()).abs();
            self.config.default_duration.mul_f64(remaining)
        });
        let spec = AnimationSpec::tween(
            duration.as_millis() as u64,
            easing.unwrap_or(Easing::LinearEasing),
        );
        Ok(self.value.animate_to(target, spec))
    }

    pub(crate) fn animate_to_snap_point(
        &self,
        duration: Option<Duration>,
        easing: Option<Easing>,
    ) -> Result<MotionCompletion, PanelError> {
        let snap = self
            .config
            .snap_point
            .ok_or(PreconditionError::SnapPointMissing)?;
        self.animate_to(snap, duration, easing)
    }

    pub(crate) fn set_position(&self, position: f64) -> Result<(), PanelError> {
        let position = check_position(position)?;
        self.value.set_immediate(position);
        Ok(())
    }

    fn on_scroll_offset_changed(&self, offset: f64) {
        if self.disposed.get() {
            return;
        }
        self.scroll
            .on_scroll_offset_changed(offset, self.config.is_draggable);
    }

    fn dispatch_pointer(&self, event: &PointerEvent) -> PointerDisposition {
        if self.disposed.get() || !self.config.is_draggable || !self.visible.get() {
            return PointerDisposition::Ignored;
        }
        let hit_tester = self.hit_tester.borrow().clone();
        let Ok(mut gestures) = self.gestures.try_borrow_mut() else {
            log::warn!("pointer {:?} dispatched while a pointer event is in flight", event.kind);
            return PointerDisposition::Ignored;
        };
        let cx = GestureContext {
            config: &self.config,
            value: &self.value,
            scroll: &self.scroll,
            hit_tester: hit_tester.as_deref(),
        };
        gestures.handle(event, &cx)
    }

    fn detach_scroll_subscription(&self) {
        let subscription = self.scroll_subscription.borrow_mut().take();
        if let Some((state, id)) = subscription {
            state.remove_offset_listener(id);
        }
    }
}

/// A sliding panel instance.
pub struct Panel {
    shared: Rc<PanelShared>,
}

impl Panel {
    pub fn new(config: PanelConfig, clock: FrameClock) -> Result<Self, ConfigError> {
        config.validate()?;
        let value = AnimationValue::new(config.default_state.position(), clock);
        let scroll = ScrollCoordinator::new();
        let gestures = GestureStateMachine::new();
        let phase = gestures.phase_cell();
        let coordinator = scroll.clone();
        value.add_listener(move |position| coordinator.on_panel_position_changed(position));
        log::debug!(
            "panel created min={} max={} snap={:?}",
            config.min_extent,
            config.max_extent,
            config.snap_point
        );
        Ok(Self {
            shared: Rc::new(PanelShared {
                config,
                value,
                visible: Cell::new(true),
                scroll,
                gestures: RefCell::new(gestures),
                phase,
                hit_tester: RefCell::new(None),
                scroll_subscription: RefCell::new(None),
                controller: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.shared.config
    }

    pub fn position(&self) -> f64 {
        self.shared.value.value()
    }

    pub fn is_animating(&self) -> bool {
        self.shared.value.is_animating()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.is_visible()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }

    /// Handle to the underlying value for presentation layers.
    pub fn animation_value(&self) -> AnimationValue {
        self.shared.value.clone()
    }

    pub fn scroll_coordinator(&self) -> &ScrollCoordinator {
        &self.shared.scroll
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.shared.phase.get()
    }

    /// Presentation snapshot for the current position.
    pub fn frame(&self) -> PanelFrame {
        PanelFrame::compute(&self.shared.config, self.position(), self.is_visible())
    }

    pub fn on_position_changed(&self, callback: impl Fn(f64) + 'static) -> ListenerId {
        self.shared.value.add_listener(callback)
    }

    /// Runs `callback` each time the panel arrives fully open.
    pub fn on_opened(&self, callback: impl Fn() + 'static) -> ListenerId {
        self.shared.value.add_bound_listener(move |bound| {
            if bound == Bound::Upper {
                callback();
            }
        })
    }

    /// Runs `callback` each time the panel arrives fully closed.
    pub fn on_closed(&self, callback: impl Fn() + 'static) -> ListenerId {
        self.shared.value.add_bound_listener(move |bound| {
            if bound == Bound::Lower {
                callback();
            }
        })
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.shared.value.remove_listener(id);
    }

    pub fn set_hit_tester(&self, hit_tester: impl HitTester + 'static) {
        *self.shared.hit_tester.borrow_mut() = Some(Rc::new(hit_tester));
    }

    /// Binds a host scrollable; the host reports offset changes through
    /// [`Panel::on_scroll_offset_changed`].
    pub fn attach_scrollable(&self, binding: Rc<dyn ScrollBinding>) {
        self.shared.detach_scroll_subscription();
        self.shared.scroll.attach(binding);
    }

    /// Binds a [`ScrollState`] and subscribes to its offset changes.
    pub fn attach_scroll_state(&self, state: &ScrollState) {
        self.attach_scrollable(Rc::new(state.clone()));
        let weak: Weak<PanelShared> = Rc::downgrade(&self.shared);
        let id = state.add_offset_listener(move |offset| {
            if let Some(shared) = weak.upgrade() {
                shared.on_scroll_offset_changed(offset);
            }
        });
        *self.shared.scroll_subscription.borrow_mut() = Some((state.clone(), id));
    }

    pub fn detach_scrollable(&self) {
        self.shared.detach_scroll_subscription();
        self.shared.scroll.detach();
    }

    /// Physics the nested scrollable should consult for momentum.
    pub fn scroll_physics(&self) -> PanelScrollPhysics {
        self.shared.scroll.physics()
    }

    pub fn on_scroll_offset_changed(&self, offset: f64) {
        self.shared.on_scroll_offset_changed(offset);
    }

    pub fn dispatch_pointer(&self, event: &PointerEvent) -> PointerDisposition {
        self.shared.dispatch_pointer(event)
    }

    /// Closes the panel if the backdrop is enabled and configured to close on tap.
    pub fn on_backdrop_tap(&self) -> Option<MotionCompletion> {
        let config = &self.shared.config;
        if self.is_disposed() || !config.backdrop_enabled || !config.backdrop_tap_closes_panel {
            return None;
        }
        Some(self.shared.close())
    }

    /// Binds `controller` to this panel, detaching any controller bound before.
    pub fn attach_controller(&self, controller: &PanelController) {
        if self.is_disposed() {
            log::warn!("controller attach ignored on disposed panel");
            return;
        }
        let previous = self.shared.controller.replace(Some(controller.clone()));
        if let Some(previous) = previous {
            if !previous.ptr_eq(controller) {
                previous.unbind(&self.shared);
            }
        }
        controller.bind(&self.shared);
    }

    pub fn detach_controller(&self) {
        let controller = self.shared.controller.borrow_mut().take();
        if let Some(controller) = controller {
            controller.unbind(&self.shared);
        }
    }

    /// Cancels any motion and releases every binding. Idempotent.
    pub fn dispose(&self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        self.detach_controller();
        self.detach_scrollable();
        self.shared.value.dispose();
        self.shared.hit_tester.borrow_mut().take();
        log::debug!("panel disposed");
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("position", &self.position())
            .field("visible", &self.is_visible())
            .field("scroll", &self.shared.scroll)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/panel_tests.rs"]
mod tests;
