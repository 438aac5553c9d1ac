//! Routing of vertical drag deltas between the panel and its nested scrollable.
//!
//! The coordinator owns the "scrolling enabled" flag and the scroll floor
//! offset. Both outlive a single gesture: the flag decides which side consumes
//! the next move, and the floor is where the scrollable is pinned while the
//! panel owns the gesture.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slidepanel_animation::AnimationValue;
use slidepanel_foundation::{HitClass, PlatformScrollPhysics, ScrollBinding, ScrollPhysics};

use crate::config::PanelConfig;

/// Where a single pointer move was delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveRoute {
    /// The panel position changed by `delta`.
    Panel { delta: f64 },
    /// The nested scrollable owns the move.
    Scroll,
}

#[derive(Clone, Default)]
pub struct ScrollCoordinator {
    inner: Rc<CoordinatorInner>,
}

#[derive(Default)]
struct CoordinatorInner {
    scrolling_enabled: Cell<bool>,
    floor_offset: Cell<f64>,
    force_scroll_depth: Cell<u32>,
    saved_scrolling_enabled: Cell<bool>,
    force_drag_active: Cell<bool>,
    scrolled_this_session: Cell<bool>,
    binding: RefCell<Option<Rc<dyn ScrollBinding>>>,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, binding: Rc<dyn ScrollBinding>) {
        *self.inner.binding.borrow_mut() = Some(binding);
    }

    pub fn detach(&self) {
        self.inner.binding.borrow_mut().take();
        self.set_scrolling_enabled(false);
    }

    pub fn is_attached(&self) -> bool {
        self.inner.binding.borrow().is_some()
    }

    pub fn scrolling_enabled(&self) -> bool {
        self.inner.scrolling_enabled.get()
    }

    pub fn floor_offset(&self) -> f64 {
        self.inner.floor_offset.get()
    }

    pub fn is_force_scrolling(&self) -> bool {
        self.inner.force_scroll_depth.get() > 0
    }

    /// True from a pointer-down on a force-draggable region until the next pointer-down.
    pub fn force_drag_active(&self) -> bool {
        self.inner.force_drag_active.get()
    }

    pub fn clear_force_drag(&self) {
        self.inner.force_drag_active.set(false);
    }

    fn binding(&self) -> Option<Rc<dyn ScrollBinding>> {
        self.inner.binding.borrow().clone()
    }

    fn offset(&self) -> Option<f64> {
        self.inner.binding.borrow().as_ref().map(|binding| binding.offset())
    }

    fn set_scrolling_enabled(&self, enabled: bool) {
        if self.is_force_scrolling() {
            self.inner.saved_scrolling_enabled.set(enabled);
            return;
        }
        if self.inner.scrolling_enabled.replace(enabled) != enabled {
            log::trace!("nested scrolling {}", if enabled { "enabled" } else { "disabled" });
        }
        if enabled {
            self.inner.scrolled_this_session.set(true);
        }
    }

    /// Prepares for a new gesture at panel `position`.
    pub fn begin_session(&self, position: f64, hit_class: HitClass) {
        self.inner
            .force_drag_active
            .set(hit_class == HitClass::ForceDraggable);
        self.inner.scrolled_this_session.set(false);

        let binding = self.binding();
        if position >= 1.0 {
            if let Some(binding) = binding.as_ref() {
                self.inner.floor_offset.set(binding.min_extent());
            }
        }
        let floor = self.floor_offset();
        let above_floor = binding.is_some_and(|binding| binding.offset() > floor);
        self.set_scrolling_enabled(position >= 1.0 && above_floor);
    }

    /// Routes a vertical pointer delta and updates `value` when the panel owns it.
    pub fn on_gesture_move(
        &self,
        dy: f64,
        hit_class: HitClass,
        value: &AnimationValue,
        config: &PanelConfig,
    ) -> MoveRoute {
        let direction = config.slide_direction;
        let position = value.value();
        let floor = self.floor_offset();
        let content_scrolled = self.offset().is_some_and(|offset| offset > floor);

        let to_panel = if hit_class == HitClass::ForceDraggable {
            true
        } else if position >= 1.0 && content_scrolled && direction.is_closing(dy) {
            // Content scrolls back to its top before the panel may close.
            false
        } else {
            !self.scrolling_enabled() || position < 1.0
        };

        let route = if to_panel {
            let delta = direction.position_delta(dy, config.range());
            value.set_immediate(position + delta);
            MoveRoute::Panel {
                delta: value.value() - position,
            }
        } else {
            MoveRoute::Scroll
        };

        self.update_scrolling_enabled(dy, value.value(), config);
        route
    }

    fn update_scrolling_enabled(&self, dy: f64, position: f64, config: &PanelConfig) {
        if position < 1.0 {
            self.set_scrolling_enabled(false);
            return;
        }
        let floor = self.floor_offset();
        let at_floor = self.offset().is_some_and(|offset| offset <= floor);
        if !at_floor {
            return;
        }
        let enable = config.slide_direction.is_opening(dy);
        if !enable
            && config.disable_draggable_on_scrolling
            && self.inner.scrolled_this_session.get()
        {
            return;
        }
        self.set_scrolling_enabled(enable);
    }

    /// Drops nested scrolling as soon as the panel leaves the fully open position,
    /// whatever moved it.
    pub fn on_panel_position_changed(&self, position: f64) {
        if position < 1.0 {
            self.set_scrolling_enabled(false);
        }
    }

    /// Pins the nested scrollable to the floor while the panel owns drags.
    pub fn on_scroll_offset_changed(&self, offset: f64, is_draggable: bool) {
        if !is_draggable || self.is_force_scrolling() {
            return;
        }
        let floor = self.floor_offset();
        let panel_owns_drag = !self.scrolling_enabled() || self.force_drag_active();
        if panel_owns_drag && offset != floor {
            if let Some(binding) = self.binding() {
                log::trace!("scroll offset {offset} reset to floor {floor}");
                binding.jump_to(floor);
            }
        }
    }

    /// Opens a force-scroll section; scrolling stays enabled until the guard drops.
    pub fn enter_force_scroll(&self) -> ForceScrollGuard {
        let depth = self.inner.force_scroll_depth.get();
        if depth == 0 {
            self.inner
                .saved_scrolling_enabled
                .set(self.inner.scrolling_enabled.get());
            self.inner.scrolling_enabled.set(true);
        }
        self.inner.force_scroll_depth.set(depth + 1);
        ForceScrollGuard {
            coordinator: self.clone(),
        }
    }

    fn exit_force_scroll(&self) {
        let depth = self.inner.force_scroll_depth.get().saturating_sub(1);
        self.inner.force_scroll_depth.set(depth);
        if depth > 0 {
            return;
        }
        self.inner
            .scrolling_enabled
            .set(self.inner.saved_scrolling_enabled.get());
        if let Some(offset) = self.offset() {
            self.inner.floor_offset.set(offset);
        }
    }

    /// Physics wrapper the nested scrollable should use.
    pub fn physics(&self) -> PanelScrollPhysics {
        PanelScrollPhysics::new(self.clone(), Rc::new(PlatformScrollPhysics))
    }
}

impl std::fmt::Debug for ScrollCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("scrolling_enabled", &self.scrolling_enabled())
            .field("floor_offset", &self.floor_offset())
            .field("force_scrolling", &self.is_force_scrolling())
            .field("force_drag_active", &self.force_drag_active())
            .finish()
    }
}

/// Closes a force-scroll section on drop, restoring the scrolling flag and
/// moving the floor to the current scroll offset.
#[must_use = "the force-scroll section ends when the guard is dropped"]
pub struct ForceScrollGuard {
    coordinator: ScrollCoordinator,
}

impl Drop for ForceScrollGuard {
    fn drop(&mut self) {
        self.coordinator.exit_force_scroll();
    }
}

/// Suppresses the nested scrollable's momentum while a force-draggable gesture owns it.
#[derive(Clone)]
pub struct PanelScrollPhysics {
    coordinator: ScrollCoordinator,
    parent: Rc<dyn ScrollPhysics>,
}

impl PanelScrollPhysics {
    pub fn new(coordinator: ScrollCoordinator, parent: Rc<dyn ScrollPhysics>) -> Self {
        Self {
            coordinator,
            parent,
        }
    }
}

impl ScrollPhysics for PanelScrollPhysics {
    fn ballistic_velocity(&self, velocity: f64) -> f64 {
        if self.coordinator.force_drag_active() {
            0.0
        } else {
            self.parent.ballistic_velocity(velocity)
        }
    }
}

#[cfg(test)]
#[path = "tests/scroll_coordinator_tests.rs"]
mod tests;
