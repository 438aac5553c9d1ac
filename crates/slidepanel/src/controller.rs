//! External control surface for a [`Panel`](crate::Panel).
//!
//! A controller starts detached. [`Panel::attach_controller`](crate::Panel::attach_controller)
//! binds it through a weak reference; every operation except
//! [`PanelController::is_attached`] fails with
//! [`PreconditionError::NotAttached`] until then, and again once the panel is
//! disposed.

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

use slidepanel_animation::{Easing, MotionCompletion};

use crate::error::{PanelError, PreconditionError};
use crate::panel::PanelShared;

#[derive(Clone, Default)]
pub struct PanelController {
    binding: Rc<RefCell<Weak<PanelShared>>>,
}

impl PanelController {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&self, panel: &Rc<PanelShared>) {
        *self.binding.borrow_mut() = Rc::downgrade(panel);
    }

    /// Clears the binding if it still points at `panel`.
    pub(crate) fn unbind(&self, panel: &Rc<PanelShared>) {
        let mut binding = self.binding.borrow_mut();
        if binding.ptr_eq(&Rc::downgrade(panel)) {
            *binding = Weak::new();
        }
    }

    pub(crate) fn ptr_eq(&self, other: &PanelController) -> bool {
        Rc::ptr_eq(&self.binding, &other.binding)
    }

    fn panel(&self) -> Result<Rc<PanelShared>, PanelError> {
        self.binding
            .borrow()
            .upgrade()
            .ok_or(PanelError::Precondition(PreconditionError::NotAttached))
    }

    pub fn is_attached(&self) -> bool {
        self.binding.borrow().strong_count() > 0
    }

    /// Flings the panel fully open.
    pub fn open(&self) -> Result<MotionCompletion, PanelError> {
        Ok(self.panel()?.open())
    }

    /// Flings the panel fully closed.
    pub fn close(&self) -> Result<MotionCompletion, PanelError> {
        Ok(self.panel()?.close())
    }

    /// Closes the panel, then removes it from the render tree.
    pub fn hide(&self) -> Result<MotionCompletion, PanelError> {
        Ok(self.panel()?.close_then_set_visible(false))
    }

    /// Closes the panel, then puts it back in the render tree.
    pub fn show(&self) -> Result<MotionCompletion, PanelError> {
        Ok(self.panel()?.close_then_set_visible(true))
    }

    /// Tweens to `value`.
    ///
    /// Without a duration the panel's default duration is scaled by the
    /// distance left to travel; without a curve the motion is linear.
    pub fn animate_to(
        &self,
        value: f64,
        duration: Option<Duration>,
        easing: Option<Easing>,
    ) -> Result<MotionCompletion, PanelError> {
        self.panel()?.animate_to(value, duration, easing)
    }

    pub fn animate_to_snap_point(
        &self,
        duration: Option<Duration>,
        easing: Option<Easing>,
    ) -> Result<MotionCompletion, PanelError> {
        self.panel()?.animate_to_snap_point(duration, easing)
    }

    pub fn position(&self) -> Result<f64, PanelError> {
        Ok(self.panel()?.value().value())
    }

    /// Jumps to `position`, cancelling any motion.
    pub fn set_position(&self, position: f64) -> Result<(), PanelError> {
        self.panel()?.set_position(position)
    }

    pub fn is_animating(&self) -> Result<bool, PanelError> {
        Ok(self.panel()?.value().is_animating())
    }

    pub fn is_open(&self) -> Result<bool, PanelError> {
        Ok(self.panel()?.value().value() == 1.0)
    }

    pub fn is_closed(&self) -> Result<bool, PanelError> {
        Ok(self.panel()?.value().value() == 0.0)
    }

    pub fn is_shown(&self) -> Result<bool, PanelError> {
        Ok(self.panel()?.is_visible())
    }

    /// Keeps nested scrolling enabled while `action` runs.
    ///
    /// The section opens immediately and closes when the returned future
    /// completes or is dropped, whichever comes first. On close the scroll
    /// floor moves to wherever `action` left the scroll offset.
    pub fn force_scroll_change<F>(
        &self,
        action: F,
    ) -> Result<impl Future<Output = F::Output>, PanelError>
    where
        F: Future,
    {
        let panel = self.panel()?;
        let guard = panel.scroll().enter_force_scroll();
        drop(panel);
        Ok(async move {
            let _guard = guard;
            action.await
        })
    }
}

impl std::fmt::Debug for PanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelController")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
