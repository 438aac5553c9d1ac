//! Draggable, animated sliding panel.
//!
//! A [`Panel`] slides between a collapsed and an expanded height. Pointer
//! events go through a [`GestureStateMachine`] that classifies the touched
//! region, tracks release velocity and routes every vertical move either to
//! the panel or to a nested scrollable via the [`ScrollCoordinator`]. Release
//! ends in a fling, a spring to the snap point, or a short coast, chosen by
//! [`decide_release`]. A [`PanelController`] drives the panel from outside.
//!
//! Everything runs on one event loop: the host drains frame callbacks from a
//! [`slidepanel_core::Runtime`] once per frame to advance motion.

mod config;
mod controller;
mod error;
mod gesture;
mod panel;
mod presentation;
mod scroll_coordinator;

pub use config::{PanelConfig, PanelState, SlideDirection};
pub use controller::PanelController;
pub use error::{ConfigError, PanelError, PreconditionError, RangeError};
pub use gesture::{
    apply_release, decide_release, AxisLock, GesturePhase, GestureSession, GestureStateMachine,
    PointerDisposition, ReleaseAction, ReleaseContext,
};
pub use panel::Panel;
pub use presentation::PanelFrame;
pub use scroll_coordinator::{ForceScrollGuard, MoveRoute, PanelScrollPhysics, ScrollCoordinator};

pub use slidepanel_animation::{Easing, MotionCompletion, MotionOutcome};

pub mod prelude {
    pub use crate::config::{PanelConfig, PanelState, SlideDirection};
    pub use crate::controller::PanelController;
    pub use crate::error::PanelError;
    pub use crate::gesture::PointerDisposition;
    pub use crate::panel::Panel;
    pub use crate::presentation::PanelFrame;
    pub use slidepanel_animation::{Easing, MotionCompletion, MotionOutcome};
    pub use slidepanel_core::{Point, Runtime};
    pub use slidepanel_foundation::{PointerEvent, RegionMap, RegionTag, ScrollState};
}

#[cfg(test)]
#[path = "tests/test_support.rs"]
mod test_support;
