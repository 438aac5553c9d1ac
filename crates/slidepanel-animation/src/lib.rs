//! Animation system for slidepanel
//!
//! Provides a frame-driven [`AnimationValue`] over `[0, 1]` together with
//! the easing curves and spring physics that drive it.

pub mod animation;
pub mod animation_value;
pub mod simulation;

pub use animation::{AnimationSpec, Easing, SpringSpec};
pub use animation_value::{AnimationValue, Bound, ListenerId, MotionCompletion, MotionOutcome};
pub use simulation::{Simulation, SpringSimulation, TweenSimulation};

pub mod prelude {
    pub use crate::animation::{AnimationSpec, Easing, SpringSpec};
    pub use crate::animation_value::{AnimationValue, Bound, MotionCompletion, MotionOutcome};
    pub use crate::simulation::{Simulation, SpringSimulation};
}
