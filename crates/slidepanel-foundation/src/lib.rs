//! Input-side building blocks for slidepanel.
//!
//! Pointer events, release-velocity estimation, region classification for
//! gesture routing, and the nested-scroll collaborator contracts.

pub mod gesture_constants;
pub mod hit_test;
pub mod input;
pub mod scroll;
pub mod velocity_tracker;

pub use hit_test::{classify, HitClass, HitPath, HitTester, RegionMap, RegionTag};
pub use input::{PointerEvent, PointerEventKind, PointerId};
pub use scroll::{PlatformScrollPhysics, ScrollBinding, ScrollPhysics, ScrollState};
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::hit_test::{HitClass, HitTester, RegionTag};
    pub use crate::input::{PointerEvent, PointerEventKind};
    pub use crate::scroll::{ScrollBinding, ScrollPhysics};
    pub use crate::velocity_tracker::VelocityTracker;
}
