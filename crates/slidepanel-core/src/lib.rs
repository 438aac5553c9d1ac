//! Core runtime for slidepanel.
//!
//! Everything here runs on a single cooperative event loop: the host feeds
//! frame timestamps into [`Runtime::drain_frame_callbacks`] and motions
//! re-register themselves once per frame through a [`FrameClock`].

mod frame_clock;
mod geometry;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock, NextFrame};
pub use geometry::{Point, Rect, Velocity};
pub use runtime::{DefaultScheduler, FrameCallbackId, Runtime, RuntimeHandle, RuntimeScheduler};

pub mod prelude {
    pub use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
    pub use crate::geometry::{Point, Rect, Velocity};
    pub use crate::runtime::{Runtime, RuntimeHandle};
}
