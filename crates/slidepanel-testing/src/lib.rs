//! Testing utilities for slidepanel.
//!
//! [`PanelRobot`] drives a panel headlessly: pointer sequences with
//! synthetic timestamps, a nested scrollable, and 60 fps frame stepping.

mod robot;
pub mod robot_assertions;

pub use robot::{PanelRobot, FRAME_NANOS};
pub use robot_assertions::{assert_approx_eq, assert_frame_approx_eq};
