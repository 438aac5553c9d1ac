//! Shared gesture constants for panel drag and release handling.
//!
//! Velocities are in logical pixels per second.

/// Minimum release speed that counts as a fling rather than a slow drop.
pub const MIN_FLING_VELOCITY: f64 = 365.0;

/// A fling at least this many times [`MIN_FLING_VELOCITY`] skips the snap point.
pub const SNAP_OVERRIDE_MULTIPLIER: f64 = 8.0;

/// Maximum fling velocity in logical pixels per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on a
/// baseline density.
pub const MAX_FLING_VELOCITY: f64 = 8_000.0;

/// Seconds of travel a non-snapping fling coasts for.
pub const COAST_VELOCITY_FACTOR: f64 = 0.16;

/// Duration of a non-snapping coast.
pub const COAST_DURATION_MILLIS: u64 = 410;

/// Default duration of programmatic panel motion over the full range.
pub const DEFAULT_PANEL_DURATION_MILLIS: u64 = 300;
