//! Panel configuration.

use std::time::Duration;

use slidepanel_foundation::gesture_constants::{
    DEFAULT_PANEL_DURATION_MILLIS, MIN_FLING_VELOCITY, SNAP_OVERRIDE_MULTIPLIER,
};

use crate::error::ConfigError;

/// Direction the panel travels while opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    /// Anchored to the bottom edge; dragging up opens.
    #[default]
    Up,
    /// Anchored to the top edge; dragging down opens.
    Down,
}

impl SlideDirection {
    /// Whether a vertical pointer delta pulls the panel further open.
    pub fn is_opening(self, dy: f64) -> bool {
        match self {
            SlideDirection::Up => dy < 0.0,
            SlideDirection::Down => dy > 0.0,
        }
    }

    pub fn is_closing(self, dy: f64) -> bool {
        match self {
            SlideDirection::Up => dy > 0.0,
            SlideDirection::Down => dy < 0.0,
        }
    }

    /// Position change for a vertical pointer delta over `range` pixels.
    pub fn position_delta(self, dy: f64, range: f64) -> f64 {
        match self {
            SlideDirection::Up => -dy / range,
            SlideDirection::Down => dy / range,
        }
    }
}

/// Resting state the panel starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    Open,
    #[default]
    Closed,
}

impl PanelState {
    pub fn position(self) -> f64 {
        match self {
            PanelState::Open => 1.0,
            PanelState::Closed => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Height in logical pixels when fully collapsed.
    pub min_extent: f64,
    /// Height in logical pixels when fully open.
    pub max_extent: f64,
    /// Intermediate resting position, strictly inside `(0, 1)`.
    pub snap_point: Option<f64>,
    pub panel_snapping: bool,
    pub slide_direction: SlideDirection,
    pub backdrop_enabled: bool,
    pub backdrop_opacity: f64,
    pub backdrop_tap_closes_panel: bool,
    pub parallax_enabled: bool,
    /// Fraction of the panel travel applied as body translation.
    pub parallax_offset: f64,
    /// Once a gesture has handed over to the nested scrollable, keep it there.
    pub disable_draggable_on_scrolling: bool,
    pub is_draggable: bool,
    pub default_state: PanelState,
    /// Release speed in px/s at which a release counts as a fling.
    pub fling_threshold: f64,
    pub snap_override_multiplier: f64,
    /// Duration of a programmatic motion across the whole range.
    pub default_duration: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_extent: 100.0,
            max_extent: 500.0,
            snap_point: None,
            panel_snapping: true,
            slide_direction: SlideDirection::Up,
            backdrop_enabled: false,
            backdrop_opacity: 0.5,
            backdrop_tap_closes_panel: true,
            parallax_enabled: false,
            parallax_offset: 0.1,
            disable_draggable_on_scrolling: false,
            is_draggable: true,
            default_state: PanelState::Closed,
            fling_threshold: MIN_FLING_VELOCITY,
            snap_override_multiplier: SNAP_OVERRIDE_MULTIPLIER,
            default_duration: Duration::from_millis(DEFAULT_PANEL_DURATION_MILLIS),
        }
    }
}

impl PanelConfig {
    pub fn new(min_extent: f64, max_extent: f64) -> Self {
        Self {
            min_extent,
            max_extent,
            ..Self::default()
        }
    }

    pub fn with_snap_point(mut self, snap_point: f64) -> Self {
        self.snap_point = Some(snap_point);
        self
    }

    pub fn with_panel_snapping(mut self, enabled: bool) -> Self {
        self.panel_snapping = enabled;
        self
    }

    pub fn with_slide_direction(mut self, direction: SlideDirection) -> Self {
        self.slide_direction = direction;
        self
    }

    pub fn with_backdrop(mut self, opacity: f64, tap_closes_panel: bool) -> Self {
        self.backdrop_enabled = true;
        self.backdrop_opacity = opacity;
        self.backdrop_tap_closes_panel = tap_closes_panel;
        self
    }

    pub fn with_parallax(mut self, offset: f64) -> Self {
        self.parallax_enabled = true;
        self.parallax_offset = offset;
        self
    }

    pub fn with_disable_draggable_on_scrolling(mut self, disable: bool) -> Self {
        self.disable_draggable_on_scrolling = disable;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.is_draggable = draggable;
        self
    }

    pub fn with_default_state(mut self, state: PanelState) -> Self {
        self.default_state = state;
        self
    }

    pub fn with_fling_threshold(mut self, threshold: f64) -> Self {
        self.fling_threshold = threshold;
        self
    }

    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Pixel distance between the collapsed and open heights.
    pub fn range(&self) -> f64 {
        self.max_extent - self.min_extent
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let extents_valid = self.min_extent.is_finite()
            && self.max_extent.is_finite()
            && self.min_extent > 0.0
            && self.max_extent > self.min_extent;
        if !extents_valid {
            return Err(ConfigError::InvalidExtents {
                min: self.min_extent,
                max: self.max_extent,
            });
        }
        if let Some(snap) = self.snap_point {
            if !(snap > 0.0 && snap < 1.0) {
                return Err(ConfigError::SnapPointOutOfRange { value: snap });
            }
        }
        if !(0.0..=1.0).contains(&self.backdrop_opacity) {
            return Err(ConfigError::BackdropOpacityOutOfRange {
                value: self.backdrop_opacity,
            });
        }
        let fling_valid = self.fling_threshold.is_finite()
            && self.fling_threshold > 0.0
            && self.snap_override_multiplier.is_finite()
            && self.snap_override_multiplier >= 1.0;
        if !fling_valid {
            return Err(ConfigError::InvalidFlingThreshold {
                threshold: self.fling_threshold,
                multiplier: self.snap_override_multiplier,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
