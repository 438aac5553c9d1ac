use crate::config::PanelConfig;

/// Values a presentation layer needs to render the panel at one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    pub position: f64,
    /// Current panel height in logical pixels.
    pub height: f64,
    pub backdrop_opacity: f64,
    /// Opacity of the collapsed header, fading out as the panel opens.
    pub collapsed_opacity: f64,
    /// Vertical offset applied to the body behind the panel.
    pub parallax_translation: f64,
    pub visible: bool,
}

impl PanelFrame {
    pub fn compute(config: &PanelConfig, position: f64, visible: bool) -> Self {
        let position = position.clamp(0.0, 1.0);
        let range = config.range();
        let backdrop_opacity = if config.backdrop_enabled {
            position * config.backdrop_opacity
        } else {
            0.0
        };
        let parallax_translation = if config.parallax_enabled {
            -position * range * config.parallax_offset
        } else {
            0.0
        };
        Self {
            position,
            height: config.min_extent + position * range,
            backdrop_opacity,
            collapsed_opacity: 1.0 - position,
            parallax_translation,
            visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_frame_uses_min_extent() {
        let frame = PanelFrame::compute(&PanelConfig::default(), 0.0, true);
        assert_eq!(frame.height, 100.0);
        assert_eq!(frame.collapsed_opacity, 1.0);
        assert_eq!(frame.backdrop_opacity, 0.0);
        assert_eq!(frame.parallax_translation, 0.0);
    }

    #[test]
    fn half_open_frame_interpolates() {
        let config = PanelConfig::default()
            .with_backdrop(0.8, true)
            .with_parallax(0.25);
        let frame = PanelFrame::compute(&config, 0.5, true);
        assert_eq!(frame.height, 300.0);
        assert_eq!(frame.backdrop_opacity, 0.4);
        assert_eq!(frame.collapsed_opacity, 0.5);
        assert_eq!(frame.parallax_translation, -50.0);
    }

    #[test]
    fn disabled_backdrop_stays_transparent() {
        let frame = PanelFrame::compute(&PanelConfig::default(), 1.0, false);
        assert_eq!(frame.backdrop_opacity, 0.0);
        assert_eq!(frame.height, 500.0);
        assert!(!frame.visible);
    }
}
