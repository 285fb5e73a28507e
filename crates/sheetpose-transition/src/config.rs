//! Per-sheet configuration and the fixed transition constants.

use std::time::Duration;

use sheetpose_animation::{AnimationType, SpringSpec};
use sheetpose_ui_graphics::Color;

use crate::error::ConfigError;

/// A drag released beyond this fraction of the content height dismisses.
pub const DISMISS_THRESHOLD_FRACTION: f32 = 0.45;

/// A drag released faster than this (points per second, downward) dismisses.
pub const DISMISS_THRESHOLD_VELOCITY: f32 = 1800.0;

/// Duration of time-driven presentation and dismissal.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(200);

/// Background of the container once the sheet is fully presented.
pub const DIMMED_BACKGROUND: Color = Color(0.0, 0.0, 0.0, 0.6);

/// Share of the content height the sheet travels during a transition.
pub const CONTENT_EXTENT_PROPORTION: f32 = 1.0;

/// The content never rises closer than this to the top safe-area edge.
pub const MIN_TOP_INSET: f32 = 44.0;

pub const DEFAULT_TOP_INSET: f32 = 80.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    /// Tapping the dimmed background dismisses the sheet.
    pub can_dismiss_on_outside_tap: bool,
    /// Dragging the content down dismisses the sheet. Tap dismissal is unaffected.
    pub pan_gesture_enabled: bool,
    /// Color of the filler view below the content.
    pub inset_background_color: Color,
    /// Minimum gap between the top safe-area edge and the content, clamped to
    /// at least [`MIN_TOP_INSET`].
    pub top_inset: f32,
    /// Speed multiplier for finishing or cancelling a released drag.
    pub completion_speed: f32,
    /// Curve used to finish or cancel a released drag.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_completion_curve"))]
    pub completion_curve: AnimationType,
}

fn default_completion_curve() -> AnimationType {
    AnimationType::Spring(SpringSpec::default())
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            can_dismiss_on_outside_tap: true,
            pan_gesture_enabled: true,
            inset_background_color: Color::WHITE,
            top_inset: DEFAULT_TOP_INSET,
            completion_speed: 1.0,
            completion_curve: default_completion_curve(),
        }
    }
}

impl SheetConfig {
    pub fn with_can_dismiss_on_outside_tap(mut self, enabled: bool) -> Self {
        self.can_dismiss_on_outside_tap = enabled;
        self
    }

    pub fn with_pan_gesture_enabled(mut self, enabled: bool) -> Self {
        self.pan_gesture_enabled = enabled;
        self
    }

    pub fn with_inset_background_color(mut self, color: Color) -> Self {
        self.inset_background_color = color;
        self
    }

    pub fn with_top_inset(mut self, top_inset: f32) -> Self {
        self.top_inset = top_inset;
        self
    }

    pub fn with_completion_speed(mut self, speed: f32) -> Self {
        self.completion_speed = speed;
        self
    }

    pub fn with_completion_curve(mut self, curve: AnimationType) -> Self {
        self.completion_curve = curve;
        self
    }

    /// The top inset actually applied by layout.
    pub fn effective_top_inset(&self) -> f32 {
        self.top_inset.max(MIN_TOP_INSET)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.top_inset.is_finite() || self.top_inset < 0.0 {
            return Err(ConfigError::InvalidTopInset(self.top_inset));
        }
        if !self.completion_speed.is_finite() || self.completion_speed <= 0.0 {
            return Err(ConfigError::InvalidCompletionSpeed(self.completion_speed));
        }
        let color = self.inset_background_color;
        let components = [color.r(), color.g(), color.b(), color.a()];
        if components
            .iter()
            .any(|component| !(0.0..=1.0).contains(component))
        {
            return Err(ConfigError::InvalidColor {
                field: "inset_background_color",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = SheetConfig::default();
        assert!(config.can_dismiss_on_outside_tap);
        assert!(config.pan_gesture_enabled);
        assert_eq!(config.inset_background_color, Color::WHITE);
        assert_eq!(config.completion_speed, 1.0);
        assert!(matches!(config.completion_curve, AnimationType::Spring(_)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn top_inset_is_clamped_to_minimum() {
        let config = SheetConfig::default().with_top_inset(10.0);
        assert_eq!(config.effective_top_inset(), MIN_TOP_INSET);
        assert_eq!(
            SheetConfig::default().effective_top_inset(),
            DEFAULT_TOP_INSET
        );
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert_eq!(
            SheetConfig::default().with_completion_speed(0.0).validate(),
            Err(ConfigError::InvalidCompletionSpeed(0.0))
        );
        assert_eq!(
            SheetConfig::default().with_top_inset(-1.0).validate(),
            Err(ConfigError::InvalidTopInset(-1.0))
        );
        assert!(matches!(
            SheetConfig::default()
                .with_inset_background_color(Color(2.0, 0.0, 0.0, 1.0))
                .validate(),
            Err(ConfigError::InvalidColor { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_defaults() {
        let config: SheetConfig =
            serde_json::from_str(r#"{ "can_dismiss_on_outside_tap": false }"#)
                .expect("config parses");
        assert!(!config.can_dismiss_on_outside_tap);
        assert!(config.pan_gesture_enabled);
        assert!(matches!(config.completion_curve, AnimationType::Spring(_)));
    }
}
