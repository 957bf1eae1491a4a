//! On-screen guide box geometry.
//!
//! The camera preview fills the screen and a fixed guide box is drawn on top
//! of it to show the user where to align the document. This module computes
//! that box once from the screen size and a [`GuideLayout`], producing an
//! immutable [`ScreenGeometry`] that is passed explicitly to the crop
//! calculator.
//!
//! # Coordinate System
//!
//! - Units are screen points as reported by the platform (not photo pixels)
//! - Origin is the top-left corner of the preview area
//! - The guide box is `width / aspect_ratio` tall, so an aspect ratio above
//!   1.0 gives a box wider than it is tall

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aspect ratio of a passport data page (ISO/IEC 7810 ID-3, 125 x 88 mm).
pub const PASSPORT_ASPECT_RATIO: f64 = 1.42;

/// Errors that can occur while building screen geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Screen dimensions must be finite and positive.
    #[error("Invalid screen dimensions: {width}x{height}")]
    InvalidScreen { width: f64, height: f64 },

    /// A layout parameter is outside its usable range.
    #[error("Invalid guide layout: {0}")]
    InvalidLayout(String),

    /// The guide box does not fit inside the screen.
    #[error("Guide box {guide:?} does not fit inside a {screen_width}x{screen_height} screen")]
    GuideOutOfBounds {
        guide: ScreenRect,
        screen_width: f64,
        screen_height: f64,
    },
}

/// A rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow the rectangle by `fraction` of its own width/height on every side.
    ///
    /// The center stays fixed. A fraction of 0.05 makes the rectangle 10%
    /// wider and 10% taller.
    pub fn expand(&self, fraction: f64) -> Self {
        let dx = self.width * fraction;
        let dy = self.height * fraction;
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }

    /// Check whether this rectangle lies within `[0, width] x [0, height]`.
    pub fn is_within(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= width
            && self.y + self.height <= height
    }
}

/// Tunable parameters of the guide box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuideLayout {
    /// Guide box width as a fraction of screen width (0.0, 1.0]
    pub width_fraction: f64,
    /// Guide box width divided by its height
    pub aspect_ratio: f64,
    /// Vertical shift from the centered position, in screen points
    /// (positive moves the box down)
    pub vertical_bias: f64,
    /// Fractional expansion applied on each side before mapping to pixels
    pub safety_margin: f64,
}

impl Default for GuideLayout {
    fn default() -> Self {
        Self {
            width_fraction: 0.9,
            aspect_ratio: PASSPORT_ASPECT_RATIO,
            vertical_bias: 0.0,
            safety_margin: 0.05,
        }
    }
}

impl GuideLayout {
    /// Check every parameter for a usable range.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.width_fraction > 0.0 && self.width_fraction <= 1.0) {
            return Err(GeometryError::InvalidLayout(format!(
                "widthFraction must be in (0, 1], got {}",
                self.width_fraction
            )));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(GeometryError::InvalidLayout(format!(
                "aspectRatio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if !self.vertical_bias.is_finite() {
            return Err(GeometryError::InvalidLayout(
                "verticalBias must be finite".to_string(),
            ));
        }
        if !(self.safety_margin.is_finite() && self.safety_margin >= 0.0) {
            return Err(GeometryError::InvalidLayout(format!(
                "safetyMargin must be non-negative, got {}",
                self.safety_margin
            )));
        }
        Ok(())
    }
}

/// Screen and guide box geometry, computed once per screen size.
///
/// Only [`ScreenGeometry::new`] builds one, so the guide box always lies
/// inside the screen and the safety margin is finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenGeometry {
    screen_width: f64,
    screen_height: f64,
    aspect_ratio: f64,
    guide_box: ScreenRect,
    safety_margin: f64,
}

impl ScreenGeometry {
    /// Compute the guide box for a screen of the given size.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidScreen` for non-positive screen sizes,
    /// `GeometryError::InvalidLayout` for unusable layout parameters and
    /// `GeometryError::GuideOutOfBounds` when the box (after vertical bias)
    /// would leave the screen.
    pub fn new(
        screen_width: f64,
        screen_height: f64,
        layout: &GuideLayout,
    ) -> Result<Self, GeometryError> {
        if !(screen_width.is_finite()
            && screen_height.is_finite()
            && screen_width > 0.0
            && screen_height > 0.0)
        {
            return Err(GeometryError::InvalidScreen {
                width: screen_width,
                height: screen_height,
            });
        }
        layout.validate()?;

        let width = screen_width * layout.width_fraction;
        let height = width / layout.aspect_ratio;
        let x = (screen_width - width) / 2.0;
        let y = (screen_height - height) / 2.0 + layout.vertical_bias;
        let guide_box = ScreenRect::new(x, y, width, height);

        if !guide_box.is_within(screen_width, screen_height) {
            return Err(GeometryError::GuideOutOfBounds {
                guide: guide_box,
                screen_width,
                screen_height,
            });
        }

        Ok(Self {
            screen_width,
            screen_height,
            aspect_ratio: layout.aspect_ratio,
            guide_box,
            safety_margin: layout.safety_margin,
        })
    }

    pub fn screen_width(&self) -> f64 {
        self.screen_width
    }

    pub fn screen_height(&self) -> f64 {
        self.screen_height
    }

    /// Guide box width divided by its height.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// The guide box as drawn, before the safety margin.
    pub fn guide_box(&self) -> ScreenRect {
        self.guide_box
    }

    pub fn safety_margin(&self) -> f64 {
        self.safety_margin
    }

    /// Height divided by width of the preview area.
    #[inline]
    pub fn preview_aspect_ratio(&self) -> f64 {
        self.screen_height / self.screen_width
    }

    /// The guide box grown by the safety margin.
    ///
    /// The result may extend past the screen edges; the crop calculator
    /// clamps in photo space.
    pub fn expanded_guide(&self) -> ScreenRect {
        self.guide_box.expand(self.safety_margin)
    }

    /// Return a copy with a different safety margin.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidLayout` unless the margin is finite and
    /// non-negative.
    pub fn with_safety_margin(&self, safety_margin: f64) -> Result<Self, GeometryError> {
        if !(safety_margin.is_finite() && safety_margin >= 0.0) {
            return Err(GeometryError::InvalidLayout(format!(
                "safetyMargin must be non-negative, got {}",
                safety_margin
            )));
        }
        Ok(Self {
            safety_margin,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iphone_x() -> ScreenGeometry {
        ScreenGeometry::new(375.0, 812.0, &GuideLayout::default()).unwrap()
    }

    #[test]
    fn test_passport_guide_dimensions() {
        let geometry = iphone_x();
        let guide = geometry.guide_box();

        assert!((guide.width - 337.5).abs() < 1e-9);
        assert!((guide.height - 237.676).abs() < 0.01);
        // Centered horizontally and vertically
        assert!((guide.x - 18.75).abs() < 1e-9);
        assert!((guide.y + guide.height / 2.0 - 406.0).abs() < 1e-9);
    }

    #[test]
    fn test_guide_is_within_screen() {
        let geometry = iphone_x();
        assert!(geometry
            .guide_box()
            .is_within(geometry.screen_width(), geometry.screen_height()));
    }

    #[test]
    fn test_vertical_bias_moves_guide() {
        let layout = GuideLayout {
            vertical_bias: -100.0,
            ..Default::default()
        };
        let biased = ScreenGeometry::new(375.0, 812.0, &layout).unwrap();
        let centered = iphone_x();

        assert!((centered.guide_box().y - biased.guide_box().y - 100.0).abs() < 1e-9);
        assert_eq!(centered.guide_box().x, biased.guide_box().x);
    }

    #[test]
    fn test_bias_out_of_screen_rejected() {
        let layout = GuideLayout {
            vertical_bias: 500.0,
            ..Default::default()
        };
        let result = ScreenGeometry::new(375.0, 812.0, &layout);
        assert!(matches!(result, Err(GeometryError::GuideOutOfBounds { .. })));
    }

    #[test]
    fn test_tall_guide_on_short_screen_rejected() {
        // A 0.5 aspect box at full width is twice as tall as the screen is wide
        let layout = GuideLayout {
            width_fraction: 1.0,
            aspect_ratio: 0.5,
            ..Default::default()
        };
        let result = ScreenGeometry::new(800.0, 600.0, &layout);
        assert!(matches!(result, Err(GeometryError::GuideOutOfBounds { .. })));
    }

    #[test]
    fn test_invalid_screen_rejected() {
        let layout = GuideLayout::default();
        assert!(matches!(
            ScreenGeometry::new(0.0, 812.0, &layout),
            Err(GeometryError::InvalidScreen { .. })
        ));
        assert!(matches!(
            ScreenGeometry::new(375.0, -1.0, &layout),
            Err(GeometryError::InvalidScreen { .. })
        ));
        assert!(matches!(
            ScreenGeometry::new(f64::NAN, 812.0, &layout),
            Err(GeometryError::InvalidScreen { .. })
        ));
    }

    #[test]
    fn test_layout_validation() {
        let mut layout = GuideLayout::default();
        assert!(layout.validate().is_ok());

        layout.width_fraction = 1.5;
        assert!(layout.validate().is_err());

        layout = GuideLayout::default();
        layout.aspect_ratio = 0.0;
        assert!(layout.validate().is_err());

        layout = GuideLayout::default();
        layout.safety_margin = -0.1;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_with_safety_margin_validates() {
        let geometry = iphone_x();

        let wider = geometry.with_safety_margin(0.2).unwrap();
        assert_eq!(wider.safety_margin(), 0.2);
        assert_eq!(wider.guide_box(), geometry.guide_box());

        assert!(geometry.with_safety_margin(0.0).is_ok());
        assert!(matches!(
            geometry.with_safety_margin(f64::NAN),
            Err(GeometryError::InvalidLayout(_))
        ));
        assert!(geometry.with_safety_margin(-0.01).is_err());
        assert!(geometry.with_safety_margin(f64::INFINITY).is_err());
    }

    #[test]
    fn test_expand_keeps_center() {
        let rect = ScreenRect::new(10.0, 20.0, 100.0, 50.0);
        let expanded = rect.expand(0.1);

        assert!((expanded.width - 120.0).abs() < 1e-9);
        assert!((expanded.height - 60.0).abs() < 1e-9);
        assert!((expanded.x + expanded.width / 2.0 - 60.0).abs() < 1e-9);
        assert!((expanded.y + expanded.height / 2.0 - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_margin_is_identity() {
        let rect = ScreenRect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.expand(0.0), rect);
    }

    #[test]
    fn test_layout_deserializes_camel_case_with_defaults() {
        let layout: GuideLayout =
            serde_json::from_str(r#"{"widthFraction": 0.8, "safetyMargin": 0.1}"#).unwrap();
        assert_eq!(layout.width_fraction, 0.8);
        assert_eq!(layout.safety_margin, 0.1);
        assert_eq!(layout.aspect_ratio, PASSPORT_ASPECT_RATIO);
    }
}
