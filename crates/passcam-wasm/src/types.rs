//! WASM-compatible wrapper types.
//!
//! These wrap the core geometry and crop types so JavaScript gets plain
//! getters instead of nested objects.

use passcam_core::capture::SensorOrientation;
use passcam_core::geometry::{GeometryError, GuideLayout, ScreenGeometry};
use passcam_core::transform::CropRectangle;
use wasm_bindgen::prelude::*;

/// Screen and guide box geometry, built once per screen size.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const geometry = new JsScreenGeometry(window.innerWidth, window.innerHeight, {
///   widthFraction: 0.9,
///   aspectRatio: 1.42,
/// });
/// overlay.style.left = `${geometry.guide_x}px`;
/// ```
#[wasm_bindgen]
pub struct JsScreenGeometry {
    inner: ScreenGeometry,
}

#[wasm_bindgen]
impl JsScreenGeometry {
    /// Compute the guide box for a screen.
    ///
    /// `layout` is an optional object with camelCase `GuideLayout` fields;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        screen_width: f64,
        screen_height: f64,
        layout: JsValue,
    ) -> Result<JsScreenGeometry, JsValue> {
        let layout = if layout.is_undefined() || layout.is_null() {
            GuideLayout::default()
        } else {
            serde_wasm_bindgen::from_value(layout)
                .map_err(|e| JsValue::from_str(&format!("Invalid guide layout: {}", e)))?
        };

        Self::build(screen_width, screen_height, &layout)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn guide_x(&self) -> f64 {
        self.inner.guide_box().x
    }

    #[wasm_bindgen(getter)]
    pub fn guide_y(&self) -> f64 {
        self.inner.guide_box().y
    }

    #[wasm_bindgen(getter)]
    pub fn guide_width(&self) -> f64 {
        self.inner.guide_box().width
    }

    #[wasm_bindgen(getter)]
    pub fn guide_height(&self) -> f64 {
        self.inner.guide_box().height
    }

    #[wasm_bindgen(getter)]
    pub fn safety_margin(&self) -> f64 {
        self.inner.safety_margin()
    }
}

impl JsScreenGeometry {
    pub(crate) fn build(
        screen_width: f64,
        screen_height: f64,
        layout: &GuideLayout,
    ) -> Result<Self, GeometryError> {
        ScreenGeometry::new(screen_width, screen_height, layout).map(|inner| Self { inner })
    }

    pub(crate) fn geometry(&self) -> &ScreenGeometry {
        &self.inner
    }
}

/// A crop rectangle in upright photo pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsCropRectangle {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsCropRectangle {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<CropRectangle> for JsCropRectangle {
    fn from(rect: CropRectangle) -> Self {
        Self {
            x: rect.offset.x,
            y: rect.offset.y,
            width: rect.size.width,
            height: rect.size.height,
        }
    }
}

/// Parse an orientation tag coming from JavaScript.
///
/// Unknown tags are reported as errors rather than silently treated as
/// portrait, since a wrong guess swaps the crop axes.
pub(crate) fn orientation_from_str(tag: &str) -> Result<SensorOrientation, String> {
    SensorOrientation::from_tag(tag).ok_or_else(|| format!("Unknown orientation: {}", tag))
}
