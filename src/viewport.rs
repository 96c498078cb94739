//! Mapping between display space and image space
//!
//! The captured image is shown scaled down to fit the available viewport,
//! never scaled up past native resolution. Input arrives in display space and
//! annotations are stored in image space; `DisplayScale` converts both ways.

use tiny_skia::Transform;

use crate::config::EditorConfig;
use crate::domain::{PixelSize, Point};

/// Area available for the drawing surface, in display pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport for a container of `container_width` inside a window of
    /// `window_height`: horizontal padding is removed and only a fraction of
    /// the window height is used.
    pub fn from_window(container_width: f32, window_height: f32, config: &EditorConfig) -> Self {
        Self::new(
            container_width - config.viewport_padding,
            window_height * config.viewport_height_fraction,
        )
    }

    /// A viewport large enough to show any image at native resolution
    pub fn unbounded() -> Self {
        Self::new(f32::INFINITY, f32::INFINITY)
    }
}

/// Display pixels per image pixel, always in (0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayScale(f32);

impl Default for DisplayScale {
    fn default() -> Self {
        Self::NATIVE
    }
}

impl DisplayScale {
    /// Image shown at native resolution
    pub const NATIVE: DisplayScale = DisplayScale(1.0);

    /// Smallest viewport side considered, so the scale stays positive
    const MIN_VIEWPORT: f32 = 1.0;

    /// Create a scale from a raw factor, clamped into (0, 1]
    pub fn new(factor: f32) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self(factor.min(1.0))
        } else {
            Self::NATIVE
        }
    }

    /// Largest scale that fits `image` inside `viewport`, preserving aspect
    /// ratio and capped at 1.0
    pub fn fit(image: PixelSize, viewport: Viewport) -> Self {
        if image.is_empty() {
            return Self::NATIVE;
        }
        let vw = sanitize(viewport.width);
        let vh = sanitize(viewport.height);
        let scale_x = vw / image.width as f32;
        let scale_y = vh / image.height as f32;
        Self::new(scale_x.min(scale_y).min(1.0))
    }

    pub fn factor(self) -> f32 {
        self.0
    }

    pub fn is_native(self) -> bool {
        self.0 == 1.0
    }

    /// Convert a display-space point to image space
    pub fn to_image_space(self, display: Point) -> Point {
        Point::new(display.x / self.0, display.y / self.0)
    }

    /// Convert an image-space point to display space
    pub fn to_display_space(self, image: Point) -> Point {
        Point::new(image.x * self.0, image.y * self.0)
    }

    /// Size of the display surface for an image of `image` pixels
    pub fn display_size(self, image: PixelSize) -> PixelSize {
        let scaled = |v: u32| ((v as f32 * self.0).round() as u32).max(1);
        PixelSize::new(scaled(image.width), scaled(image.height))
    }

    /// Image-space to display-space transform for the renderer
    pub fn transform(self) -> Transform {
        Transform::from_scale(self.0, self.0)
    }
}

fn sanitize(side: f32) -> f32 {
    if side.is_nan() {
        DisplayScale::MIN_VIEWPORT
    } else {
        side.max(DisplayScale::MIN_VIEWPORT)
    }
}
