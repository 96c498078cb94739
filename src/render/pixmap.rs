//! Conversions between `image` buffers and tiny-skia surfaces

use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap};

use crate::domain::PixelSize;
use crate::error::EditorError;

/// Allocate a transparent surface of `size`
pub fn new_surface(size: PixelSize) -> Result<Pixmap, EditorError> {
    Pixmap::new(size.width, size.height).ok_or(EditorError::DrawSurfaceUnavailable {
        width: size.width,
        height: size.height,
    })
}

/// Copy straight-alpha RGBA pixels into a premultiplied pixmap
pub fn pixmap_from_rgba(img: &RgbaImage) -> Result<Pixmap, EditorError> {
    let mut pixmap = new_surface(PixelSize::new(img.width(), img.height()))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Copy a premultiplied pixmap back into straight-alpha RGBA pixels
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    img
}
