//! Final image export
//!
//! Rasterizes the base image and the committed annotations at native
//! resolution and encodes the result as PNG.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::capture::CapturedImage;
use crate::domain::{Annotation, PixelSize};
use crate::error::EditorError;
use crate::render::pixmap::{new_surface, rgba_from_pixmap};
use crate::render::{RenderStyle, paint_composite};
use crate::viewport::DisplayScale;

/// Encoding of [`CaptureResult::final_image`]
pub const MIME_TYPE: &str = "image/png";

/// Output of a completed editor session
#[derive(Clone, Debug)]
pub struct CaptureResult {
    /// `capture-<unix millis>` of the capture time
    pub id: String,
    /// PNG-encoded annotated screenshot
    pub final_image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: DateTime<Utc>,
    pub annotations: Vec<Arc<Annotation>>,
}

impl CaptureResult {
    /// `data:image/png;base64,...` URL of the final image
    pub fn data_url(&self) -> String {
        format!("data:{MIME_TYPE};base64,{}", STANDARD.encode(&self.final_image))
    }

    /// Annotation metadata as pretty-printed JSON
    pub fn annotations_json(&self) -> serde_json::Result<String> {
        let annotations: Vec<&Annotation> = self.annotations.iter().map(Arc::as_ref).collect();
        serde_json::to_string_pretty(&annotations)
    }

    /// Write the PNG to `path` and the annotation metadata next to it
    /// (same name, `.json` extension)
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, &self.final_image)
            .with_context(|| format!("failed to write {}", path.display()))?;

        let sidecar = path.with_extension("json");
        let json = self.annotations_json()?;
        std::fs::write(&sidecar, json)
            .with_context(|| format!("failed to write {}", sidecar.display()))?;

        log::info!(
            "Saved {} ({}x{}, {} annotations)",
            path.display(),
            self.width,
            self.height,
            self.annotations.len()
        );
        Ok(())
    }
}

/// Rasterize `annotations` over `base` at native resolution
///
/// `base` must be the premultiplied copy of `image`.
pub fn export(
    image: &CapturedImage,
    base: &Pixmap,
    annotations: &[Arc<Annotation>],
    style: &RenderStyle,
) -> Result<CaptureResult, EditorError> {
    let mut surface = export_surface(image.size())?;
    paint_composite(
        &mut surface,
        base,
        DisplayScale::NATIVE,
        annotations.iter().map(Arc::as_ref),
        style,
    );

    let rgba = rgba_from_pixmap(&surface);
    let mut final_image = Vec::new();
    write_png(&mut final_image, &rgba)?;

    let timestamp = image.timestamp();
    log::info!(
        "Exported {}x{} capture with {} annotations ({} bytes)",
        image.width(),
        image.height(),
        annotations.len(),
        final_image.len()
    );

    Ok(CaptureResult {
        id: format!("capture-{}", timestamp.timestamp_millis()),
        final_image,
        width: image.width(),
        height: image.height(),
        timestamp,
        annotations: annotations.to_vec(),
    })
}

/// Native-size export surface; allocation failure is an export failure
fn export_surface(size: PixelSize) -> Result<Pixmap, EditorError> {
    new_surface(size).map_err(|err| EditorError::ExportFailure(err.to_string()))
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
