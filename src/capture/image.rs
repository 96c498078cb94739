//! Captured screenshot image owned by an editor session

use chrono::{DateTime, Utc};
use image::RgbaImage;

use super::{CaptureError, RawCapture};
use crate::domain::PixelSize;

/// A captured screenshot: RGBA pixels plus the time of capture
///
/// Immutable once acquired.
#[derive(Clone, Debug)]
pub struct CapturedImage {
    rgba: RgbaImage,
    timestamp: DateTime<Utc>,
}

impl CapturedImage {
    /// Wrap an already decoded image, stamped with the current time
    pub fn new(rgba: RgbaImage) -> Result<Self, CaptureError> {
        Self::with_timestamp(rgba, Utc::now())
    }

    pub fn with_timestamp(rgba: RgbaImage, timestamp: DateTime<Utc>) -> Result<Self, CaptureError> {
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(CaptureError::Empty);
        }
        log::debug!(
            "CapturedImage acquired: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Ok(Self { rgba, timestamp })
    }

    /// Build from a provider's raw RGBA buffer
    pub fn from_raw(raw: RawCapture) -> Result<Self, CaptureError> {
        let RawCapture {
            pixels,
            width,
            height,
        } = raw;
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        let rgba = RgbaImage::from_raw(width, height, pixels).ok_or(CaptureError::BadBuffer {
            width,
            height,
            expected,
            actual,
        })?;
        Self::new(rgba)
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width(), self.height())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
