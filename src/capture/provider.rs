//! Capture providers
//!
//! A provider asynchronously produces the raw pixels of a screen capture.
//! The editor awaits it before a session exists, so a failed capture never
//! leaves a half-built session behind.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use image::RgbaImage;
use thiserror::Error;

/// Raw RGBA8 pixels returned by a provider
#[derive(Clone, Debug)]
pub struct RawCapture {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl From<RgbaImage> for RawCapture {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            pixels: img.into_raw(),
            width,
            height,
        }
    }
}

/// Why a capture could not be produced
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("permission to capture the screen was denied")]
    PermissionDenied,
    #[error("screen capture is not supported: {0}")]
    Unsupported(String),
    #[error("captured image is empty")]
    Empty,
    #[error("capture buffer is {actual} bytes, expected {expected} for {width}x{height}")]
    BadBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("could not read capture: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode capture: {0}")]
    Decode(#[from] image::ImageError),
}

impl CaptureError {
    /// Whether another provider may succeed where this one failed
    ///
    /// A denied permission is the user's answer and is not worked around.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CaptureError::Unsupported(_))
    }
}

/// Source of screen captures
pub trait CaptureProvider {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Acquire one still image
    fn capture(&self) -> BoxFuture<'_, Result<RawCapture, CaptureError>>;
}

/// Provider backed by an in-memory image
#[derive(Clone, Debug)]
pub struct StaticCapture {
    image: RgbaImage,
}

impl StaticCapture {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl CaptureProvider for StaticCapture {
    fn name(&self) -> &str {
        "static"
    }

    fn capture(&self) -> BoxFuture<'_, Result<RawCapture, CaptureError>> {
        Box::pin(async move { Ok(RawCapture::from(self.image.clone())) })
    }
}

/// Provider that loads a screenshot from an image file
#[derive(Clone, Debug)]
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureProvider for FileCapture {
    fn name(&self) -> &str {
        "file"
    }

    fn capture(&self) -> BoxFuture<'_, Result<RawCapture, CaptureError>> {
        Box::pin(async move {
            let bytes = tokio::fs::read(&self.path).await?;
            let img = image::load_from_memory(&bytes)?.to_rgba8();
            log::debug!(
                "Loaded {} ({}x{})",
                self.path.display(),
                img.width(),
                img.height()
            );
            Ok(RawCapture::from(img))
        })
    }
}

/// Try `primary`, and fall back to `secondary` when the primary capture
/// method is unsupported on this system
pub struct FallbackCapture<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackCapture<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> CaptureProvider for FallbackCapture<P, S>
where
    P: CaptureProvider + Sync,
    S: CaptureProvider + Sync,
{
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn capture(&self) -> BoxFuture<'_, Result<RawCapture, CaptureError>> {
        Box::pin(async move {
            match self.primary.capture().await {
                Err(err) if err.is_unsupported() => {
                    log::warn!(
                        "{} capture unavailable ({}), falling back to {}",
                        self.primary.name(),
                        err,
                        self.secondary.name()
                    );
                    self.secondary.capture().await
                }
                result => result,
            }
        })
    }
}
