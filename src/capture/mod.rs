//! Image capture module
//!
//! This module contains:
//! - The captured image type owned by an editor session (image.rs)
//! - Capture providers that acquire raw pixels asynchronously (provider.rs)

pub mod image;
pub mod provider;

pub use self::image::CapturedImage;
pub use provider::{
    CaptureError, CaptureProvider, FallbackCapture, FileCapture, RawCapture, StaticCapture,
};
