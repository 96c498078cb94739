//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared between display and export rendering
//! - Per-kind shape drawing using tiny-skia
//! - Bitmap text for text annotations
//! - The compositor that repaints base image + annotations

pub mod composite;
pub mod geometry;
pub mod pixmap;
pub mod shapes;
pub mod text;

pub use composite::{Compositor, paint_composite};
pub use shapes::{Draw, RenderStyle, Shape, draw_annotation};
