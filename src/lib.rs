//! Screenshot annotation editor
//!
//! Capture a screen image, mark it up with highlights, arrows, shapes and
//! text, then export the annotated image with its annotation metadata.

pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod render;
pub mod session;
pub mod viewport;

pub use capture::{CaptureError, CaptureProvider, CapturedImage};
pub use config::{EditorConfig, ShapeColor};
pub use domain::{Annotation, AnnotationId, AnnotationKind, PixelSize, Point};
pub use error::EditorError;
pub use export::CaptureResult;
pub use session::{CommitOutcome, EditorMsg, EditorSession, PointerEvent};
pub use viewport::{DisplayScale, Viewport};
