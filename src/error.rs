//! Error types surfaced by the editor

use thiserror::Error;

use crate::capture::CaptureError;

/// Errors reported to the caller of an editor session
///
/// Drafts with too few points are not errors: they are dropped at commit
/// time and reported as [`CommitOutcome::Discarded`](crate::session::CommitOutcome).
#[derive(Debug, Error)]
pub enum EditorError {
    /// The capture provider refused or could not produce an image; no
    /// session was created
    #[error("screen capture unavailable: {0}")]
    CaptureUnavailable(#[from] CaptureError),
    /// The drawing surface could not be allocated; the session must be
    /// aborted
    #[error("drawing surface unavailable ({width}x{height})")]
    DrawSurfaceUnavailable { width: u32, height: u32 },
    /// Rasterizing or encoding the final image failed; the session is
    /// untouched and export may be retried
    #[error("export failed: {0}")]
    ExportFailure(String),
}

impl From<png::EncodingError> for EditorError {
    fn from(err: png::EncodingError) -> Self {
        EditorError::ExportFailure(err.to_string())
    }
}
