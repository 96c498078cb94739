//! Message types for an editor session
//!
//! Both enums are serde-tagged so scripted sessions can be replayed from JSON.

use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;
use crate::domain::AnnotationKind;

/// Pointer input in display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// Pointer left the drawing surface
    Leave,
}

/// All editor messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum EditorMsg {
    /// Pointer input on the drawing surface
    Pointer { event: PointerEvent },
    /// Select the active tool
    SetTool { tool: AnnotationKind },
    /// Select the active color
    SetColor { color: ShapeColor },
    /// Label for the next (or current) text annotation
    EnterText { text: String },
    /// Undo last annotation change
    Undo,
    /// Redo undone annotation change
    Redo,
    /// Remove all annotations
    Clear,
    /// Drop the annotation being drawn
    CancelDraft,
}

impl From<PointerEvent> for EditorMsg {
    fn from(event: PointerEvent) -> Self {
        EditorMsg::Pointer { event }
    }
}
