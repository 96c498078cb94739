//! Editor session management
//!
//! This module contains:
//! - Annotation history with structural undo/redo
//! - Tool dispatch (pointer input state machine)
//! - Message types for editor interactions
//! - The session that ties capture, history and rendering together

pub mod dispatch;
pub mod history;
pub mod messages;
pub mod state;

pub use dispatch::{InputState, ToolDispatch};
pub use history::{AnnotationHistory, AnnotationList, CommitOutcome};
pub use messages::{EditorMsg, PointerEvent};
pub use state::EditorSession;
