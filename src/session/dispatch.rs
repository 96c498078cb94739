//! Tool dispatch: turns pointer input into draft and commit operations
//!
//! Two states: `Idle` and `Drawing`. Pointer-down starts a draft for the
//! active tool, moves extend it, and pointer-up or pointer-leave commit it.
//! A text anchor without a label stays in `Drawing` until text is entered.
//! The pointer tool never draws.

use crate::config::{EditorConfig, ShapeColor};
use crate::domain::{AnnotationKind, PixelSize, Point};
use crate::viewport::DisplayScale;

use super::history::{AnnotationHistory, CommitOutcome};
use super::messages::PointerEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    #[default]
    Idle,
    Drawing,
}

#[derive(Debug, Clone)]
pub struct ToolDispatch {
    state: InputState,
    tool: AnnotationKind,
    color: ShapeColor,
    /// Label applied to the next text annotation
    pending_text: Option<String>,
    highlight_width: f32,
    stroke_width: f32,
}

impl ToolDispatch {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: InputState::Idle,
            tool: config.default_tool,
            color: config.default_color,
            pending_text: None,
            highlight_width: config.stroke_width_for(AnnotationKind::Highlight),
            stroke_width: config.stroke_width_for(AnnotationKind::Rectangle),
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn tool(&self) -> AnnotationKind {
        self.tool
    }

    pub fn color(&self) -> ShapeColor {
        self.color
    }

    pub fn pending_text(&self) -> Option<&str> {
        self.pending_text.as_deref()
    }

    fn stroke_width(&self, kind: AnnotationKind) -> f32 {
        match kind {
            AnnotationKind::Highlight => self.highlight_width,
            _ => self.stroke_width,
        }
    }

    /// Switch tools, committing any annotation in progress first
    ///
    /// Returns whether anything visible changed.
    pub fn set_tool(&mut self, tool: AnnotationKind, history: &mut AnnotationHistory) -> bool {
        let committed = self.finish(history) != CommitOutcome::NoDraft;
        if self.tool != tool {
            log::debug!("Tool {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
        committed
    }

    /// Switch colors, committing any annotation in progress first
    pub fn set_color(&mut self, color: ShapeColor, history: &mut AnnotationHistory) -> bool {
        let committed = self.finish(history) != CommitOutcome::NoDraft;
        self.color = color;
        committed
    }

    /// Label a placed text anchor and commit it, or keep the label for the
    /// next anchor when none is waiting
    pub fn enter_text(&mut self, text: String, history: &mut AnnotationHistory) -> bool {
        let text = (!text.is_empty()).then_some(text);
        match history.draft() {
            Some(draft) if draft.kind == AnnotationKind::Text => {
                let labelled = text.is_some();
                history.set_draft_text(text);
                if labelled {
                    self.finish(history);
                }
                true
            }
            _ => {
                self.pending_text = text;
                false
            }
        }
    }

    /// Feed one pointer event in display coordinates
    ///
    /// Positions are mapped to image space and clamped to the image bounds.
    /// Returns whether the draft or the committed list changed.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        scale: DisplayScale,
        bounds: PixelSize,
        history: &mut AnnotationHistory,
    ) -> bool {
        if !self.tool.draws() {
            return false;
        }
        let to_image = |x: f32, y: f32| {
            scale
                .to_image_space(Point::new(x, y))
                .clamp_to(bounds.width as f32, bounds.height as f32)
        };

        match (self.state, event) {
            (InputState::Drawing, PointerEvent::Down { x, y })
                if history.draft().is_some_and(|d| d.awaits_text()) =>
            {
                // A new click moves an anchor that is still waiting for text
                history.cancel_draft();
                self.state = InputState::Idle;
                self.handle_pointer(PointerEvent::Down { x, y }, scale, bounds, history)
            }
            (InputState::Idle, PointerEvent::Down { x, y }) => {
                let point = to_image(x, y);
                if !history.begin(self.tool, self.color, self.stroke_width(self.tool), point) {
                    return false;
                }
                if self.tool == AnnotationKind::Text {
                    history.set_draft_text(self.pending_text.clone());
                }
                self.state = InputState::Drawing;
                true
            }
            (InputState::Drawing, PointerEvent::Move { x, y }) => {
                if self.tool == AnnotationKind::Text {
                    return false;
                }
                history.append_point(to_image(x, y));
                true
            }
            (InputState::Drawing, PointerEvent::Up { x, y }) => {
                if self.tool == AnnotationKind::Text {
                    // An unlabelled anchor stays placed until text is entered
                    if history.draft().is_some_and(|d| d.awaits_text()) {
                        return false;
                    }
                } else {
                    let point = to_image(x, y);
                    let last = history.draft().and_then(|d| d.last_point());
                    if last != Some(point) {
                        history.append_point(point);
                    }
                }
                self.finish(history);
                true
            }
            (InputState::Drawing, PointerEvent::Leave) => {
                if self.tool == AnnotationKind::Text {
                    return false;
                }
                self.finish(history);
                true
            }
            _ => false,
        }
    }

    /// Commit the draft (if any) and return to `Idle`
    pub fn finish(&mut self, history: &mut AnnotationHistory) -> CommitOutcome {
        self.state = InputState::Idle;
        history.commit()
    }

    /// Drop the draft (if any) and return to `Idle`
    pub fn cancel(&mut self, history: &mut AnnotationHistory) -> bool {
        self.state = InputState::Idle;
        history.cancel_draft()
    }
}
