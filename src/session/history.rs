//! Committed annotations with undo/redo history
//!
//! The committed list is an `Arc<Vec<Arc<Annotation>>>`. Every mutation builds
//! a new list and moves the previous one onto the undo stack, so a snapshot is
//! just a reference count bump and annotations are never deep-copied.

use std::mem;
use std::sync::Arc;

use crate::config::ShapeColor;
use crate::domain::{Annotation, AnnotationId, AnnotationKind, Point};

/// Shared, immutable snapshot of the committed annotations
pub type AnnotationList = Arc<Vec<Arc<Annotation>>>;

/// Result of [`AnnotationHistory::commit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The draft was appended to the committed list
    Committed(AnnotationId),
    /// The draft did not have enough data and was dropped
    Discarded,
    /// There was no draft
    NoDraft,
}

#[derive(Debug, Clone)]
pub struct AnnotationHistory {
    committed: AnnotationList,
    undo_stack: Vec<AnnotationList>,
    redo_stack: Vec<AnnotationList>,
    draft: Option<Annotation>,
    next_id: u64,
}

impl Default for AnnotationHistory {
    fn default() -> Self {
        Self {
            committed: Arc::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            draft: None,
            next_id: 1,
        }
    }
}

impl AnnotationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a single-point draft. Returns `false` if a draft already exists.
    pub fn begin(
        &mut self,
        kind: AnnotationKind,
        color: ShapeColor,
        stroke_width: f32,
        point: Point,
    ) -> bool {
        if self.draft.is_some() {
            return false;
        }
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        log::debug!("Draft {id} ({kind:?}) started at ({}, {})", point.x, point.y);
        self.draft = Some(Annotation::new(id, kind, color, stroke_width, point));
        true
    }

    /// Extend the draft; does nothing without one
    pub fn append_point(&mut self, point: Point) {
        if let Some(draft) = self.draft.as_mut() {
            draft.points.push(point);
        }
    }

    /// Replace the label of the draft; does nothing without one
    pub fn set_draft_text(&mut self, text: Option<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.text = text;
        }
    }

    /// Move the draft into the committed list
    ///
    /// Drafts without enough data are dropped and leave both stacks as they
    /// were.
    pub fn commit(&mut self) -> CommitOutcome {
        let Some(draft) = self.draft.take() else {
            return CommitOutcome::NoDraft;
        };
        if !draft.is_complete() {
            log::debug!(
                "Discarding draft {} ({:?}, {} points)",
                draft.id,
                draft.kind,
                draft.points.len()
            );
            return CommitOutcome::Discarded;
        }

        let id = draft.id;
        let mut next = Vec::with_capacity(self.committed.len() + 1);
        next.extend(self.committed.iter().cloned());
        next.push(Arc::new(draft));
        self.replace_committed(Arc::new(next));
        log::debug!("Committed {id}, {} annotations", self.committed.len());
        CommitOutcome::Committed(id)
    }

    /// Drop the draft without touching either stack
    pub fn cancel_draft(&mut self) -> bool {
        self.draft.take().is_some()
    }

    /// Restore the previous committed list. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = mem::replace(&mut self.committed, previous);
        self.redo_stack.push(current);
        log::debug!("Undo, {} annotations", self.committed.len());
        true
    }

    /// Re-apply the last undone change. No-op when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = mem::replace(&mut self.committed, next);
        self.undo_stack.push(current);
        log::debug!("Redo, {} annotations", self.committed.len());
        true
    }

    /// Remove every committed annotation as one undoable step
    pub fn clear(&mut self) {
        self.replace_committed(AnnotationList::default());
        log::debug!("Cleared annotations");
    }

    fn replace_committed(&mut self, next: AnnotationList) {
        let previous = mem::replace(&mut self.committed, next);
        self.undo_stack.push(previous);
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Whether there are no committed annotations
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Committed annotations in insertion order
    pub fn annotations(&self) -> &[Arc<Annotation>] {
        &self.committed
    }

    /// The committed list itself, for identity comparisons
    pub fn committed_list(&self) -> &AnnotationList {
        &self.committed
    }

    pub fn draft(&self) -> Option<&Annotation> {
        self.draft.as_ref()
    }
}
