//! Annotation types for drawing on screenshots
//!
//! All annotation types store coordinates in image space (capture resolution),
//! so they stay valid when the viewport is resized.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Point;
use crate::config::ShapeColor;

/// Annotation tool / annotation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Selection mode; never produces an annotation
    #[default]
    Pointer,
    Highlight,
    Arrow,
    Rectangle,
    Circle,
    Text,
}

impl AnnotationKind {
    /// Minimum number of points for a draft of this kind to be committed
    pub fn min_points(self) -> usize {
        match self {
            AnnotationKind::Pointer | AnnotationKind::Text => 1,
            AnnotationKind::Highlight
            | AnnotationKind::Arrow
            | AnnotationKind::Rectangle
            | AnnotationKind::Circle => 2,
        }
    }

    /// Whether pointer input with this tool creates drafts
    pub fn draws(self) -> bool {
        self != AnnotationKind::Pointer
    }
}

/// Session-unique annotation identifier, rendered as `annotation-<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annotation-{}", self.0)
    }
}

impl From<AnnotationId> for String {
    fn from(id: AnnotationId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for AnnotationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .strip_prefix("annotation-")
            .and_then(|n| n.parse().ok())
            .map(AnnotationId)
            .ok_or_else(|| format!("invalid annotation id {value:?}"))
    }
}

/// A single piece of markup
///
/// Drafts are built up point by point; once committed an annotation is shared
/// behind an `Arc` and never mutated again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// Points in image-space coordinates
    pub points: Vec<Point>,
    pub color: ShapeColor,
    /// Stroke width in image pixels
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Annotation {
    pub fn new(
        id: AnnotationId,
        kind: AnnotationKind,
        color: ShapeColor,
        stroke_width: f32,
        start: Point,
    ) -> Self {
        Self {
            id,
            kind,
            points: vec![start],
            color,
            stroke_width,
            text: None,
        }
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// First and last point, for tools that only use the drag endpoints
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        if self.points.len() < 2 {
            return None;
        }
        Some((self.first_point()?, self.last_point()?))
    }

    /// Whether this draft has enough points to be committed
    ///
    /// A text anchor counts even before its label is entered.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.kind.min_points()
    }

    /// Whether this is a text anchor still waiting for its label
    pub fn awaits_text(&self) -> bool {
        self.kind == AnnotationKind::Text && self.text.as_deref().is_none_or(str::is_empty)
    }
}
