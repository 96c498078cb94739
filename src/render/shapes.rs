//! Per-kind annotation drawing using tiny-skia
//!
//! An annotation is first turned into a [`Shape`] (its geometry at render
//! time), and every shape variant knows how to [`Draw`] itself.

use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

use super::geometry::{self, ArrowGeometry, EllipseGeometry, RectGeometry};
use super::text;
use crate::config::{EditorConfig, ShapeColor};
use crate::domain::{Annotation, AnnotationKind, Point};

/// Rendering parameters that are fixed for a whole session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    pub highlight_opacity: f32,
    pub arrow_head_length: f32,
    pub font_size: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for RenderStyle {
    fn from(config: &EditorConfig) -> Self {
        Self {
            highlight_opacity: config.highlight_opacity,
            arrow_head_length: config.arrow_head_length,
            font_size: config.font_size,
        }
    }
}

/// Color, opacity and width an annotation is painted with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
    pub color: ShapeColor,
    pub opacity: f32,
    pub width: f32,
}

impl Brush {
    fn paint(&self) -> Paint<'static> {
        let [r, g, b, a] = self.color.to_rgba_u8(self.opacity);
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        }
    }

    fn stroke_path(&self, pixmap: &mut Pixmap, path: &Path, transform: Transform) {
        pixmap.stroke_path(path, &self.paint(), &self.stroke(), transform, None);
    }
}

/// Something that can paint itself onto a pixmap in image-space coordinates
pub trait Draw {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform);
}

/// Freehand marker stroke through every point
#[derive(Clone, Copy, Debug)]
pub struct Polyline<'a> {
    pub points: &'a [Point],
}

/// Text anchored at its first baseline
#[derive(Clone, Copy, Debug)]
pub struct TextRun<'a> {
    pub anchor: Point,
    pub text: &'a str,
    pub font_size: f32,
}

/// Render-time geometry of one annotation
#[derive(Clone, Copy, Debug)]
pub enum Shape<'a> {
    Highlight(Polyline<'a>),
    Arrow(ArrowGeometry),
    Rectangle(RectGeometry),
    Circle(EllipseGeometry),
    Text(TextRun<'a>),
}

impl<'a> Shape<'a> {
    /// Geometry for `annotation`, or `None` when it has nothing to draw yet
    /// (pointer annotations, single-point drags, text without a label)
    pub fn from_annotation(annotation: &'a Annotation, style: &RenderStyle) -> Option<Self> {
        let shape = match annotation.kind {
            AnnotationKind::Pointer => return None,
            AnnotationKind::Highlight => {
                if annotation.points.len() < 2 {
                    return None;
                }
                Shape::Highlight(Polyline {
                    points: &annotation.points,
                })
            }
            AnnotationKind::Arrow => {
                let (start, end) = annotation.endpoints()?;
                Shape::Arrow(ArrowGeometry::new(start, end, style.arrow_head_length))
            }
            AnnotationKind::Rectangle => {
                let (first, last) = annotation.endpoints()?;
                Shape::Rectangle(RectGeometry::new(first, last))
            }
            AnnotationKind::Circle => {
                let (first, last) = annotation.endpoints()?;
                Shape::Circle(EllipseGeometry::new(first, last))
            }
            AnnotationKind::Text => {
                let text = annotation.text.as_deref().filter(|t| !t.is_empty())?;
                Shape::Text(TextRun {
                    anchor: annotation.first_point()?,
                    text,
                    font_size: style.font_size,
                })
            }
        };
        Some(shape)
    }

    /// Brush for `annotation` under `style`
    pub fn brush(annotation: &Annotation, style: &RenderStyle) -> Brush {
        let opacity = match annotation.kind {
            AnnotationKind::Highlight => style.highlight_opacity,
            _ => 1.0,
        };
        Brush {
            color: annotation.color,
            opacity,
            width: annotation.stroke_width,
        }
    }
}

impl Draw for Shape<'_> {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform) {
        match self {
            Shape::Highlight(line) => line.draw(pixmap, brush, transform),
            Shape::Arrow(arrow) => arrow.draw(pixmap, brush, transform),
            Shape::Rectangle(rect) => rect.draw(pixmap, brush, transform),
            Shape::Circle(ellipse) => ellipse.draw(pixmap, brush, transform),
            Shape::Text(run) => run.draw(pixmap, brush, transform),
        }
    }
}

impl Draw for Polyline<'_> {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform) {
        let Some((first, rest)) = self.points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        // Stroked as one path so overlapping segments don't stack opacity
        if let Some(path) = pb.finish() {
            brush.stroke_path(pixmap, &path, transform);
        }
    }
}

/// Build an arrow path as stroked lines (shaft + two angled head lines)
fn build_arrow_path(arrow: &ArrowGeometry) -> Option<Path> {
    let [head1, head2] = arrow.head;
    let mut pb = PathBuilder::new();

    // Shaft line from start to end
    pb.move_to(arrow.start.x, arrow.start.y);
    pb.line_to(arrow.end.x, arrow.end.y);

    // First head line
    pb.move_to(arrow.end.x, arrow.end.y);
    pb.line_to(head1.x, head1.y);

    // Second head line
    pb.move_to(arrow.end.x, arrow.end.y);
    pb.line_to(head2.x, head2.y);

    pb.finish()
}

impl Draw for ArrowGeometry {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform) {
        if let Some(path) = build_arrow_path(self) {
            brush.stroke_path(pixmap, &path, transform);
        }
    }
}

impl Draw for RectGeometry {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform) {
        let [a, b, c, d] = self.corners();
        let mut pb = PathBuilder::new();
        pb.move_to(a.x, a.y);
        pb.line_to(b.x, b.y);
        pb.line_to(c.x, c.y);
        pb.line_to(d.x, d.y);
        pb.close();
        if let Some(path) = pb.finish() {
            brush.stroke_path(pixmap, &path, transform);
        }
    }
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(ellipse: &EllipseGeometry) -> Option<Path> {
    let (cx, cy) = (ellipse.center.x, ellipse.center.y);
    let (rx, ry) = (ellipse.radius_x, ellipse.radius_y);
    let kx = rx * geometry::BEZIER_K;
    let ky = ry * geometry::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

impl Draw for EllipseGeometry {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform) {
        if let Some(path) = build_ellipse_path(self) {
            brush.stroke_path(pixmap, &path, transform);
        }
    }
}

impl Draw for TextRun<'_> {
    fn draw(&self, pixmap: &mut Pixmap, brush: &Brush, transform: Transform) {
        if let Some(path) = text::text_path(self.anchor, self.text, self.font_size) {
            pixmap.fill_path(&path, &brush.paint(), FillRule::Winding, transform, None);
        }
    }
}

/// Draw one annotation; annotations without drawable geometry are skipped
pub fn draw_annotation(
    pixmap: &mut Pixmap,
    annotation: &Annotation,
    style: &RenderStyle,
    transform: Transform,
) {
    if let Some(shape) = Shape::from_annotation(annotation, style) {
        shape.draw(pixmap, &Shape::brush(annotation, style), transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnnotationId;

    fn annotation(kind: AnnotationKind, points: &[(f32, f32)]) -> Annotation {
        Annotation {
            id: AnnotationId(1),
            kind,
            points: points.iter().map(|p| Point::from(*p)).collect(),
            color: ShapeColor::rgb(255, 0, 0),
            stroke_width: 2.0,
            text: None,
        }
    }

    fn white(size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        pixmap
    }

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    #[test]
    fn test_shape_selection_per_kind() {
        let style = RenderStyle::default();
        let two = [(0.0, 0.0), (10.0, 10.0)];

        let a = annotation(AnnotationKind::Highlight, &two);
        assert!(matches!(Shape::from_annotation(&a, &style), Some(Shape::Highlight(_))));
        let a = annotation(AnnotationKind::Arrow, &two);
        assert!(matches!(Shape::from_annotation(&a, &style), Some(Shape::Arrow(_))));
        let a = annotation(AnnotationKind::Rectangle, &two);
        assert!(matches!(Shape::from_annotation(&a, &style), Some(Shape::Rectangle(_))));
        let a = annotation(AnnotationKind::Circle, &two);
        assert!(matches!(Shape::from_annotation(&a, &style), Some(Shape::Circle(_))));
        let a = annotation(AnnotationKind::Pointer, &two);
        assert!(Shape::from_annotation(&a, &style).is_none());
    }

    #[test]
    fn test_single_point_drag_has_no_shape() {
        let style = RenderStyle::default();
        for kind in [
            AnnotationKind::Highlight,
            AnnotationKind::Arrow,
            AnnotationKind::Rectangle,
            AnnotationKind::Circle,
        ] {
            let a = annotation(kind, &[(3.0, 3.0)]);
            assert!(Shape::from_annotation(&a, &style).is_none(), "{kind:?}");
        }
    }

    #[test]
    fn test_arrow_uses_endpoints_only() {
        let style = RenderStyle::default();
        let a = annotation(AnnotationKind::Arrow, &[(0.0, 0.0), (5.0, 50.0), (10.0, 0.0)]);
        let Some(Shape::Arrow(arrow)) = Shape::from_annotation(&a, &style) else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.angle, 0.0);
        assert_eq!(arrow.end, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_text_needs_label() {
        let style = RenderStyle::default();
        let mut a = annotation(AnnotationKind::Text, &[(4.0, 20.0)]);
        assert!(Shape::from_annotation(&a, &style).is_none());
        a.text = Some("Here".into());
        let Some(Shape::Text(run)) = Shape::from_annotation(&a, &style) else {
            panic!("expected text");
        };
        assert_eq!(run.anchor, Point::new(4.0, 20.0));
        assert_eq!(run.font_size, 16.0);
    }

    #[test]
    fn test_text_pixels_use_annotation_color() {
        let style = RenderStyle::default();
        let mut pixmap = white(20);
        let mut a = annotation(AnnotationKind::Text, &[(0.0, 16.0)]);
        a.text = Some("A".into());
        draw_annotation(&mut pixmap, &a, &style, Transform::identity());

        // Glyph row 4 of 'A' is solid across its first six cells
        assert_eq!(rgba(&pixmap, 3, 9), [255, 0, 0, 255]);
        // Last glyph row is empty, and nothing lands below the baseline
        assert_eq!(rgba(&pixmap, 3, 15), [255, 255, 255, 255]);
        assert_eq!(rgba(&pixmap, 3, 17), [255, 255, 255, 255]);
    }

    #[test]
    fn test_highlight_brush_is_translucent() {
        let style = RenderStyle::default();
        let a = annotation(AnnotationKind::Highlight, &[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(Shape::brush(&a, &style).opacity, 0.3);
        let a = annotation(AnnotationKind::Rectangle, &[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(Shape::brush(&a, &style).opacity, 1.0);
    }

    #[test]
    fn test_rectangle_stroke_pixels() {
        let style = RenderStyle::default();
        let mut pixmap = white(40);
        let mut a = annotation(AnnotationKind::Rectangle, &[(10.0, 10.0), (30.0, 30.0)]);
        a.stroke_width = 4.0;
        draw_annotation(&mut pixmap, &a, &style, Transform::identity());

        assert_eq!(rgba(&pixmap, 20, 10), [255, 0, 0, 255]);
        assert_eq!(rgba(&pixmap, 20, 20), [255, 255, 255, 255]);
    }

    #[test]
    fn test_negative_rectangle_draws_same_outline() {
        let style = RenderStyle::default();
        let mut forward = white(40);
        let mut backward = white(40);
        let mut a = annotation(AnnotationKind::Rectangle, &[(10.0, 10.0), (30.0, 30.0)]);
        let mut b = annotation(AnnotationKind::Rectangle, &[(30.0, 30.0), (10.0, 10.0)]);
        a.stroke_width = 4.0;
        b.stroke_width = 4.0;
        draw_annotation(&mut forward, &a, &style, Transform::identity());
        draw_annotation(&mut backward, &b, &style, Transform::identity());
        assert_eq!(rgba(&backward, 20, 10), [255, 0, 0, 255]);
        assert_eq!(rgba(&backward, 10, 20), rgba(&forward, 10, 20));
    }

    #[test]
    fn test_highlight_blends_with_background() {
        let style = RenderStyle::default();
        let mut pixmap = white(40);
        let mut a = annotation(AnnotationKind::Highlight, &[(5.0, 20.0), (35.0, 20.0)]);
        a.stroke_width = 20.0;
        draw_annotation(&mut pixmap, &a, &style, Transform::identity());

        let [r, g, b, alpha] = rgba(&pixmap, 20, 20);
        assert_eq!(alpha, 255);
        assert!(r >= 254, "r = {r}");
        assert!(g > 150 && g < 200, "g = {g}");
        assert_eq!(g, b);
    }

    #[test]
    fn test_transform_scales_geometry() {
        let style = RenderStyle::default();
        let mut pixmap = white(40);
        let mut a = annotation(AnnotationKind::Rectangle, &[(20.0, 20.0), (60.0, 60.0)]);
        a.stroke_width = 8.0;
        draw_annotation(&mut pixmap, &a, &style, Transform::from_scale(0.5, 0.5));
        // Top edge lands at y = 10 in display space
        assert_eq!(rgba(&pixmap, 20, 10)[1], 0);
        assert_eq!(rgba(&pixmap, 20, 20), [255, 255, 255, 255]);
    }
}
