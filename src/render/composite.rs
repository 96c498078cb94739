//! Full-repaint compositing of base image, committed annotations and draft
//!
//! Every repaint starts from a cleared surface. Annotations are painted in
//! the order given, so later ones cover earlier ones where they overlap.

use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint};

use super::pixmap::new_surface;
use super::shapes::{RenderStyle, draw_annotation};
use crate::domain::{Annotation, PixelSize};
use crate::error::EditorError;
use crate::viewport::DisplayScale;

/// Clear `surface`, draw `base` at `scale`, then each annotation in order
pub fn paint_composite<'a>(
    surface: &mut Pixmap,
    base: &Pixmap,
    scale: DisplayScale,
    annotations: impl IntoIterator<Item = &'a Annotation>,
    style: &RenderStyle,
) {
    let transform = scale.transform();

    if scale.is_native() && surface.width() == base.width() && surface.height() == base.height()
    {
        surface.data_mut().copy_from_slice(base.data());
    } else {
        surface.fill(Color::TRANSPARENT);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        surface.draw_pixmap(0, 0, base.as_ref(), &paint, transform, None);
    }

    for annotation in annotations {
        draw_annotation(surface, annotation, style, transform);
    }
}

/// Display surface for an editor session
///
/// Holds the pixmap the user sees, sized to the image at the current display
/// scale.
#[derive(Debug)]
pub struct Compositor {
    surface: Pixmap,
    scale: DisplayScale,
}

impl Compositor {
    /// Acquire a display surface for an image of `image` pixels at `scale`
    pub fn new(image: PixelSize, scale: DisplayScale) -> Result<Self, EditorError> {
        let surface = new_surface(scale.display_size(image))?;
        Ok(Self { surface, scale })
    }

    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    /// Repaint everything: base image, `committed` in insertion order, then
    /// `draft` on top
    pub fn render<'a>(
        &mut self,
        base: &Pixmap,
        committed: impl IntoIterator<Item = &'a Annotation>,
        draft: Option<&'a Annotation>,
        style: &RenderStyle,
    ) -> &Pixmap {
        paint_composite(
            &mut self.surface,
            base,
            self.scale,
            committed.into_iter().chain(draft),
            style,
        );
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeColor;
    use crate::domain::{AnnotationId, AnnotationKind, Point};

    const RED: ShapeColor = ShapeColor::rgb(255, 0, 0);
    const BLUE: ShapeColor = ShapeColor::rgb(0, 0, 255);

    fn base(size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        pixmap.fill(Color::WHITE);
        pixmap
    }

    fn rect(id: u64, color: ShapeColor) -> Annotation {
        Annotation {
            id: AnnotationId(id),
            kind: AnnotationKind::Rectangle,
            points: vec![Point::new(10.0, 10.0), Point::new(30.0, 30.0)],
            color,
            stroke_width: 4.0,
            text: None,
        }
    }

    fn rgb(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 3] {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue()]
    }

    #[test]
    fn test_later_annotations_cover_earlier_ones() {
        let base = base(40);
        let style = RenderStyle::default();
        let mut compositor = Compositor::new(PixelSize::new(40, 40), DisplayScale::NATIVE).unwrap();

        let (red, blue) = (rect(1, RED), rect(2, BLUE));
        let surface = compositor.render(&base, [&red, &blue], None, &style);
        assert_eq!(rgb(surface, 20, 10), [0, 0, 255]);

        let surface = compositor.render(&base, [&blue, &red], None, &style);
        assert_eq!(rgb(surface, 20, 10), [255, 0, 0]);
    }

    #[test]
    fn test_draft_is_painted_last() {
        let base = base(40);
        let style = RenderStyle::default();
        let mut compositor = Compositor::new(PixelSize::new(40, 40), DisplayScale::NATIVE).unwrap();

        let (committed, draft) = (rect(1, RED), rect(2, BLUE));
        let surface = compositor.render(&base, [&committed], Some(&draft), &style);
        assert_eq!(rgb(surface, 20, 10), [0, 0, 255]);
    }

    #[test]
    fn test_repaint_starts_from_clean_base() {
        let base = base(40);
        let style = RenderStyle::default();
        let mut compositor = Compositor::new(PixelSize::new(40, 40), DisplayScale::NATIVE).unwrap();

        let red = rect(1, RED);
        compositor.render(&base, [&red], None, &style);
        let surface = compositor.render(&base, std::iter::empty(), None, &style);
        assert_eq!(rgb(surface, 20, 10), [255, 255, 255]);
    }

    #[test]
    fn test_scaled_surface() {
        let base = base(40);
        let style = RenderStyle::default();
        let scale = DisplayScale::new(0.5);
        let mut compositor = Compositor::new(PixelSize::new(40, 40), scale).unwrap();
        assert_eq!(compositor.surface().width(), 20);
        assert_eq!(compositor.scale(), scale);

        let mut red = rect(1, RED);
        red.stroke_width = 8.0;
        let surface = compositor.render(&base, [&red], None, &style);
        // Top edge at image y = 10 lands at display y = 5
        assert_eq!(rgb(surface, 10, 5), [255, 0, 0]);
        assert_eq!(rgb(surface, 10, 10), [255, 255, 255]);
    }
}
