//! Editor session: one captured image being annotated
//!
//! The session owns the capture, the annotation history, the tool state and
//! the display surface. Every mutating message is followed by an explicit
//! full repaint.

use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::capture::{CaptureProvider, CapturedImage};
use crate::config::{EditorConfig, ShapeColor};
use crate::domain::{Annotation, AnnotationKind};
use crate::error::EditorError;
use crate::export::{self, CaptureResult};
use crate::render::pixmap::pixmap_from_rgba;
use crate::render::{Compositor, RenderStyle};
use crate::viewport::{DisplayScale, Viewport};

use super::dispatch::{InputState, ToolDispatch};
use super::history::AnnotationHistory;
use super::messages::EditorMsg;

#[derive(Debug)]
pub struct EditorSession {
    image: CapturedImage,
    /// Premultiplied copy of `image`, painted under every frame
    base: Pixmap,
    history: AnnotationHistory,
    dispatch: ToolDispatch,
    viewport: Viewport,
    compositor: Compositor,
    style: RenderStyle,
}

impl EditorSession {
    /// Await a capture from `provider` and open a session on it
    ///
    /// Nothing is created when the capture fails.
    pub async fn capture(
        provider: &dyn CaptureProvider,
        viewport: Viewport,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        log::info!("Requesting capture from {} provider", provider.name());
        let raw = provider.capture().await.inspect_err(|err| {
            log::warn!("{} capture failed: {}", provider.name(), err);
        })?;
        let image = CapturedImage::from_raw(raw)?;
        Self::new(image, viewport, config)
    }

    /// Open a session on an already captured image
    pub fn new(
        image: CapturedImage,
        viewport: Viewport,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let base = pixmap_from_rgba(image.rgba())?;
        let scale = DisplayScale::fit(image.size(), viewport);
        let compositor = Compositor::new(image.size(), scale)?;
        log::info!(
            "Editor session opened: {}x{} at scale {:.3}",
            image.width(),
            image.height(),
            scale.factor()
        );

        let mut session = Self {
            image,
            base,
            history: AnnotationHistory::new(),
            dispatch: ToolDispatch::new(config),
            viewport,
            compositor,
            style: RenderStyle::from(config),
        };
        session.render();
        Ok(session)
    }

    /// Apply one message; repaints and returns `true` when anything visible
    /// changed
    pub fn update(&mut self, msg: EditorMsg) -> bool {
        let history = &mut self.history;
        let changed = match msg {
            EditorMsg::Pointer { event } => self.dispatch.handle_pointer(
                event,
                self.compositor.scale(),
                self.image.size(),
                history,
            ),
            EditorMsg::SetTool { tool } => self.dispatch.set_tool(tool, history),
            EditorMsg::SetColor { color } => self.dispatch.set_color(color, history),
            EditorMsg::EnterText { text } => self.dispatch.enter_text(text, history),
            EditorMsg::Undo => {
                self.dispatch.finish(history);
                history.undo()
            }
            EditorMsg::Redo => {
                self.dispatch.finish(history);
                history.redo()
            }
            EditorMsg::Clear => {
                self.dispatch.finish(history);
                history.clear();
                true
            }
            EditorMsg::CancelDraft => self.dispatch.cancel(history),
        };
        if changed {
            self.render();
        }
        changed
    }

    /// Repaint the display surface from scratch
    pub fn render(&mut self) -> &Pixmap {
        self.compositor.render(
            &self.base,
            self.history.annotations().iter().map(Arc::as_ref),
            self.history.draft(),
            &self.style,
        )
    }

    /// The last rendered frame
    pub fn surface(&self) -> &Pixmap {
        self.compositor.surface()
    }

    /// Fit the image to a new viewport, re-acquiring the display surface
    ///
    /// On failure the session keeps its previous surface and scale.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EditorError> {
        let scale = DisplayScale::fit(self.image.size(), viewport);
        if viewport == self.viewport && scale == self.compositor.scale() {
            return Ok(());
        }
        self.compositor = Compositor::new(self.image.size(), scale)?;
        self.viewport = viewport;
        log::debug!("Viewport {:?}, scale {:.3}", viewport, scale.factor());
        self.render();
        Ok(())
    }

    pub fn image(&self) -> &CapturedImage {
        &self.image
    }

    pub fn history(&self) -> &AnnotationHistory {
        &self.history
    }

    /// Committed annotations in insertion order
    pub fn annotations(&self) -> &[Arc<Annotation>] {
        self.history.annotations()
    }

    pub fn draft(&self) -> Option<&Annotation> {
        self.history.draft()
    }

    pub fn tool(&self) -> AnnotationKind {
        self.dispatch.tool()
    }

    pub fn color(&self) -> ShapeColor {
        self.dispatch.color()
    }

    pub fn input_state(&self) -> InputState {
        self.dispatch.state()
    }

    pub fn scale(&self) -> DisplayScale {
        self.compositor.scale()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Rasterize the committed annotations at native resolution
    ///
    /// The draft is not included. The session is left untouched, so a
    /// failed export can be retried.
    pub fn export(&self) -> Result<CaptureResult, EditorError> {
        export::export(
            &self.image,
            &self.base,
            self.history.annotations(),
            &self.style,
        )
    }

    /// Finish the session, handing back the session itself if export fails
    pub fn complete(self) -> Result<CaptureResult, (Self, EditorError)> {
        match self.export() {
            Ok(result) => {
                log::info!("Editor session completed: {}", result.id);
                Ok(result)
            }
            Err(err) => {
                log::error!("Export failed: {err}");
                Err((self, err))
            }
        }
    }

    /// Discard the session and everything drawn in it
    pub fn cancel(self) {
        log::info!(
            "Editor session cancelled with {} annotations",
            self.history.annotations().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureError, RawCapture, StaticCapture};
    use crate::session::PointerEvent;
    use futures::future::BoxFuture;
    use image::RgbaImage;

    struct Denied;

    impl CaptureProvider for Denied {
        fn name(&self) -> &str {
            "denied"
        }

        fn capture(&self) -> BoxFuture<'_, Result<RawCapture, CaptureError>> {
            Box::pin(async { Err(CaptureError::PermissionDenied) })
        }
    }

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
    }

    fn session(width: u32, height: u32, viewport: Viewport) -> EditorSession {
        let image = CapturedImage::new(white(width, height)).unwrap();
        // Wide enough strokes to fully cover the pixels checked below
        let config = EditorConfig {
            stroke_width: 4.0,
            ..Default::default()
        };
        EditorSession::new(image, viewport, &config).unwrap()
    }

    fn drag(session: &mut EditorSession, from: (f32, f32), to: (f32, f32)) {
        session.update(PointerEvent::Down { x: from.0, y: from.1 }.into());
        session.update(PointerEvent::Move { x: to.0, y: to.1 }.into());
        session.update(PointerEvent::Up { x: to.0, y: to.1 }.into());
    }

    fn rgb(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 3] {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue()]
    }

    #[tokio::test]
    async fn test_capture_opens_session() {
        let provider = StaticCapture::new(white(400, 200));
        let session = EditorSession::capture(
            &provider,
            Viewport::new(200.0, 200.0),
            &EditorConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(session.scale().factor(), 0.5);
        assert_eq!(
            (session.surface().width(), session.surface().height()),
            (200, 100)
        );
        assert_eq!(session.tool(), AnnotationKind::Pointer);
    }

    #[tokio::test]
    async fn test_capture_failure_creates_nothing() {
        let result =
            EditorSession::capture(&Denied, Viewport::unbounded(), &EditorConfig::default()).await;
        assert!(matches!(
            result,
            Err(EditorError::CaptureUnavailable(CaptureError::PermissionDenied))
        ));
    }

    #[test]
    fn test_update_repaints_committed_annotation() {
        let mut session = session(40, 40, Viewport::unbounded());
        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Rectangle,
        });
        session.update(EditorMsg::SetColor {
            color: ShapeColor::rgb(0, 0, 255),
        });
        drag(&mut session, (10.0, 10.0), (30.0, 30.0));

        assert_eq!(session.annotations().len(), 1);
        assert_eq!(session.input_state(), InputState::Idle);
        assert_eq!(rgb(session.surface(), 20, 10), [0, 0, 255]);

        assert!(session.update(EditorMsg::Undo));
        assert_eq!(rgb(session.surface(), 20, 10), [255, 255, 255]);
        assert!(session.update(EditorMsg::Redo));
        assert_eq!(rgb(session.surface(), 20, 10), [0, 0, 255]);
    }

    #[test]
    fn test_draft_is_visible_but_not_exported() {
        let mut session = session(40, 40, Viewport::unbounded());
        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Rectangle,
        });
        session.update(PointerEvent::Down { x: 10.0, y: 10.0 }.into());
        session.update(PointerEvent::Move { x: 30.0, y: 30.0 }.into());
        assert!(session.draft().is_some());
        assert_eq!(rgb(session.surface(), 20, 10), [239, 68, 68]);

        let result = session.export().unwrap();
        assert!(result.annotations.is_empty());
        let decoded = image::load_from_memory(&result.final_image)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.get_pixel(20, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_anchor_then_label() {
        let mut session = session(40, 40, Viewport::unbounded());
        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Text,
        });
        session.update(PointerEvent::Down { x: 5.0, y: 20.0 }.into());
        session.update(PointerEvent::Up { x: 5.0, y: 20.0 }.into());
        assert!(session.draft().is_some());

        assert!(session.update(EditorMsg::EnterText { text: "hi".into() }));
        assert_eq!(session.annotations().len(), 1);
        assert_eq!(session.annotations()[0].text.as_deref(), Some("hi"));
        assert!(session.history().can_undo());
    }

    #[test]
    fn test_pointer_tool_changes_nothing() {
        let mut session = session(40, 40, Viewport::unbounded());
        assert!(!session.update(PointerEvent::Down { x: 1.0, y: 1.0 }.into()));
        assert!(!session.update(PointerEvent::Up { x: 9.0, y: 9.0 }.into()));
        assert!(session.annotations().is_empty());
    }

    #[test]
    fn test_undo_mid_drag_commits_first() {
        let mut session = session(40, 40, Viewport::unbounded());
        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Arrow,
        });
        drag(&mut session, (0.0, 0.0), (10.0, 0.0));
        session.update(PointerEvent::Down { x: 0.0, y: 5.0 }.into());
        session.update(PointerEvent::Move { x: 10.0, y: 5.0 }.into());

        assert!(session.update(EditorMsg::Undo));
        assert!(session.draft().is_none());
        assert_eq!(session.annotations().len(), 1);
        assert!(session.history().can_redo());
    }

    #[test]
    fn test_clear_and_undo() {
        let mut session = session(40, 40, Viewport::unbounded());
        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Circle,
        });
        drag(&mut session, (0.0, 0.0), (20.0, 10.0));
        let before = session.history().committed_list().clone();

        assert!(session.update(EditorMsg::Clear));
        assert!(session.annotations().is_empty());
        session.update(EditorMsg::Undo);
        assert!(Arc::ptr_eq(session.history().committed_list(), &before));
    }

    #[test]
    fn test_set_viewport_rescales() {
        let mut session = session(400, 200, Viewport::unbounded());
        assert!(session.scale().is_native());

        session.set_viewport(Viewport::new(100.0, 100.0)).unwrap();
        assert_eq!(session.scale().factor(), 0.25);
        assert_eq!(session.surface().width(), 100);
        assert_eq!(session.viewport(), Viewport::new(100.0, 100.0));

        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Rectangle,
        });
        drag(&mut session, (10.0, 10.0), (20.0, 20.0));
        assert_eq!(
            session.annotations()[0].points.last().copied(),
            Some(crate::domain::Point::new(80.0, 80.0))
        );
    }

    #[test]
    fn test_complete_returns_result() {
        let mut session = session(40, 30, Viewport::new(20.0, 20.0));
        session.update(EditorMsg::SetTool {
            tool: AnnotationKind::Highlight,
        });
        drag(&mut session, (2.0, 2.0), (15.0, 10.0));
        let result = session.complete().unwrap();
        assert_eq!((result.width, result.height), (40, 30));
        assert_eq!(result.annotations.len(), 1);
    }
}
