use indexmap::IndexMap;

use crate::error::TimelineResult;
use crate::render::{MarkerPrimitive, RenderFrame, Renderer, SurfaceProvider};

/// Recording renderer used by tests and headless hosts.
///
/// It still validates frame content so tests catch invalid geometry before a
/// real backend sees it.
#[derive(Debug, Clone, Default)]
pub struct NullRenderer {
    container_width: f64,
    last_frame: Option<RenderFrame>,
    render_count: usize,
    marker_moves: usize,
    last_marker: Option<MarkerPrimitive>,
}

impl NullRenderer {
    #[must_use]
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            ..Self::default()
        }
    }

    /// Simulates the host container being resized.
    pub fn set_container_width(&mut self, container_width: f64) {
        self.container_width = container_width;
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    #[must_use]
    pub fn marker_moves(&self) -> usize {
        self.marker_moves
    }

    #[must_use]
    pub fn last_marker(&self) -> Option<MarkerPrimitive> {
        self.last_marker
    }
}

impl Renderer for NullRenderer {
    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.last_frame = Some(frame.clone());
        self.render_count += 1;
        Ok(())
    }

    fn move_marker(&mut self, marker: &MarkerPrimitive) -> TimelineResult<()> {
        marker.validate()?;
        if let Some(frame) = self.last_frame.as_mut() {
            frame.reposition_marker(marker.kind, marker.x);
        }
        self.last_marker = Some(*marker);
        self.marker_moves += 1;
        Ok(())
    }
}

/// In-memory stand-in for a host document: container ids with widths.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    containers: IndexMap<String, f64>,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_container(mut self, container_id: impl Into<String>, width: f64) -> Self {
        self.containers.insert(container_id.into(), width);
        self
    }

    #[must_use]
    pub fn contains(&self, container_id: &str) -> bool {
        self.containers.contains_key(container_id)
    }
}

impl SurfaceProvider for HeadlessDocument {
    type Surface = NullRenderer;

    fn find_container(&mut self, container_id: &str) -> Option<NullRenderer> {
        self.containers
            .get(container_id)
            .map(|width| NullRenderer::new(*width))
    }
}
