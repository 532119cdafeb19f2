mod frame;
mod layer_stack;
mod null_renderer;
pub mod palette;
mod primitives;
mod reconcile;
pub mod scene;
mod svg_renderer;
pub mod transition;

pub use frame::{LayerPrimitives, RenderFrame};
pub use layer_stack::{CANONICAL_LAYER_ORDER, SceneLayerKind};
pub use null_renderer::{HeadlessDocument, NullRenderer};
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, MarkerKind, MarkerPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use reconcile::{JoinSummary, KeyedJoin};
pub use scene::{SceneLayout, SceneReconcileReport, TimelineScene};
pub use svg_renderer::SvgRenderer;

use crate::error::TimelineResult;

/// Contract implemented by any drawing surface hosting a timeline.
///
/// Backends receive a fully materialized `RenderFrame` so drawing code stays
/// isolated from scale, diff and gesture logic. `move_marker` is the cheap
/// path used while a date marker is dragged: only that marker changes.
pub trait Renderer {
    /// Current width of the host container in pixels.
    fn container_width(&self) -> f64;

    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()>;

    fn move_marker(&mut self, marker: &MarkerPrimitive) -> TimelineResult<()>;
}

/// Locates the surface for a container id.
pub trait SurfaceProvider {
    type Surface: Renderer;

    fn find_container(&mut self, container_id: &str) -> Option<Self::Surface>;
}

/// Provider holding exactly one pre-built surface under one id.
///
/// The surface is handed out at most once.
#[derive(Debug)]
pub struct SingleSurfaceProvider<R> {
    container_id: String,
    surface: Option<R>,
}

impl<R: Renderer> SingleSurfaceProvider<R> {
    #[must_use]
    pub fn new(container_id: impl Into<String>, surface: R) -> Self {
        Self {
            container_id: container_id.into(),
            surface: Some(surface),
        }
    }
}

impl<R: Renderer> SurfaceProvider for SingleSurfaceProvider<R> {
    type Surface = R;

    fn find_container(&mut self, container_id: &str) -> Option<R> {
        if container_id == self.container_id {
            self.surface.take()
        } else {
            None
        }
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
