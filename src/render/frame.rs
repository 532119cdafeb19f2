use crate::core::Viewport;
use crate::error::{TimelineError, TimelineResult};
use crate::render::{
    CANONICAL_LAYER_ORDER, LinePrimitive, MarkerKind, MarkerPrimitive, RectPrimitive,
    SceneLayerKind, TextPrimitive,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: SceneLayerKind,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    #[must_use]
    pub fn empty(kind: SceneLayerKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }
}

/// Backend-agnostic scene for one timeline draw pass.
///
/// Primitive coordinates are relative to `plot_origin` (the top-left corner
/// inside the chart margins). `container_height` is the animated height of
/// the host container and may differ from `viewport.height` while the widget
/// is being shown or hidden.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub plot_origin: (f64, f64),
    pub container_height: f64,
    pub layers: Vec<LayerPrimitives>,
    pub markers: Vec<MarkerPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, plot_origin: (f64, f64)) -> Self {
        Self {
            viewport,
            plot_origin,
            container_height: viewport.height,
            layers: CANONICAL_LAYER_ORDER
                .into_iter()
                .map(LayerPrimitives::empty)
                .collect(),
            markers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_container_height(mut self, container_height: f64) -> Self {
        self.container_height = container_height;
        self
    }

    #[must_use]
    pub fn layer(&self, kind: SceneLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    fn layer_mut(&mut self, kind: SceneLayerKind) -> Option<&mut LayerPrimitives> {
        self.layers.iter_mut().find(|layer| layer.kind == kind)
    }

    pub fn push_line(&mut self, kind: SceneLayerKind, line: LinePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.lines.push(line);
        }
    }

    pub fn push_rect(&mut self, kind: SceneLayerKind, rect: RectPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.rects.push(rect);
        }
    }

    pub fn push_text(&mut self, kind: SceneLayerKind, text: TextPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.texts.push(text);
        }
    }

    pub fn push_marker(&mut self, marker: MarkerPrimitive) {
        self.markers.push(marker);
    }

    #[must_use]
    pub fn marker(&self, kind: MarkerKind) -> Option<&MarkerPrimitive> {
        self.markers.iter().find(|marker| marker.kind == kind)
    }

    /// Replaces the x position of one marker, keeping every other primitive.
    pub fn reposition_marker(&mut self, kind: MarkerKind, x: f64) -> bool {
        match self.markers.iter_mut().find(|marker| marker.kind == kind) {
            Some(marker) => {
                marker.x = x;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.lines.len()).sum()
    }

    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.rects.len()).sum()
    }

    #[must_use]
    pub fn text_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.texts.len()).sum()
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if !self.viewport.width.is_finite()
            || !self.viewport.height.is_finite()
            || self.viewport.width < 0.0
            || self.viewport.height < 0.0
        {
            return Err(TimelineError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.container_height.is_finite() || self.container_height < 0.0 {
            return Err(TimelineError::InvalidData(
                "container height must be finite and >= 0".to_owned(),
            ));
        }

        for layer in &self.layers {
            for line in &layer.lines {
                line.validate()?;
            }
            for rect in &layer.rects {
                rect.validate()?;
            }
            for text in &layer.texts {
                text.validate()?;
            }
        }
        for marker in &self.markers {
            marker.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerPrimitives::is_empty) && self.markers.is_empty()
    }
}
