use crate::error::{TimelineError, TimelineResult};
use crate::render::{
    Color, LayerPrimitives, LineStrokeStyle, LinePrimitive, MarkerKind, MarkerPrimitive,
    RectPrimitive, RenderFrame, Renderer, SceneLayerKind, TextHAlign, TextPrimitive,
};

/// Renders frames into a standalone SVG document string.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    container_width: f64,
    last_frame: Option<RenderFrame>,
    document: String,
}

impl SvgRenderer {
    pub fn new(container_width: f64) -> TimelineResult<Self> {
        if !container_width.is_finite() || container_width <= 0.0 {
            return Err(TimelineError::InvalidViewport {
                width: container_width,
                height: 0.0,
            });
        }
        Ok(Self {
            container_width,
            last_frame: None,
            document: String::new(),
        })
    }

    /// Last rendered document; empty before the first frame.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    fn write_document(&mut self, frame: &RenderFrame) {
        let width = frame.viewport.width;
        let height = frame.container_height;
        let (origin_x, origin_y) = frame.plot_origin;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"  <g class="timeline" transform="translate({origin_x},{origin_y})">"#
        ));
        svg.push('\n');

        for layer in &frame.layers {
            svg.push_str(&render_layer(layer));
        }
        for marker in &frame.markers {
            svg.push_str(&render_marker(marker));
        }

        svg.push_str("  </g>\n</svg>\n");
        self.document = svg;
    }
}

impl Renderer for SvgRenderer {
    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.write_document(frame);
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn move_marker(&mut self, marker: &MarkerPrimitive) -> TimelineResult<()> {
        marker.validate()?;
        let Some(mut frame) = self.last_frame.take() else {
            return Ok(());
        };
        frame.reposition_marker(marker.kind, marker.x);
        self.write_document(&frame);
        self.last_frame = Some(frame);
        Ok(())
    }
}

fn layer_class(kind: SceneLayerKind) -> &'static str {
    match kind {
        SceneLayerKind::Lanes => "lanes",
        SceneLayerKind::Bars => "bars",
        SceneLayerKind::Details => "details",
        SceneLayerKind::Labels => "labels",
        SceneLayerKind::Axis => "axis",
    }
}

fn render_layer(layer: &LayerPrimitives) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(r#"    <g class="{}">"#, layer_class(layer.kind)));
    svg.push('\n');
    for rect in &layer.rects {
        svg.push_str(&render_rect(rect));
    }
    for line in &layer.lines {
        svg.push_str(&render_line(line));
    }
    for text in &layer.texts {
        svg.push_str(&render_text(text));
    }
    svg.push_str("    </g>\n");
    svg
}

fn paint(attribute: &str, color: Color) -> String {
    format!(
        r#"{attribute}="{}" {attribute}-opacity="{}""#,
        color.to_hex(),
        color.alpha
    )
}

fn dash(style: LineStrokeStyle) -> &'static str {
    match style {
        LineStrokeStyle::Solid => "",
        LineStrokeStyle::Dashed => r#" stroke-dasharray="4 3""#,
    }
}

fn render_line(line: &LinePrimitive) -> String {
    format!(
        "      <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {} stroke-width=\"{}\"{}/>\n",
        line.x1,
        line.y1,
        line.x2,
        line.y2,
        paint("stroke", line.color),
        line.stroke_width,
        dash(line.stroke_style)
    )
}

fn render_rect(rect: &RectPrimitive) -> String {
    // SVG rejects negative widths; bars whose end precedes their start are
    // drawn over the same pixels with the origin flipped.
    let (x, width) = if rect.width < 0.0 {
        (rect.x + rect.width, -rect.width)
    } else {
        (rect.x, rect.width)
    };
    let mut svg = format!(
        "      <rect x=\"{x}\" y=\"{}\" width=\"{width}\" height=\"{}\" {}",
        rect.y,
        rect.height,
        paint("fill", rect.fill_color)
    );
    if rect.corner_radius > 0.0 {
        svg.push_str(&format!(" rx=\"{}\"", rect.corner_radius));
    }
    if rect.border_width > 0.0 {
        svg.push_str(&format!(
            " {} stroke-width=\"{}\"",
            paint("stroke", rect.border_color),
            rect.border_width
        ));
    }
    svg.push_str("/>\n");
    svg
}

fn render_text(text: &TextPrimitive) -> String {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    format!(
        "      <text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\" {}>{}</text>\n",
        text.x,
        text.y,
        text.font_size_px,
        paint("fill", text.color),
        xml_escape(&text.text)
    )
}

fn render_marker(marker: &MarkerPrimitive) -> String {
    let class = match marker.kind {
        MarkerKind::Selected => "marker-selected",
        MarkerKind::Now => "marker-now",
    };
    let mut svg = format!("    <g class=\"{class}\">\n");
    svg.push_str(&render_line(&marker.as_line()));
    if marker.handle_radius > 0.0 {
        svg.push_str(&format!(
            "      <circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>\n",
            marker.x,
            marker.top,
            marker.handle_radius,
            paint("fill", marker.color)
        ));
    }
    svg.push_str("    </g>\n");
    svg
}

fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
