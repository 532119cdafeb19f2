use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{TimelineError, TimelineResult};
use crate::render::{
    Color, LayerPrimitives, LineStrokeStyle, LinePrimitive, MarkerPrimitive, RectPrimitive,
    RenderFrame, Renderer, TextHAlign,
};

const DASH_PATTERN: [f64; 2] = [4.0, 3.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
    pub markers_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a toolkit draw callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> TimelineResult<()>;
}

/// Cairo + Pango + PangoCairo timeline backend.
///
/// Renders offscreen into an image surface through `Renderer::render`, or in
/// place on an external context through `CairoContextRenderer`. Marker moves
/// repaint the last frame with the marker shifted.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_frame: Option<RenderFrame>,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> TimelineResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(TimelineError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_frame: None,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> TimelineResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Encodes the current surface as PNG.
    pub fn write_png(&self, writer: &mut impl std::io::Write) -> TimelineResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| TimelineError::Render(format!("failed to encode png: {err}")))
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let (origin_x, origin_y) = frame.plot_origin;
        context.save().map_err(|err| map_backend_error("failed to save context", err))?;
        context.rectangle(0.0, 0.0, frame.viewport.width, frame.container_height);
        context.clip();
        context.translate(origin_x, origin_y);

        let mut stats = CairoRenderStats::default();
        for layer in &frame.layers {
            draw_layer(context, layer, &mut stats)?;
        }
        for marker in &frame.markers {
            draw_marker(context, marker)?;
            stats.markers_drawn += 1;
        }

        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))?;
        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn container_width(&self) -> f64 {
        f64::from(self.surface.width())
    }

    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)?;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn move_marker(&mut self, marker: &MarkerPrimitive) -> TimelineResult<()> {
        marker.validate()?;
        let Some(mut frame) = self.last_frame.take() else {
            return Ok(());
        };
        frame.reposition_marker(marker.kind, marker.x);
        let result = self.render(&frame);
        if result.is_err() {
            self.last_frame = Some(frame);
        }
        result
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> TimelineResult<()> {
        self.render_with_context(context, frame)
    }
}

fn draw_layer(
    context: &Context,
    layer: &LayerPrimitives,
    stats: &mut CairoRenderStats,
) -> TimelineResult<()> {
    for rect in &layer.rects {
        draw_rect(context, *rect)?;
        stats.rects_drawn += 1;
    }

    for line in &layer.lines {
        draw_line(context, *line)?;
        stats.lines_drawn += 1;
    }

    for text in &layer.texts {
        let pango_layout = pangocairo::functions::create_layout(context);
        let font_description = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
        pango_layout.set_font_description(Some(&font_description));
        pango_layout.set_text(&text.text);

        let (text_width, text_height) = pango_layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };

        apply_color(context, text.color);
        context.move_to(x, text.y - f64::from(text_height) / 2.0);
        pangocairo::functions::show_layout(context, &pango_layout);
        stats.texts_drawn += 1;
    }
    Ok(())
}

fn draw_line(context: &Context, line: LinePrimitive) -> TimelineResult<()> {
    apply_color(context, line.color);
    context.set_line_width(line.stroke_width);
    match line.stroke_style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed => context.set_dash(&DASH_PATTERN, 0.0),
    }
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke line", err))
}

fn draw_rect(context: &Context, rect: RectPrimitive) -> TimelineResult<()> {
    append_rect_path(context, rect);
    apply_color(context, rect.fill_color);
    if rect.border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        apply_color(context, rect.border_color);
        context.set_line_width(rect.border_width);
        context.set_dash(&[], 0.0);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))
    }
}

fn draw_marker(context: &Context, marker: &MarkerPrimitive) -> TimelineResult<()> {
    draw_line(context, marker.as_line())?;
    if marker.handle_radius > 0.0 {
        apply_color(context, marker.color);
        context.new_sub_path();
        context.arc(marker.x, marker.top, marker.handle_radius, 0.0, 2.0 * PI);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill marker handle", err))?;
    }
    Ok(())
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    let (x, width) = if rect.width < 0.0 {
        (rect.x + rect.width, -rect.width)
    } else {
        (rect.x, rect.width)
    };
    if rect.corner_radius <= 0.0 {
        context.rectangle(x, rect.y, width, rect.height);
        return;
    }

    let radius = rect.corner_radius.min(width * 0.5).min(rect.height * 0.5);
    let left = x;
    let top = rect.y;
    let right = x + width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> TimelineError {
    TimelineError::Render(format!("{prefix}: {err}"))
}
