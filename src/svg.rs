//! SVG backend for [`Surface`].

use crate::fonts::{MIN_FONT_SIZE, TextMeasure, fit_font_size};
use crate::geometry::Point;
use crate::math::{MathError, math_label, render_math_at};
use crate::surface::{Arrow, Paint, Surface, TextStyle, Wedge};
use crate::xml::escape_xml;

/// Segments used to approximate a 360° arc.
const ARC_SEGMENTS_PER_TURN: f32 = 96.0;
/// Share of the canvas width a title may take.
const TITLE_MAX_WIDTH: f32 = 0.9;

/// Maps diagram coordinates onto a pixel canvas.
///
/// The scale is the same on both axes; whichever axis has room to spare is
/// centred. `top` pixels above the diagram area are left free for a title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub xlim: (f32, f32),
    pub ylim: (f32, f32),
    pub width: f32,
    pub height: f32,
    pub top: f32,
}

impl Viewport {
    pub fn new(xlim: (f32, f32), ylim: (f32, f32), width: f32, height: f32) -> Self {
        Self {
            xlim,
            ylim,
            width,
            height,
            top: 0.0,
        }
    }

    pub fn with_top_margin(mut self, top: f32) -> Self {
        self.top = top;
        self
    }

    /// Full canvas height, title margin included.
    pub fn total_height(&self) -> f32 {
        self.height + self.top
    }

    /// Pixels per diagram unit.
    pub fn scale(&self) -> f32 {
        let sx = self.width / (self.xlim.1 - self.xlim.0);
        let sy = self.height / (self.ylim.1 - self.ylim.0);
        sx.min(sy)
    }

    /// Pixel position of `p`, with y growing downwards.
    pub fn to_px(&self, p: Point) -> (f32, f32) {
        let scale = self.scale();
        let x_mid = (self.xlim.0 + self.xlim.1) / 2.0;
        let y_mid = (self.ylim.0 + self.ylim.1) / 2.0;
        (
            self.width / 2.0 + (p.x - x_mid) * scale,
            self.top + self.height / 2.0 - (p.y - y_mid) * scale,
        )
    }
}

/// Collects drawing calls as SVG elements.
pub struct SvgSurface<'m, M: TextMeasure + ?Sized> {
    viewport: Viewport,
    measure: &'m mut M,
    font_family: String,
    body: String,
}

impl<'m, M: TextMeasure + ?Sized> SvgSurface<'m, M> {
    pub fn new(viewport: Viewport, measure: &'m mut M, font_family: &str) -> Self {
        Self {
            viewport,
            measure,
            font_family: escape_xml(font_family).into_owned(),
            body: String::new(),
        }
    }

    /// Heading centred across the top of the canvas, outside the diagram
    /// area. Shrinks to fit the canvas width.
    pub fn title(&mut self, text: &str, style: &TextStyle<'_>) {
        let font_size = fit_font_size(
            &mut *self.measure,
            text,
            style.font_size,
            self.viewport.width * TITLE_MAX_WIDTH,
            style.bold,
        );
        let weight = if style.bold { r#" font-weight="bold""# } else { "" };

        self.body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}"{} text-anchor="middle">{}</text>"#,
            self.viewport.width / 2.0,
            style.font_size * 1.2,
            self.font_family,
            font_size,
            escape_xml(style.color),
            weight,
            escape_xml(text)
        ));
    }

    /// Wrap everything drawn so far in a complete SVG document.
    pub fn finish(self, background: &str) -> String {
        let w = self.viewport.width;
        let h = self.viewport.total_height();
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect width="{w}" height="{h}" fill="{background}"/>
{body}
</svg>"#,
            w = w,
            h = h,
            background = escape_xml(background),
            body = self.body,
        )
    }

    /// Lay out a LaTeX label centred on `at`, shrunk like plain text when it
    /// is wider than `style.max_width`.
    fn math_text(
        &mut self,
        at: Point,
        latex: &str,
        style: &TextStyle<'_>,
    ) -> Result<(), MathError> {
        let sized = render_math_at(
            latex,
            style.font_size,
            style.color,
            &mut *self.measure,
            0.0,
            0.0,
        )?;

        let font_size = match style.max_width {
            Some(max_width) if sized.width > max_width * self.viewport.scale() => {
                (style.font_size * max_width * self.viewport.scale() / sized.width)
                    .max(MIN_FONT_SIZE)
            }
            _ => style.font_size,
        };
        let k = font_size / style.font_size;

        let (x, y) = self.viewport.to_px(at);
        let left = x - sized.width * k / 2.0;
        let baseline = y - sized.height() * k / 2.0 + sized.ascent * k;

        let placed = render_math_at(
            latex,
            font_size,
            style.color,
            &mut *self.measure,
            left,
            baseline,
        )?;
        self.body.push_str(&placed.svg_fragment);
        Ok(())
    }

    fn points_attr(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| {
                let (x, y) = self.viewport.to_px(*p);
                format!("{:.2},{:.2}", x, y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<M: TextMeasure + ?Sized> Surface for SvgSurface<'_, M> {
    fn circle(&mut self, center: Point, radius: f32, paint: Paint<'_>) {
        let (cx, cy) = self.viewport.to_px(center);
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="1" />"#,
            cx,
            cy,
            radius * self.viewport.scale(),
            escape_xml(paint.fill),
            escape_xml(paint.stroke)
        ));
    }

    fn polygon(&mut self, points: &[Point], paint: Paint<'_>) {
        self.body.push_str(&format!(
            r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="1" />"#,
            self.points_attr(points),
            escape_xml(paint.fill),
            escape_xml(paint.stroke)
        ));
    }

    fn wedge(&mut self, wedge: &Wedge, paint: Paint<'_>) {
        let segments = (wedge.sweep() / 360.0 * ARC_SEGMENTS_PER_TURN).ceil() as usize;
        let outline = wedge.outline(segments);
        self.polygon(&outline, paint);
    }

    fn arrow(&mut self, arrow: &Arrow, paint: Paint<'_>) {
        let (x1, y1) = self.viewport.to_px(arrow.start);
        let (cx, cy) = self.viewport.to_px(arrow.control_point());
        let (x2, y2) = self.viewport.to_px(arrow.shaft_end());

        self.body.push_str(&format!(
            r#"<path d="M {:.2} {:.2} Q {:.2} {:.2}, {:.2} {:.2}" fill="none" stroke="{}" stroke-width="{:.2}" />"#,
            x1,
            y1,
            cx,
            cy,
            x2,
            y2,
            escape_xml(paint.fill),
            arrow.width * self.viewport.scale()
        ));
        self.polygon(&arrow.head(), paint);
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle<'_>) {
        if let Some(latex) = math_label(text) {
            // Labels that are not valid LaTeX are drawn as written.
            if self.math_text(at, latex, style).is_ok() {
                return;
            }
        }

        let font_size = match style.max_width {
            Some(max_width) => fit_font_size(
                &mut *self.measure,
                text,
                style.font_size,
                max_width * self.viewport.scale(),
                style.bold,
            ),
            None => style.font_size,
        };

        let (x, y) = self.viewport.to_px(at);
        let weight = if style.bold { r#" font-weight="bold""# } else { "" };
        let color = escape_xml(style.color);

        let lines: Vec<&str> = text.lines().collect();
        let line_height = font_size * 1.2;
        let total_height = line_height * lines.len() as f32;
        let start_y = y + font_size / 3.0 - total_height / 2.0 + line_height / 2.0;

        for (i, line) in lines.iter().enumerate() {
            self.body.push_str(&format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}"{} text-anchor="middle">{}</text>"#,
                x,
                start_y + i as f32 * line_height,
                self.font_family,
                font_size,
                color,
                weight,
                escape_xml(line)
            ));
        }
    }
}
