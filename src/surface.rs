//! Drawing primitives the chain renderer needs from a backend.
//!
//! Shapes are described in diagram coordinates (y up). A backend maps them to
//! whatever output it produces; see [`crate::svg::SvgSurface`].

use crate::geometry::Point;

/// Fill and outline colours for a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint<'a> {
    pub fill: &'a str,
    pub stroke: &'a str,
}

impl<'a> Paint<'a> {
    pub fn new(fill: &'a str, stroke: &'a str) -> Self {
        Self { fill, stroke }
    }
}

/// Text placement and size. Text is always centred on its anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub color: &'a str,
    /// Font size in pixels.
    pub font_size: f32,
    /// Widest the text may be, in diagram units. Backends shrink the font to fit.
    pub max_width: Option<f32>,
    pub bold: bool,
}

impl<'a> TextStyle<'a> {
    pub fn new(color: &'a str, font_size: f32) -> Self {
        Self {
            color,
            font_size,
            max_width: None,
            bold: false,
        }
    }

    pub fn fit_within(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A sector of an annulus: the ring between `radius - width` and `radius`,
/// swept counter-clockwise from `theta1` to `theta2` (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub center: Point,
    pub radius: f32,
    pub theta1: f32,
    pub theta2: f32,
    pub width: f32,
}

impl Wedge {
    /// Counter-clockwise sweep in degrees, always in `(0, 360]`.
    pub fn sweep(&self) -> f32 {
        let sweep = (self.theta2 - self.theta1).rem_euclid(360.0);
        if sweep == 0.0 { 360.0 } else { sweep }
    }

    /// Closed outline: the outer arc forwards, then the inner arc backwards.
    pub fn outline(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        let inner = (self.radius - self.width).max(0.0);
        let start = self.theta1.to_radians();
        let step = self.sweep().to_radians() / segments as f32;

        let outer_arc = (0..=segments)
            .map(|i| Point::on_circle(self.center, self.radius, start + step * i as f32));
        let inner_arc = (0..=segments)
            .rev()
            .map(|i| Point::on_circle(self.center, inner, start + step * i as f32));

        outer_arc.chain(inner_arc).collect()
    }
}

/// A filled arrow along a quadratic curve from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    /// Shaft thickness in diagram units.
    pub width: f32,
    pub head_width: f32,
    pub head_length: f32,
    /// How far the curve bows to the right of its chord, as a fraction of the
    /// chord length. Zero draws a straight arrow.
    pub bend: f32,
}

impl Arrow {
    pub fn control_point(&self) -> Point {
        let mid = self.start.lerp(self.end, 0.5);
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        // Right normal of the chord, scaled by the chord length.
        Point::new(mid.x + dy * self.bend, mid.y - dx * self.bend)
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Point {
        let c = self.control_point();
        let a = self.start.lerp(c, t);
        let b = c.lerp(self.end, t);
        a.lerp(b, t)
    }

    /// Where the shaft stops and the head begins.
    pub fn shaft_end(&self) -> Point {
        let (ux, uy) = self.end_direction();
        Point::new(
            self.end.x - ux * self.head_length,
            self.end.y - uy * self.head_length,
        )
    }

    /// Head triangle: tip, then the two base corners.
    pub fn head(&self) -> [Point; 3] {
        let (ux, uy) = self.end_direction();
        let base = self.shaft_end();
        let half = self.head_width / 2.0;
        [
            self.end,
            Point::new(base.x - uy * half, base.y + ux * half),
            Point::new(base.x + uy * half, base.y - ux * half),
        ]
    }

    /// Unit tangent of the curve at `end`.
    fn end_direction(&self) -> (f32, f32) {
        let c = self.control_point();
        let (dx, dy) = (self.end.x - c.x, self.end.y - c.y);
        let len = dx.hypot(dy);
        if len <= f32::EPSILON {
            (1.0, 0.0)
        } else {
            (dx / len, dy / len)
        }
    }
}

/// A 2D drawing target.
pub trait Surface {
    fn circle(&mut self, center: Point, radius: f32, paint: Paint<'_>);

    fn polygon(&mut self, points: &[Point], paint: Paint<'_>);

    fn wedge(&mut self, wedge: &Wedge, paint: Paint<'_>);

    fn arrow(&mut self, arrow: &Arrow, paint: Paint<'_>);

    /// Draw `text` centred on `at`. Lines are separated by `'\n'`.
    fn text(&mut self, at: Point, text: &str, style: &TextStyle<'_>);
}


#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn wedge_sweep_wraps_negative_start() {
        let up = Wedge {
            center: Point::default(),
            radius: 1.0,
            theta1: -30.0,
            theta2: 180.0,
            width: 0.1,
        };
        assert!((up.sweep() - 210.0).abs() < EPS);

        let down = Wedge {
            theta1: -210.0,
            theta2: 0.0,
            ..up
        };
        assert!((down.sweep() - 210.0).abs() < EPS);
    }

    #[test]
    fn wedge_outline_stays_inside_the_ring() {
        let wedge = Wedge {
            center: Point::new(2.0, 1.0),
            radius: 0.5,
            theta1: -30.0,
            theta2: 180.0,
            width: 0.08,
        };
        let outline = wedge.outline(24);
        assert_eq!(outline.len(), 50);
        for p in outline {
            let d = p.distance(wedge.center);
            assert!(d <= 0.5 + EPS && d >= 0.42 - EPS, "point at distance {d}");
        }
    }

    #[test]
    fn straight_arrow_head_sits_at_the_end() {
        let arrow = Arrow {
            start: Point::new(0.0, 0.0),
            end: Point::new(4.0, 0.0),
            width: 0.05,
            head_width: 0.2,
            head_length: 0.3,
            bend: 0.0,
        };
        let [tip, left, right] = arrow.head();
        assert_eq!(tip, arrow.end);
        assert!((left.x - 3.7).abs() < EPS && (left.y - 0.1).abs() < EPS);
        assert!((right.x - 3.7).abs() < EPS && (right.y + 0.1).abs() < EPS);
        assert!((arrow.point_at(0.5).x - 2.0).abs() < EPS);
    }

    #[test]
    fn positive_bend_bows_to_the_right() {
        let arrow = Arrow {
            start: Point::new(0.0, 0.0),
            end: Point::new(4.0, 0.0),
            width: 0.05,
            head_width: 0.2,
            head_length: 0.3,
            bend: 0.2,
        };
        assert!(arrow.point_at(0.5).y < 0.0);

        let reversed = Arrow {
            start: arrow.end,
            end: arrow.start,
            ..arrow
        };
        assert!(reversed.point_at(0.5).y > 0.0);
    }
}
