//! Node placement and arrow anchor points.
//!
//! Nodes of an `n`-state chain sit on the vertices of a regular polygon. Every
//! node gets `2n` anchor points on its circumference, two per neighbour offset,
//! so that the arrow leaving a node and the arrow entering it from the same
//! neighbour never share an endpoint.

use std::f32::consts::PI;

/// Radius of the circle the polygon vertices are placed on.
pub const POLYGON_RADIUS: f32 = 6.0;

/// Angular increment between anchors when there is no polygon to derive one from.
const TWO_NODE_INCREMENT: f32 = PI / 8.0;

/// A point in diagram (data) coordinates, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` in direction `angle` (radians).
    pub fn on_circle(center: Point, radius: f32, angle: f32) -> Self {
        Self::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }

    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn lerp(&self, other: Point, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Vertices of a regular `n`-gon of radius [`POLYGON_RADIUS`].
///
/// Vertex 0 is `(POLYGON_RADIUS, 0)`; each following vertex is rotated by
/// `2π/n` counter-clockwise, so vertex `i` and vertex `i + 1` are adjacent.
pub fn compute_polygon_coordinates(n: usize) -> Vec<Point> {
    let step = 2.0 * PI / n as f32;
    let origin = Point::default();

    (0..n)
        .map(|i| Point::on_circle(origin, POLYGON_RADIUS, step * i as f32))
        .collect()
}

/// Angular layout of one node's anchors: where the first anchor sits and how
/// far apart consecutive anchors are.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AnchorFan {
    start: f32,
    increment: f32,
}

fn anchor_fans(n: usize) -> Vec<AnchorFan> {
    if n == 2 {
        // A 2-gon has no interior angle; use a fixed spread facing the other node.
        let increment = TWO_NODE_INCREMENT;
        let first = AnchorFan {
            start: -increment * n as f32,
            increment,
        };
        let second = AnchorFan {
            start: PI - increment * n as f32,
            increment,
        };
        return vec![first, second];
    }

    let polygon_angle = (n as f32 - 2.0) * PI;
    let corner_angle = polygon_angle / n as f32;
    let increment = 0.5 * corner_angle / (n as f32 - 2.0);

    let mut start = PI - increment * n as f32;
    let mut fans = Vec::with_capacity(n);
    for _ in 0..n {
        fans.push(AnchorFan { start, increment });
        start += 4.0 * increment;
    }
    fans
}

/// Anchors on every node's circumference, `2n` per node.
///
/// Anchor `2k` of node `a` points at the neighbour `k` places further round
/// the polygon; anchor `2k + 1` sits one increment past it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorTable {
    anchors: Vec<Vec<Point>>,
}

/// The four anchors used by the arrow pair between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairAnchors {
    /// Where the arrow `a → b` leaves `a`.
    pub forward_start: Point,
    /// Where the arrow `a → b` enters `b`.
    pub forward_end: Point,
    /// Where the arrow `b → a` leaves `b`.
    pub reverse_start: Point,
    /// Where the arrow `b → a` enters `a`.
    pub reverse_end: Point,
}

impl AnchorTable {
    pub fn node_count(&self) -> usize {
        self.anchors.len()
    }

    /// Anchors of one node, in index order.
    pub fn node(&self, node: usize) -> &[Point] {
        &self.anchors[node]
    }

    /// Anchor `index` of `node`. Negative indices count from the end of the
    /// node's row: `-1` is the last anchor, `-2` the one before it.
    pub fn anchor(&self, node: usize, index: isize) -> Point {
        let row = &self.anchors[node];
        let len = row.len() as isize;
        row[index.rem_euclid(len) as usize]
    }

    /// Anchors for the arrows between `a` and `b`, `a < b`.
    pub fn pair(&self, a: usize, b: usize) -> PairAnchors {
        debug_assert!(a < b, "pair anchors expect a < b, got {a} and {b}");
        let offset = (b - a) as isize;

        PairAnchors {
            forward_start: self.anchor(a, 2 * offset),
            forward_end: self.anchor(b, -2 * offset),
            reverse_start: self.anchor(b, -(2 * offset + 1)),
            reverse_end: self.anchor(a, 2 * offset + 1),
        }
    }
}

/// Lays `2n` anchors on each node's circle of `radius`.
///
/// The angular increment comes from the corner angle of the regular polygon,
/// `((n - 2)π / n) / 2(n - 2)`, so anchors crowd closer together as the node
/// count grows. Two-node chains use a fixed `π/8` increment.
pub fn compute_anchor_points(coords: &[Point], radius: f32) -> AnchorTable {
    let n = coords.len();
    let anchors = coords
        .iter()
        .zip(anchor_fans(n))
        .map(|(&center, fan)| {
            (0..2 * n)
                .map(|j| Point::on_circle(center, radius, fan.start + j as f32 * fan.increment))
                .collect()
        })
        .collect();

    AnchorTable { anchors }
}
