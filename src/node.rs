//! A single drawn state: its circle, its annotations and its self-loop.

use crate::geometry::Point;
use crate::style::ChainStyle;
use crate::surface::{Paint, Surface, TextStyle, Wedge};

/// Half-width of the self-loop arrowhead, in diagram units.
const LOOP_HEAD_HALF_WIDTH: f32 = 0.2;
/// Length of the self-loop arrowhead, in diagram units.
const LOOP_HEAD_LENGTH: f32 = 0.15;
/// Distance from the node centre to a self-loop's probability label, in radii.
const LOOP_LABEL_DISTANCE: f32 = 2.5;
/// Widest a node label may be, in radii.
const LABEL_MAX_WIDTH: f32 = 1.6;
/// Coordinates this close to an axis count as lying on it.
const AXIS_TOLERANCE: f32 = 1e-4;

/// Which side of the diagram a node sits on. Only used to place the mean
/// annotation when no anchor was computed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Nodes on the vertical axis count as right-hand nodes.
    pub fn of(center: Point) -> Self {
        if center.x < -AXIS_TOLERANCE {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Which way a self-loop opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDirection {
    Up,
    Down,
}

impl LoopDirection {
    /// Loops point away from the diagram centre. Nodes on the horizontal axis
    /// loop upwards.
    pub fn of(center: Point) -> Self {
        if center.y > -AXIS_TOLERANCE {
            LoopDirection::Up
        } else {
            LoopDirection::Down
        }
    }
}

/// Extra per-state text drawn around a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeAnnotation {
    #[default]
    None,
    Initial(f64),
    Full {
        initial: f64,
        mean: Vec<f64>,
        mean_anchor: Option<Point>,
    },
}

impl NodeAnnotation {
    pub fn initial(&self) -> Option<f64> {
        match self {
            NodeAnnotation::None => None,
            NodeAnnotation::Initial(p) | NodeAnnotation::Full { initial: p, .. } => Some(*p),
        }
    }
}

/// The shapes making up one self-loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfLoop {
    pub ring: Wedge,
    pub head: [Point; 3],
    pub label_at: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub index: usize,
    pub center: Point,
    pub radius: f32,
    pub label: String,
    pub annotation: NodeAnnotation,
}

impl Node {
    pub fn new(index: usize, center: Point, radius: f32, label: impl Into<String>) -> Self {
        Self {
            index,
            center,
            radius,
            label: label.into(),
            annotation: NodeAnnotation::None,
        }
    }

    pub fn with_annotation(mut self, annotation: NodeAnnotation) -> Self {
        self.annotation = annotation;
        self
    }

    /// Draw the filled circle, its label and any annotations.
    pub fn render_circle<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        side: Side,
        style: &ChainStyle,
    ) {
        let Point { x, y } = self.center;

        surface.circle(
            self.center,
            self.radius,
            Paint::new(&style.node_fill, &style.node_stroke),
        );
        surface.text(
            self.center,
            &self.label,
            &TextStyle::new(&style.node_label, style.label_font_size)
                .fit_within(LABEL_MAX_WIDTH * self.radius),
        );

        if let Some(initial) = self.annotation.initial() {
            surface.text(
                Point::new(x, y - 0.5 * self.radius),
                &format_value(initial),
                &TextStyle::new(&style.initial_text, style.initial_font_size),
            );
        }

        if let NodeAnnotation::Full {
            mean, mean_anchor, ..
        } = &self.annotation
        {
            let at = mean_anchor.unwrap_or_else(|| self.fallback_mean_anchor(side, mean.len()));
            surface.text(
                at,
                &format_mean(mean).join("\n"),
                &TextStyle::new(&style.annotation_text, style.mean_font_size),
            );
        }
    }

    fn fallback_mean_anchor(&self, side: Side, len: usize) -> Point {
        let Point { x, y } = self.center;
        let x = match side {
            Side::Left => x - 4.5 * self.radius,
            Side::Right => x + 2.0 * self.radius,
        };
        Point::new(x, y + 0.5 * self.radius * len as f32 / 2.0)
    }

    /// Shapes of a self-loop for `probability`, without drawing them.
    ///
    /// The ring is a wedge of the node's radius centred on the top (or bottom)
    /// of the node. Its thickness follows the probability. The arrowhead sits
    /// on the end where the counter-clockwise sweep finishes.
    pub fn self_loop(
        &self,
        probability: f64,
        direction: LoopDirection,
        style: &ChainStyle,
    ) -> SelfLoop {
        let Point { x, y } = self.center;
        let r = self.radius;
        let half_ring = style.ring_width / 2.0;

        let (ring_y, theta1, theta2, head_x, tip_y, label_y) = match direction {
            LoopDirection::Up => (
                y + r,
                -30.0,
                180.0,
                x - r + half_ring,
                y + r - LOOP_HEAD_LENGTH,
                y + LOOP_LABEL_DISTANCE * r,
            ),
            LoopDirection::Down => (
                y - r,
                -210.0,
                0.0,
                x + r - half_ring,
                y - r + LOOP_HEAD_LENGTH,
                y - LOOP_LABEL_DISTANCE * r,
            ),
        };

        let ring = Wedge {
            center: Point::new(x, ring_y),
            radius: r,
            theta1,
            theta2,
            width: style.ring_width_for(probability),
        };
        let head = [
            Point::new(head_x - LOOP_HEAD_HALF_WIDTH, ring_y),
            Point::new(head_x + LOOP_HEAD_HALF_WIDTH, ring_y),
            Point::new(head_x, tip_y),
        ];

        SelfLoop {
            ring,
            head,
            label_at: Point::new(x, label_y),
        }
    }

    /// Draw the self-loop ring and arrowhead, labelled with `probability`
    /// unless it is zero.
    pub fn render_self_loop<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        probability: f64,
        direction: LoopDirection,
        style: &ChainStyle,
    ) {
        let shape = self.self_loop(probability, direction, style);
        let paint = Paint::new(&style.ring_fill, &style.ring_stroke);

        surface.wedge(&shape.ring, paint);
        surface.polygon(&shape.head, paint);

        if probability != 0.0 {
            surface.text(
                shape.label_at,
                &format_value(probability),
                &TextStyle::new(&style.annotation_text, style.probability_font_size),
            );
        }
    }
}

/// `value` with at most three decimals and no trailing zeros.
pub fn format_value(value: f64) -> String {
    let fixed = format!("{:.3}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// A mean vector as a bracketed column, one value per line.
pub fn format_mean(mean: &[f64]) -> Vec<String> {
    let mut lines: Vec<String> = mean.iter().map(|v| format_value(*v)).collect();
    if let Some(first) = lines.first_mut() {
        first.insert(0, '[');
    }
    match lines.last_mut() {
        Some(last) => last.push(']'),
        None => lines.push("[]".to_string()),
    }
    lines
}
