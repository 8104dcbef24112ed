//! Lays out a Markov chain and draws it onto a [`Surface`].
//!
//! ```text
//!  matrix + labels ──▶ validate ──▶ canvas + node placement ──▶ anchor table
//!                                                                   │
//!        image file ◀── output ◀── SvgSurface ◀── loops + arrow pairs ◀┘
//! ```

use std::path::Path;

use crate::error::{ChainError, ExportError, MAX_STATES, MIN_STATES};
use crate::fonts::{CosmicTextMeasure, TextMeasure};
use crate::geometry::{AnchorTable, Point, compute_anchor_points, compute_polygon_coordinates};
use crate::node::{LoopDirection, Node, NodeAnnotation, Side, format_value};
use crate::output::{self, ExportOptions};
use crate::style::ChainStyle;
use crate::surface::{Arrow, Paint, Surface, TextStyle};
use crate::svg::{SvgSurface, Viewport};

/// Fixed centres of a two-state chain.
const TWO_STATE_CENTERS: [Point; 2] = [Point::new(-4.0, 0.0), Point::new(4.0, 0.0)];
/// Distance from a node centre to its mean annotation, in radii.
const MEAN_ANCHOR_DISTANCE: f32 = 2.6;
/// Gap between an arrow's midpoint and its probability label, in diagram units.
const ARROW_LABEL_OFFSET: f32 = 0.3;
/// Pixels reserved above the diagram for a title, in title font sizes.
const TITLE_MARGIN: f32 = 2.0;

/// Square table of transition probabilities, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    values: Vec<f64>,
}

impl TransitionMatrix {
    /// Build from rows. Rows are not checked to sum to one.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ChainError> {
        let n = rows.len();
        if let Some((row, cols)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != n)
        {
            return Err(ChainError::NonSquare { rows: n, row, cols });
        }

        Ok(Self {
            n,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }
}

/// Which per-state annotations a chain carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnnotationMode {
    #[default]
    None,
    InitialOnly(Vec<f64>),
    Full {
        initial: Vec<f64>,
        means: Vec<Vec<f64>>,
    },
}

impl AnnotationMode {
    /// Initial probabilities alone annotate every node; means are only shown
    /// alongside them.
    fn decide(initial: Option<Vec<f64>>, means: Option<Vec<Vec<f64>>>) -> Self {
        match (initial, means) {
            (Some(initial), Some(means)) => AnnotationMode::Full { initial, means },
            (Some(initial), None) => AnnotationMode::InitialOnly(initial),
            (None, _) => AnnotationMode::None,
        }
    }

    fn validate(&self, states: usize) -> Result<(), ChainError> {
        let (initial, means) = match self {
            AnnotationMode::None => return Ok(()),
            AnnotationMode::InitialOnly(initial) => (initial, None),
            AnnotationMode::Full { initial, means } => (initial, Some(means)),
        };

        if initial.len() != states {
            return Err(ChainError::InitialCountMismatch {
                got: initial.len(),
                states,
            });
        }
        match means {
            Some(means) if means.len() != states => Err(ChainError::MeanCountMismatch {
                got: means.len(),
                states,
            }),
            _ => Ok(()),
        }
    }

    fn for_node(&self, index: usize, mean_anchor: Point) -> NodeAnnotation {
        match self {
            AnnotationMode::None => NodeAnnotation::None,
            AnnotationMode::InitialOnly(initial) => NodeAnnotation::Initial(initial[index]),
            AnnotationMode::Full { initial, means } => NodeAnnotation::Full {
                initial: initial[index],
                mean: means[index].clone(),
                mean_anchor: Some(mean_anchor),
            },
        }
    }
}

/// Figure size and axis limits for a chain, in matplotlib-style units:
/// inches for the figure, diagram units for the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub figsize: (f32, f32),
    pub xlim: (f32, f32),
    pub ylim: (f32, f32),
    pub node_radius: f32,
}

impl Canvas {
    pub fn for_states(n: usize) -> Self {
        if n == 2 {
            Self {
                figsize: (10.0, 4.0),
                xlim: (-7.0, 7.0),
                ylim: (-2.0, 2.0),
                node_radius: 0.5,
            }
        } else {
            Self {
                figsize: (10.0, 10.0),
                xlim: (-8.5, 8.5),
                ylim: (-8.5, 8.5),
                node_radius: 0.6,
            }
        }
    }

    pub fn viewport(&self, dpi: f32) -> Viewport {
        Viewport::new(
            self.xlim,
            self.ylim,
            self.figsize.0 * dpi,
            self.figsize.1 * dpi,
        )
    }
}

/// Collects the inputs of a [`MarkovChain`] before validation.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
    initial: Option<Vec<f64>>,
    means: Option<Vec<Vec<f64>>>,
    style: ChainStyle,
    title: Option<String>,
}

impl ChainBuilder {
    pub fn with_initial_probabilities(mut self, initial: Vec<f64>) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn with_means(mut self, means: Vec<Vec<f64>>) -> Self {
        self.means = Some(means);
        self
    }

    pub fn with_style(mut self, style: ChainStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn build(self) -> Result<MarkovChain, ChainError> {
        let n = self.rows.len();
        if n < MIN_STATES {
            return Err(ChainError::TooFewStates { n });
        }
        if n > MAX_STATES {
            return Err(ChainError::TooManyStates { n });
        }

        let matrix = TransitionMatrix::from_rows(self.rows)?;

        if self.labels.len() != n {
            return Err(ChainError::LabelCountMismatch {
                labels: self.labels.len(),
                states: n,
            });
        }

        let annotations = AnnotationMode::decide(self.initial, self.means);
        annotations.validate(n)?;

        let canvas = Canvas::for_states(n);
        let centers = if n == 2 {
            TWO_STATE_CENTERS.to_vec()
        } else {
            compute_polygon_coordinates(n)
        };
        let anchors = compute_anchor_points(&centers, canvas.node_radius);

        let nodes = centers
            .iter()
            .zip(self.labels)
            .enumerate()
            .map(|(index, (&center, label))| {
                let mean_anchor = Point::new(
                    center.x + Side::of(center).sign() * MEAN_ANCHOR_DISTANCE * canvas.node_radius,
                    center.y,
                );
                Node::new(index, center, canvas.node_radius, label)
                    .with_annotation(annotations.for_node(index, mean_anchor))
            })
            .collect();

        Ok(MarkovChain {
            matrix,
            nodes,
            anchors,
            canvas,
            annotations,
            style: self.style,
            title: self.title,
        })
    }
}

/// A validated chain ready to draw. Immutable once built.
#[derive(Debug, Clone)]
pub struct MarkovChain {
    matrix: TransitionMatrix,
    nodes: Vec<Node>,
    anchors: AnchorTable,
    canvas: Canvas,
    annotations: AnnotationMode,
    style: ChainStyle,
    title: Option<String>,
}

impl MarkovChain {
    pub fn builder<I, L>(rows: Vec<Vec<f64>>, labels: I) -> ChainBuilder
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        ChainBuilder {
            rows,
            labels: labels.into_iter().map(Into::into).collect(),
            initial: None,
            means: None,
            style: ChainStyle::default(),
            title: None,
        }
    }

    /// A chain with no annotations and the default style.
    pub fn new<I, L>(rows: Vec<Vec<f64>>, labels: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::builder(rows, labels).build()
    }

    pub fn n_states(&self) -> usize {
        self.matrix.dim()
    }

    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn annotations(&self) -> &AnnotationMode {
        &self.annotations
    }

    pub fn style(&self) -> &ChainStyle {
        &self.style
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Draw self-loops and arrow pairs, then the nodes on top of them.
    ///
    /// Pairs are visited once, from the lower index. When either direction
    /// carries probability both arrows are drawn; a zero-probability partner
    /// is drawn unlabelled at minimum width unless
    /// [`ChainStyle::skip_zero_arrows`] is set.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let n = self.n_states();

        for i in 0..n {
            for j in i..n {
                if i == j {
                    let p = self.matrix.get(i, i);
                    if p > 0.0 {
                        let node = &self.nodes[i];
                        let direction = LoopDirection::of(node.center);
                        node.render_self_loop(surface, p, direction, &self.style);
                    }
                } else if self.matrix.get(i, j) > 0.0 || self.matrix.get(j, i) > 0.0 {
                    self.render_pair(surface, i, j);
                }
            }
        }

        for node in &self.nodes {
            node.render_circle(surface, Side::of(node.center), &self.style);
        }
    }

    fn render_pair<S: Surface + ?Sized>(&self, surface: &mut S, a: usize, b: usize) {
        let anchors = self.anchors.pair(a, b);
        let forward = self.matrix.get(a, b);
        let reverse = self.matrix.get(b, a);

        if forward > 0.0 || !self.style.skip_zero_arrows {
            self.render_arrow(surface, anchors.forward_start, anchors.forward_end, forward);
        }
        if reverse > 0.0 || !self.style.skip_zero_arrows {
            self.render_arrow(surface, anchors.reverse_start, anchors.reverse_end, reverse);
        }
    }

    /// The arrow for a transition of `probability` between two anchors.
    pub fn arrow_between(&self, start: Point, end: Point, probability: f64) -> Arrow {
        Arrow {
            start,
            end,
            width: self.style.arrow_width_for(probability),
            head_width: self.style.arrow_head_width,
            head_length: self.style.arrow_head_length,
            bend: self.style.arrow_bend,
        }
    }

    fn render_arrow<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        start: Point,
        end: Point,
        probability: f64,
    ) {
        let arrow = self.arrow_between(start, end, probability);
        surface.arrow(
            &arrow,
            Paint::new(&self.style.arrow_fill, &self.style.arrow_stroke),
        );

        if probability != 0.0 {
            surface.text(
                arrow_label_position(&arrow),
                &format_value(probability),
                &TextStyle::new(&self.style.annotation_text, self.style.probability_font_size),
            );
        }
    }

    /// Render to a complete SVG document.
    pub fn to_svg<M: TextMeasure + ?Sized>(&self, measure: &mut M) -> String {
        let mut viewport = self.canvas.viewport(self.style.dpi);
        if self.title.is_some() {
            viewport = viewport.with_top_margin(self.style.title_font_size * TITLE_MARGIN);
        }

        let mut surface = SvgSurface::new(viewport, measure, &self.style.font_family);
        if let Some(title) = &self.title {
            surface.title(
                title,
                &TextStyle::new(&self.style.annotation_text, self.style.title_font_size).bold(),
            );
        }
        self.render(&mut surface);
        surface.finish(&self.style.background)
    }

    /// Render and write to `path`, plus an `.svg` sibling unless `path` is
    /// already SVG.
    pub fn draw(&self, path: &Path) -> Result<(), ExportError> {
        self.draw_with(path, &ExportOptions::default())
    }

    pub fn draw_with(&self, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
        let mut measure = CosmicTextMeasure::new();
        let svg = self.to_svg(&mut measure);
        output::export(&svg, path, options)
    }
}

/// Just off the curve's midpoint, on the side it bows towards.
fn arrow_label_position(arrow: &Arrow) -> Point {
    let mid = arrow.point_at(0.5);
    let dx = arrow.end.x - arrow.start.x;
    let dy = arrow.end.y - arrow.start.y;
    let len = dx.hypot(dy);
    if len <= f32::EPSILON {
        return mid;
    }
    Point::new(
        mid.x + dy / len * ARROW_LABEL_OFFSET,
        mid.y - dx / len * ARROW_LABEL_OFFSET,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::ApproxMeasure;
    use crate::surface::recording::RecordingSurface;

    const EPS: f32 = 1e-5;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    fn uniform(n: usize) -> Vec<Vec<f64>> {
        vec![vec![1.0 / n as f64; n]; n]
    }

    fn two_state() -> MarkovChain {
        MarkovChain::new(vec![vec![0.8, 0.2], vec![0.1, 0.9]], ["1", "2"]).expect("valid chain")
    }

    fn rendered(chain: &MarkovChain) -> RecordingSurface {
        let mut surface = RecordingSurface::default();
        chain.render(&mut surface);
        surface
    }

    #[test]
    fn rejects_a_single_state() {
        let err = MarkovChain::new(vec![vec![1.0]], ["1"]).expect_err("one state");
        assert_eq!(err, ChainError::TooFewStates { n: 1 });
    }

    #[test]
    fn rejects_ten_states() {
        let err = MarkovChain::new(uniform(10), labels(10)).expect_err("ten states");
        assert_eq!(err, ChainError::TooManyStates { n: 10 });
    }

    #[test]
    fn rejects_non_square_matrix() {
        let err = MarkovChain::new(vec![vec![0.25; 4]; 3], labels(3)).expect_err("3x4");
        assert_eq!(
            err,
            ChainError::NonSquare {
                rows: 3,
                row: 0,
                cols: 4
            }
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec![0.5, 0.5], vec![1.0]];
        let err = TransitionMatrix::from_rows(rows).expect_err("ragged");
        assert_eq!(
            err,
            ChainError::NonSquare {
                rows: 2,
                row: 1,
                cols: 1
            }
        );
    }

    #[test]
    fn rejects_label_mismatch() {
        let err = MarkovChain::new(uniform(3), ["1", "2"]).expect_err("two labels");
        assert_eq!(
            err,
            ChainError::LabelCountMismatch {
                labels: 2,
                states: 3
            }
        );
    }

    #[test]
    fn rejects_short_annotations() {
        let err = MarkovChain::builder(uniform(3), labels(3))
            .with_initial_probabilities(vec![0.5, 0.5])
            .build()
            .expect_err("two initial probabilities");
        assert_eq!(err, ChainError::InitialCountMismatch { got: 2, states: 3 });

        let err = MarkovChain::builder(uniform(3), labels(3))
            .with_initial_probabilities(vec![0.2, 0.3, 0.5])
            .with_means(vec![vec![1.0]; 4])
            .build()
            .expect_err("four means");
        assert_eq!(err, ChainError::MeanCountMismatch { got: 4, states: 3 });
    }

    #[test]
    fn annotation_mode_is_decided_once() {
        let full = MarkovChain::builder(uniform(2), labels(2))
            .with_initial_probabilities(vec![0.4, 0.6])
            .with_means(vec![vec![0.1, 0.4], vec![0.22, 0.33]])
            .build()
            .expect("full");
        assert!(matches!(full.annotations(), AnnotationMode::Full { .. }));
        assert!(
            full.nodes()
                .iter()
                .all(|n| matches!(n.annotation, NodeAnnotation::Full { .. }))
        );

        let initial = MarkovChain::builder(uniform(2), labels(2))
            .with_initial_probabilities(vec![0.4, 0.6])
            .build()
            .expect("initial only");
        assert_eq!(
            initial.annotations(),
            &AnnotationMode::InitialOnly(vec![0.4, 0.6])
        );
        assert_eq!(initial.nodes()[1].annotation, NodeAnnotation::Initial(0.6));

        let means_only = MarkovChain::builder(uniform(2), labels(2))
            .with_means(vec![vec![0.1], vec![0.2]])
            .build()
            .expect("means are ignored without initial probabilities");
        assert_eq!(means_only.annotations(), &AnnotationMode::None);
    }

    #[test]
    fn two_states_use_fixed_positions() {
        let chain = two_state();
        let canvas = chain.canvas();
        assert_eq!(canvas.figsize, (10.0, 4.0));
        assert_eq!(canvas.node_radius, 0.5);

        let centers: Vec<Point> = chain.nodes().iter().map(|n| n.center).collect();
        assert_eq!(centers, TWO_STATE_CENTERS.to_vec());
    }

    #[test]
    fn larger_chains_sit_on_the_polygon() {
        let chain = MarkovChain::new(uniform(5), labels(5)).expect("five states");
        assert_eq!(chain.canvas().figsize, (10.0, 10.0));

        let expected = compute_polygon_coordinates(5);
        for (node, center) in chain.nodes().iter().zip(expected) {
            assert_eq!(node.center, center);
            assert_eq!(node.radius, 0.6);
        }
        assert_eq!(chain.anchors().node(0).len(), 10);
    }

    #[test]
    fn two_state_scenario() {
        let chain = two_state();
        let surface = rendered(&chain);
        let style = chain.style();

        let circles = surface.circles();
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].0, Point::new(-4.0, 0.0));
        assert_eq!(circles[1].0, Point::new(4.0, 0.0));

        let wedges = surface.wedges();
        assert_eq!(wedges.len(), 2);
        assert!((wedges[0].width - style.ring_width * (0.3 + 2.5 * 0.8)).abs() < EPS);
        assert!((wedges[1].width - style.ring_width * (0.3 + 2.5 * 0.9)).abs() < EPS);

        let arrows = surface.arrows();
        assert_eq!(arrows.len(), 2);
        assert!((arrows[0].width - style.arrow_width * (0.3 + 2.5 * 0.2)).abs() < EPS);
        assert!((arrows[1].width - style.arrow_width * (0.3 + 2.5 * 0.1)).abs() < EPS);

        let texts = surface.texts();
        for expected in ["0.8", "0.9", "0.2", "0.1", "1", "2"] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected} in {texts:?}");
        }
    }

    #[test]
    fn arrows_run_between_pair_anchors() {
        let chain = two_state();
        let surface = rendered(&chain);
        let pair = chain.anchors().pair(0, 1);
        let arrows = surface.arrows();

        assert_eq!((arrows[0].start, arrows[0].end), (pair.forward_start, pair.forward_end));
        assert_eq!((arrows[1].start, arrows[1].end), (pair.reverse_start, pair.reverse_end));
    }

    #[test]
    fn arrow_labels_do_not_collide() {
        let chain = two_state();
        let surface = rendered(&chain);
        let forward = surface.text_at("0.2").expect("forward label");
        let reverse = surface.text_at("0.1").expect("reverse label");
        assert!(forward.distance(reverse) > 0.5);
    }

    #[test]
    fn five_state_scenario() {
        let diagonal = [0.5, 0.5, 1.0, 1.0, 1.0];
        let mut rows = vec![vec![0.0; 5]; 5];
        for (i, p) in diagonal.iter().enumerate() {
            rows[i][i] = *p;
        }
        rows[0][1] = 0.5;
        rows[1][0] = 0.5;

        let chain = MarkovChain::new(rows, labels(5)).expect("five states");
        let surface = rendered(&chain);
        let style = chain.style();

        assert_eq!(surface.arrows().len(), 2);

        let wedges = surface.wedges();
        assert_eq!(wedges.len(), 5);
        for (wedge, p) in wedges.iter().zip(diagonal) {
            assert!((wedge.width - style.ring_width_for(p)).abs() < EPS);
        }
    }

    #[test]
    fn loops_open_away_from_the_centre() {
        let chain = MarkovChain::new(uniform(4), labels(4)).expect("four states");
        let surface = rendered(&chain);

        for (wedge, node) in surface.wedges().iter().zip(chain.nodes()) {
            if node.center.y >= 0.0 {
                assert!(wedge.center.y > node.center.y);
            } else {
                assert!(wedge.center.y < node.center.y);
            }
        }
    }

    #[test]
    fn zero_diagonal_draws_no_loop() {
        let chain =
            MarkovChain::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], labels(2)).expect("valid");
        let surface = rendered(&chain);
        assert!(surface.wedges().is_empty());
        assert_eq!(surface.arrows().len(), 2);
    }

    // Known quirk: the partner of a one-way transition is still drawn.
    #[test]
    fn zero_reverse_arrow_is_drawn_unlabelled() {
        let rows = vec![
            vec![0.7, 0.3, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let chain = MarkovChain::new(rows, labels(3)).expect("valid");
        let surface = rendered(&chain);
        let style = chain.style();

        let arrows = surface.arrows();
        assert_eq!(arrows.len(), 2);
        assert!((arrows[1].width - style.arrow_width * 0.3).abs() < EPS);
        assert!(!surface.texts().iter().any(|t| t == "0"));
    }

    #[test]
    fn zero_arrows_can_be_skipped() {
        let rows = vec![
            vec![0.7, 0.3, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let style = ChainStyle {
            skip_zero_arrows: true,
            ..ChainStyle::default()
        };
        let chain = MarkovChain::builder(rows, labels(3))
            .with_style(style)
            .build()
            .expect("valid");
        let surface = rendered(&chain);

        let arrows = surface.arrows();
        assert_eq!(arrows.len(), 1);
        assert_eq!(arrows[0].start, chain.anchors().pair(0, 1).forward_start);
    }

    #[test]
    fn one_way_transition_from_higher_index_is_drawn() {
        let rows = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.4, 0.0, 0.6],
        ];
        let chain = MarkovChain::new(rows, labels(3)).expect("valid");
        let surface = rendered(&chain);

        assert_eq!(surface.arrows().len(), 2);
        assert!(surface.text_at("0.4").is_some());
    }

    #[test]
    fn mean_anchors_sit_beside_the_node() {
        let chain = MarkovChain::builder(vec![vec![0.8, 0.2], vec![0.1, 0.9]], labels(2))
            .with_initial_probabilities(vec![0.4, 0.6])
            .with_means(vec![vec![0.1, 0.4], vec![0.22, 0.33]])
            .build()
            .expect("valid");

        let anchors: Vec<Point> = chain
            .nodes()
            .iter()
            .filter_map(|n| match &n.annotation {
                NodeAnnotation::Full { mean_anchor, .. } => *mean_anchor,
                _ => None,
            })
            .collect();
        assert_eq!(anchors.len(), 2);
        assert!(anchors[0].distance(Point::new(-5.3, 0.0)) < EPS);
        assert!(anchors[1].distance(Point::new(5.3, 0.0)) < EPS);

        let surface = rendered(&chain);
        let at = surface.text_at("[0.1\n0.4]").expect("mean drawn");
        assert!(at.distance(anchors[0]) < EPS);
        assert!(surface.text_at("0.4").is_some());
    }

    #[test]
    fn nodes_are_drawn_over_edges() {
        let surface = rendered(&two_state());
        let last_arrow = surface
            .shapes
            .iter()
            .rposition(|s| matches!(s, crate::surface::recording::Shape::Arrow(_)))
            .expect("arrows drawn");
        let first_circle = surface
            .shapes
            .iter()
            .position(|s| matches!(s, crate::surface::recording::Shape::Circle { .. }))
            .expect("circles drawn");
        assert!(first_circle > last_arrow);
    }

    #[test]
    fn svg_document_has_every_node() {
        let chain = MarkovChain::builder(uniform(6), labels(6))
            .with_title("Six states")
            .build()
            .expect("valid");
        let mut measure = ApproxMeasure::default();
        let svg = chain.to_svg(&mut measure);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle ").count(), 6);
        assert!(svg.contains(">Six states</text>"));
        // 10in at 100dpi plus the title margin.
        assert!(svg.contains(r#"height="1048""#));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn leftmost_node_loops_up_on_even_polygons() {
        for n in [4, 6, 8] {
            let chain = MarkovChain::new(uniform(n), labels(n)).expect("valid");
            let surface = rendered(&chain);
            let left = surface
                .wedges()
                .into_iter()
                .find(|w| w.center.x < -5.0)
                .expect("loop on the leftmost node");
            assert_eq!((left.theta1, left.theta2), (-30.0, 180.0), "n = {n}");
        }
    }

    #[test]
    fn latex_labels_are_typeset_in_svg() {
        let chain = MarkovChain::new(vec![vec![0.8, 0.2], vec![0.1, 0.9]], ["$Z^1$", "$Z^2$"])
            .expect("valid");
        let mut measure = ApproxMeasure::default();
        let svg = chain.to_svg(&mut measure);

        assert!(!svg.contains("$Z^1$"), "{svg}");
        assert!(!svg.contains("$Z^2$"));
        assert_eq!(svg.matches(">Z</text>").count(), 2);
        assert!(svg.contains(">1</text>"));
        assert!(svg.contains(">2</text>"));
        // Scripts are drawn at 0.7 of the 22px label size.
        assert!(svg.contains(r#"font-size="15.40""#), "{svg}");
    }
}
