//! LaTeX node labels such as `$Z^1$`, laid out as SVG text fragments.
//!
//! The LaTeX goes through `latex2mathml`, the MathML is read back with
//! `quick-xml` into a small box tree, and each box is placed relative to a
//! baseline. Only what state labels need is supported: identifiers, numbers,
//! operators, scripts, fractions, square roots and spacing. Anything else is
//! laid out as a plain row of its children.

use latex2mathml::{DisplayStyle, latex_to_mathml};
use quick_xml::events::Event as XmlEvent;
use quick_xml::events::attributes::Attributes;
use quick_xml::reader::Reader as XmlReader;

use crate::fonts::TextMeasure;
use crate::xml::escape_xml;

/// Script size relative to its base.
const SCRIPT_SCALE: f32 = 0.7;
/// Fraction parts relative to the surrounding size.
const FRACTION_SCALE: f32 = 0.85;
/// Font used for math glyphs.
const MATH_FONT_FAMILY: &str = "serif";

#[derive(Debug, thiserror::Error)]
pub enum MathError {
    #[error("invalid LaTeX: {0}")]
    Latex(String),

    #[error("invalid MathML: {0}")]
    MathMl(String),
}

/// The LaTeX inside a `$…$` label, or `None` for a plain label.
pub fn math_label(label: &str) -> Option<&str> {
    let inner = label.strip_prefix('$')?.strip_suffix('$')?;
    if inner.trim().is_empty() || inner.contains('$') {
        return None;
    }
    Some(inner)
}

/// A laid-out formula. `ascent` and `descent` are measured from the baseline
/// it was placed on.
#[derive(Debug, Clone, PartialEq)]
pub struct MathLayout {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub svg_fragment: String,
}

impl MathLayout {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Lay out inline `latex` with its left edge at `x` and its baseline at
/// `baseline_y`, both in pixels.
pub fn render_math_at<M: TextMeasure + ?Sized>(
    latex: &str,
    font_size: f32,
    color: &str,
    measure: &mut M,
    x: f32,
    baseline_y: f32,
) -> Result<MathLayout, MathError> {
    let mathml = latex_to_mathml(latex, DisplayStyle::Inline)
        .map_err(|e| MathError::Latex(format!("{e:?}")))?;
    let root = parse_mathml(&mathml)?;

    let mut painter = Painter {
        measure,
        color: escape_xml(color).into_owned(),
    };
    let mbox = painter.layout(&root, font_size, x, baseline_y);

    Ok(MathLayout {
        width: mbox.width,
        ascent: mbox.ascent,
        descent: mbox.descent,
        svg_fragment: mbox.svg,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum MathNode {
    Row(Vec<MathNode>),
    Ident(String),
    Number(String),
    Operator(String),
    Text(String),
    Sup {
        base: Box<MathNode>,
        sup: Box<MathNode>,
    },
    Sub {
        base: Box<MathNode>,
        sub: Box<MathNode>,
    },
    SubSup {
        base: Box<MathNode>,
        sub: Box<MathNode>,
        sup: Box<MathNode>,
    },
    Frac {
        num: Box<MathNode>,
        den: Box<MathNode>,
        rule: bool,
    },
    Sqrt(Box<MathNode>),
    Space(f32),
}

fn attributes(attrs: Attributes<'_>) -> Vec<(String, String)> {
    attrs
        .filter_map(Result::ok)
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&a.value).into_owned(),
            )
        })
        .collect()
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn parse_mathml(mathml: &str) -> Result<MathNode, MathError> {
    let mut reader = XmlReader::from_str(mathml);
    reader.config_mut().trim_text(true);

    // Open elements: tag, children so far, attributes.
    let mut stack: Vec<(String, Vec<MathNode>, Vec<(String, String)>)> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(XmlEvent::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push((name, Vec::new(), attributes(e.attributes())));
            }
            Ok(XmlEvent::Text(ref e)) => {
                let text = e
                    .decode()
                    .map_err(|err| MathError::MathMl(err.to_string()))?;
                if let Some((_, children, _)) = stack.last_mut() {
                    if !text.is_empty() {
                        children.push(MathNode::Text(text.into_owned()));
                    }
                }
            }
            Ok(XmlEvent::End(_)) => {
                if let Some((tag, children, attrs)) = stack.pop() {
                    let node = build_node(&tag, children, &attrs);
                    match stack.last_mut() {
                        Some((_, parent, _)) => parent.push(node),
                        None => return Ok(node),
                    }
                }
            }
            Ok(XmlEvent::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "mspace" {
                    let attrs = attributes(e.attributes());
                    let em = attr(&attrs, "width")
                        .and_then(|w| w.strip_suffix("em"))
                        .and_then(|w| w.parse().ok())
                        .unwrap_or(0.0);
                    if let Some((_, children, _)) = stack.last_mut() {
                        children.push(MathNode::Space(em));
                    }
                }
            }
            Ok(XmlEvent::Eof) => break,
            Err(e) => return Err(MathError::MathMl(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(MathNode::Row(Vec::new()))
}

fn build_node(tag: &str, children: Vec<MathNode>, attrs: &[(String, String)]) -> MathNode {
    match tag {
        "mi" => MathNode::Ident(extract_text(&children)),
        "mn" => MathNode::Number(extract_text(&children)),
        "mo" => MathNode::Operator(extract_text(&children)),
        "mtext" => MathNode::Text(extract_text(&children)),
        "msqrt" => MathNode::Sqrt(Box::new(collapse(children))),
        _ => match (tag, <[MathNode; 2]>::try_from(children)) {
            ("msup", Ok([base, sup])) => MathNode::Sup {
                base: Box::new(base),
                sup: Box::new(sup),
            },
            ("msub", Ok([base, sub])) => MathNode::Sub {
                base: Box::new(base),
                sub: Box::new(sub),
            },
            ("mfrac", Ok([num, den])) => MathNode::Frac {
                num: Box::new(num),
                den: Box::new(den),
                rule: attr(attrs, "linethickness") != Some("0"),
            },
            (_, Ok(pair)) => MathNode::Row(pair.into()),
            ("msubsup", Err(rest)) => match <[MathNode; 3]>::try_from(rest) {
                Ok([base, sub, sup]) => MathNode::SubSup {
                    base: Box::new(base),
                    sub: Box::new(sub),
                    sup: Box::new(sup),
                },
                Err(rest) => collapse(rest),
            },
            (_, Err(rest)) => collapse(rest),
        },
    }
}

/// A single child stands for itself; anything else becomes a row.
fn collapse(mut children: Vec<MathNode>) -> MathNode {
    if children.len() == 1 {
        if let Some(only) = children.pop() {
            return only;
        }
    }
    MathNode::Row(children)
}

fn extract_text(children: &[MathNode]) -> String {
    children
        .iter()
        .filter_map(|child| match child {
            MathNode::Text(t)
            | MathNode::Ident(t)
            | MathNode::Number(t)
            | MathNode::Operator(t) => Some(t.as_str()),
            _ => None,
        })
        .collect()
}

struct MathBox {
    width: f32,
    ascent: f32,
    descent: f32,
    svg: String,
}

struct Painter<'m, M: TextMeasure + ?Sized> {
    measure: &'m mut M,
    color: String,
}

impl<M: TextMeasure + ?Sized> Painter<'_, M> {
    fn token(&mut self, text: &str, font_size: f32, italic: bool, x: f32, y: f32) -> MathBox {
        let (width, _) = self.measure.measure_text(text, font_size, false);
        let style = if italic { r#" font-style="italic""# } else { "" };
        MathBox {
            width,
            ascent: font_size * 0.75,
            descent: font_size * 0.25,
            svg: format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" fill="{}"{}>{}</text>"#,
                x,
                y,
                MATH_FONT_FAMILY,
                font_size,
                self.color,
                style,
                escape_xml(text)
            ),
        }
    }

    fn layout(&mut self, node: &MathNode, font_size: f32, x: f32, baseline_y: f32) -> MathBox {
        match node {
            MathNode::Ident(text) => {
                let italic = text.chars().count() == 1
                    && text.chars().next().is_some_and(char::is_alphabetic);
                self.token(text, font_size, italic, x, baseline_y)
            }
            MathNode::Number(text) | MathNode::Text(text) => {
                self.token(text, font_size, false, x, baseline_y)
            }
            MathNode::Operator(text) => {
                let spacing = font_size * 0.15;
                let mut op = self.token(text, font_size, false, x + spacing, baseline_y);
                op.width += spacing * 2.0;
                op
            }
            MathNode::Space(em) => MathBox {
                width: font_size * em,
                ascent: 0.0,
                descent: 0.0,
                svg: String::new(),
            },
            MathNode::Row(children) => {
                let mut row = MathBox {
                    width: 0.0,
                    ascent: font_size * 0.75,
                    descent: font_size * 0.25,
                    svg: String::new(),
                };
                for child in children {
                    let child = self.layout(child, font_size, x + row.width, baseline_y);
                    row.width += child.width;
                    row.ascent = row.ascent.max(child.ascent);
                    row.descent = row.descent.max(child.descent);
                    row.svg.push_str(&child.svg);
                }
                row
            }
            MathNode::Sup { base, sup } => {
                self.scripts(base, None, Some(sup), font_size, x, baseline_y)
            }
            MathNode::Sub { base, sub } => {
                self.scripts(base, Some(sub), None, font_size, x, baseline_y)
            }
            MathNode::SubSup { base, sub, sup } => {
                self.scripts(base, Some(sub), Some(sup), font_size, x, baseline_y)
            }
            MathNode::Frac { num, den, rule } => {
                let size = font_size * FRACTION_SCALE;
                // Measure first, then place each part centred over the rule.
                let num_w = self.layout(num, size, 0.0, 0.0).width;
                let den_w = self.layout(den, size, 0.0, 0.0).width;

                let padding = font_size * 0.2;
                let width = num_w.max(den_w) + padding * 2.0;
                let rule_y = baseline_y - font_size * 0.3;
                let gap = font_size * 0.15;

                let num_baseline = rule_y - gap - size * 0.25;
                let den_baseline = rule_y + gap + size * 0.75;
                let num_box = self.layout(num, size, x + (width - num_w) / 2.0, num_baseline);
                let den_box = self.layout(den, size, x + (width - den_w) / 2.0, den_baseline);

                let rule_svg = if *rule {
                    format!(
                        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1" />"#,
                        x,
                        rule_y,
                        x + width,
                        rule_y,
                        self.color
                    )
                } else {
                    String::new()
                };

                MathBox {
                    width,
                    ascent: (baseline_y - num_baseline + num_box.ascent).max(font_size * 0.75),
                    descent: (den_baseline - baseline_y + den_box.descent).max(font_size * 0.25),
                    svg: format!("{}{}{}", num_box.svg, rule_svg, den_box.svg),
                }
            }
            MathNode::Sqrt(radicand) => {
                let radical_width = font_size * 0.6;
                let padding = font_size * 0.1;
                let inner = self.layout(radicand, font_size, x + radical_width, baseline_y);
                let top_y = baseline_y - inner.ascent - font_size * 0.15;

                let radical_svg = format!(
                    r#"<path d="M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2}" stroke="{}" stroke-width="1.2" fill="none" />"#,
                    x,
                    baseline_y - font_size * 0.15,
                    x + radical_width * 0.35,
                    baseline_y,
                    x + radical_width * 0.6,
                    top_y,
                    x + radical_width + inner.width + padding,
                    top_y,
                    self.color
                );

                MathBox {
                    width: radical_width + inner.width + padding,
                    ascent: baseline_y - top_y,
                    descent: inner.descent,
                    svg: format!("{}{}", radical_svg, inner.svg),
                }
            }
        }
    }

    /// Base with an optional subscript and superscript stacked to its right.
    fn scripts(
        &mut self,
        base: &MathNode,
        sub: Option<&MathNode>,
        sup: Option<&MathNode>,
        font_size: f32,
        x: f32,
        baseline_y: f32,
    ) -> MathBox {
        let base_box = self.layout(base, font_size, x, baseline_y);
        let size = font_size * SCRIPT_SCALE;
        let script_x = x + base_box.width;

        let mut svg = base_box.svg;
        let mut script_width: f32 = 0.0;
        let mut ascent = base_box.ascent;
        let mut descent = base_box.descent;

        if let Some(sup) = sup {
            let raise = base_box.ascent * 0.55;
            let sup_box = self.layout(sup, size, script_x, baseline_y - raise);
            script_width = script_width.max(sup_box.width);
            ascent = ascent.max(sup_box.ascent + raise);
            svg.push_str(&sup_box.svg);
        }
        if let Some(sub) = sub {
            let drop = base_box.descent + size * 0.35;
            let sub_box = self.layout(sub, size, script_x, baseline_y + drop);
            script_width = script_width.max(sub_box.width);
            descent = descent.max(sub_box.descent + drop);
            svg.push_str(&sub_box.svg);
        }

        MathBox {
            width: base_box.width + script_width,
            ascent,
            descent,
            svg,
        }
    }
}
