use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};

/// Smallest font size [`fit_font_size`] will shrink to.
pub const MIN_FONT_SIZE: f32 = 6.0;

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
    is_bold: bool,
}

pub trait TextMeasure {
    /// Width and height of `text` in pixels.
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> (f32, f32);
}

/// Shapes text with the system fonts.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    cache: HashMap<MeasureKey, (f32, f32)>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            cache: HashMap::new(),
        }
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> (f32, f32) {
        let key = MeasureKey {
            text: text.to_string(),
            font_size_bits: font_size.to_bits(),
            is_bold,
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let line_height = font_size * 1.2;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(if is_bold { Weight::BOLD } else { Weight::NORMAL });

        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);

        let mut total_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        for run in buffer.layout_runs() {
            total_width = total_width.max(run.line_w);
            total_height += run.line_height;
        }

        let measured = (total_width, total_height);
        self.cache.insert(key, measured);
        measured
    }
}

/// Estimates text size from the character count, without loading fonts.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    /// Average glyph advance as a fraction of the font size.
    pub advance: f32,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> (f32, f32) {
        let advance = if is_bold { self.advance * 1.1 } else { self.advance };
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        (
            widest as f32 * font_size * advance,
            lines as f32 * font_size * 1.2,
        )
    }
}

/// Largest font size up to `font_size` at which `text` is no wider than
/// `max_width` pixels, but never below [`MIN_FONT_SIZE`].
pub fn fit_font_size<M: TextMeasure + ?Sized>(
    measure: &mut M,
    text: &str,
    font_size: f32,
    max_width: f32,
    is_bold: bool,
) -> f32 {
    let (width, _) = measure.measure_text(text, font_size, is_bold);
    if width <= max_width || width <= 0.0 {
        return font_size;
    }
    (font_size * max_width / width).max(MIN_FONT_SIZE)
}
