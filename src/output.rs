//! Writes a rendered SVG document to disk as SVG, PNG or PDF.

use std::path::Path;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::ExportError;

/// Directory searched for extra fonts, relative to the working directory.
const LOCAL_FONTS_DIR: &str = "fonts";

/// File format, picked from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::MissingExtension(path.to_path_buf()))?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ExportError::UnsupportedFormat(ext)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Raster scale multiplier for PNG output.
    pub png_scale: f32,
    /// Also write the SVG source next to a PNG or PDF.
    pub svg_sibling: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            png_scale: 1.0,
            svg_sibling: true,
        }
    }
}

/// Convert `svg` to the format named by `path` and write it there.
///
/// For PNG and PDF the SVG itself is also saved under the same stem, unless
/// `options.svg_sibling` is off.
pub fn export(svg: &str, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let format = OutputFormat::from_path(path)?;

    let bytes = match format {
        OutputFormat::Svg => svg.as_bytes().to_vec(),
        OutputFormat::Png => svg_to_png(svg, options.png_scale)?,
        OutputFormat::Pdf => svg_to_pdf(svg)?,
    };
    write_file(path, &bytes)?;
    tracing::info!(path = %path.display(), ?format, "diagram saved");

    if format != OutputFormat::Svg && options.svg_sibling {
        let sibling = path.with_extension("svg");
        write_file(&sibling, svg.as_bytes())?;
        tracing::info!(path = %sibling.display(), "svg source saved");
    }

    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, ExportError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::InvalidScale(scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new(LOCAL_FONTS_DIR);
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        let families = fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(f, _)| f.as_str()));
        if let Some(family) = pick_sans_family(families) {
            fontdb.set_sans_serif_family(family);
        }
        tracing::debug!(faces = fontdb.len(), "fonts loaded for png");
    }

    let tree =
        usvg::Tree::from_str(svg, &opts).map_err(|e| ExportError::Svg(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Png(e.to_string()))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, ExportError> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new(LOCAL_FONTS_DIR);
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let families = fontdb
        .faces()
        .flat_map(|face| face.families.iter().map(|(f, _)| f.as_str()));
    if let Some(family) = pick_sans_family(families) {
        fontdb.set_sans_serif_family(family);
    }
    tracing::debug!(faces = fontdb.len(), "fonts loaded for pdf");

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = std::sync::Arc::new(fontdb);

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    // Text goes out as paths so viewers without the font still show it.
    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;

    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

/// The family to stand in for the generic `sans-serif`: the first one whose
/// name says "sans", else the first one installed.
fn pick_sans_family<'a>(families: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut first: Option<&str> = None;
    for family in families {
        if family.to_ascii_lowercase().contains("sans") {
            return Some(family.to_string());
        }
        first.get_or_insert(family);
    }
    first.map(str::to_string)
}
