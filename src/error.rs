//! Error types for chain construction and diagram export.

use std::path::PathBuf;

/// Smallest chain the layout can draw.
pub const MIN_STATES: usize = 2;
/// Largest chain the layout can draw.
pub const MAX_STATES: usize = 9;

/// Returned when a chain cannot be laid out. No partial chain survives one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// Fewer than [`MIN_STATES`] rows in the transition matrix.
    #[error("there should be at least {MIN_STATES} states, got {n}")]
    TooFewStates {
        /// Number of states provided.
        n: usize,
    },

    /// More than [`MAX_STATES`] rows in the transition matrix.
    #[error("only up to {MAX_STATES} states are supported, got {n}")]
    TooManyStates {
        /// Number of states provided.
        n: usize,
    },

    /// Some row has a different length than the number of rows.
    #[error("transition matrix should be square: row {row} has {cols} columns, expected {rows}")]
    NonSquare {
        /// Number of rows.
        rows: usize,
        /// Index of the first offending row.
        row: usize,
        /// Length of that row.
        cols: usize,
    },

    /// Label count differs from the state count.
    #[error("there should be as many labels as states: got {labels} labels for {states} states")]
    LabelCountMismatch {
        /// Number of labels provided.
        labels: usize,
        /// Number of states in the matrix.
        states: usize,
    },

    /// Initial probability count differs from the state count.
    #[error("expected {states} initial probabilities, got {got}")]
    InitialCountMismatch {
        /// Number of values provided.
        got: usize,
        /// Number of states in the matrix.
        states: usize,
    },

    /// Mean vector count differs from the state count.
    #[error("expected {states} mean vectors, got {got}")]
    MeanCountMismatch {
        /// Number of vectors provided.
        got: usize,
        /// Number of states in the matrix.
        states: usize,
    },
}

/// Returned when a rendered diagram cannot be converted or written.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("output file has no extension: {0}")]
    MissingExtension(PathBuf),

    #[error("unsupported output format: .{0} (use .svg, .png or .pdf)")]
    UnsupportedFormat(String),

    #[error("invalid png scale: {0}")]
    InvalidScale(f32),

    #[error("failed to parse SVG: {0}")]
    Svg(String),

    #[error("failed to create a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Png(String),

    #[error("failed to convert SVG to PDF: {0}")]
    Pdf(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returned when a chain description or style file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: {0} (use .toml, .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    /// Style files are TOML or YAML only.
    #[error("unsupported style format: {0} (use .toml, .yaml or .yml)")]
    UnsupportedStyleFormat(String),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
