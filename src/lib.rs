//! Draws Markov chain transition diagrams, with optional hidden Markov model
//! annotations, as SVG, PNG or PDF.
//!
//! ```no_run
//! use chaindraw::MarkovChain;
//!
//! let chain = MarkovChain::new(vec![vec![0.8, 0.2], vec![0.1, 0.9]], ["1", "2"])?;
//! chain.draw(std::path::Path::new("chain.png"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chain;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod input;
pub mod math;
pub mod node;
pub mod output;
pub mod style;
pub mod surface;
pub mod svg;
mod xml;

pub use chain::{AnnotationMode, Canvas, ChainBuilder, MarkovChain, TransitionMatrix};
pub use error::{ChainError, ExportError, LoadError};
pub use input::ChainDocument;
pub use output::{ExportOptions, OutputFormat};
pub use style::ChainStyle;
pub use surface::Surface;
