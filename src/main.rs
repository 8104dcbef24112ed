mod logging;

use clap::Parser;
use std::path::PathBuf;

use chaindraw::{ChainDocument, ChainStyle, ExportOptions};

/// A pure Rust Markov chain diagram renderer
#[derive(Parser, Debug)]
#[command(name = "chaindraw")]
#[command(about = "Render Markov chain diagrams to SVG, PNG or PDF images", long_about = None)]
struct Args {
    /// Chain description (.toml, .yaml, .yml or .json; use "-" for JSON on stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Style file (TOML or YAML)
    #[arg(short, long, value_name = "STYLE")]
    style: Option<PathBuf>,

    /// Title drawn above the diagram, replacing any title in the input
    #[arg(short, long)]
    title: Option<String>,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Leave out zero-probability arrows instead of drawing them unlabelled
    #[arg(long)]
    skip_zero_arrows: bool,

    /// Do not write an .svg copy next to PNG or PDF output
    #[arg(long)]
    no_svg_sibling: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut style = match &args.style {
        Some(path) => ChainStyle::from_path(path).map_err(|e| e.to_string())?,
        None => ChainStyle::default(),
    };
    if args.skip_zero_arrows {
        style.skip_zero_arrows = true;
    }

    let document = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        ChainDocument::from_json(&buffer)
    } else {
        ChainDocument::from_path(&args.input)
    }
    .map_err(|e| e.to_string())?;

    let chain = document
        .into_chain(style, args.title)
        .map_err(|e| e.to_string())?;
    tracing::debug!(states = chain.n_states(), "chain laid out");

    let options = ExportOptions {
        png_scale: args.png_scale,
        svg_sibling: !args.no_svg_sibling,
    };
    chain
        .draw_with(&args.output, &options)
        .map_err(|e| e.to_string())?;

    Ok(())
}
