use tracing_subscriber::EnvFilter;

/// Install the global subscriber for the CLI.
///
/// `-v` gives info, `-vv` debug and `-vvv` or more trace; without a flag only
/// warnings show. `RUST_LOG` takes precedence when set.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chaindraw={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
