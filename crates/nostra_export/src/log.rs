use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;

/// Map `-q` / `-v` counts onto a level; warnings and errors only by default.
pub fn derive_level_filter(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global stderr subscriber. Calling it twice is a no-op.
pub fn init_logging(level: LevelFilter) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
