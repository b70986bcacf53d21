//! Logging setup. Built once at process entry and handed a concrete log
//! location instead of reading global state, so tests and alternative
//! binaries can skip it entirely. Events go to stderr and to an append-only
//! file in the workspace; no rotation.

use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber with a stderr layer and a plain-text file
/// layer. Must be called at most once.
pub fn init(log_dir: &Path, log_file: &str) {
    let file_appender = tracing_appender::rolling::never(log_dir, log_file);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .init();
}
