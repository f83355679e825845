use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`). When
/// `LOBBY_LOG_FILE` is set, a second DEBUG-level layer appends to that file.
pub fn init_tracing() -> Result<()> {
    let file_logging = std::env::var("LOBBY_LOG_FILE").ok();

    let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    if let Some(log_path) = file_logging {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("opening log file {}", log_path))?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

        registry.with(file_layer).try_init()?;
    } else {
        registry.try_init()?;
    }
    Ok(())
}
