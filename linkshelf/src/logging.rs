use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `LINKSHELF_LOG=debug`.
pub const LOG_ENV: &str = "LINKSHELF_LOG";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the tracing subscriber.
///
/// With a log file everything at `info` and above goes there. Without one,
/// CLI commands log warnings to stderr and the TUI logs nothing, since the
/// terminal belongs to the UI.
pub fn init(log_file: Option<&Path>, interactive: bool) -> io::Result<()> {
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter("info"))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .try_init();
        tracing::info!("linkshelf {} starting", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter("warn"))
            .with_writer(io::stderr)
            .with_target(false)
            .try_init();
    }

    Ok(())
}
