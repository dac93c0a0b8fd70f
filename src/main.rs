use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod cli;

/// Diagnostics go to stderr; `TRIP_SPOTLIGHT_LOG=debug` turns them up.
fn init_logging() {
    let filter = EnvFilter::try_from_env("TRIP_SPOTLIGHT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    cli::run()
}
