use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const VERBOSE_DIRECTIVE: &str = "debug";

/// Install the verbose stderr subscriber. Without `-v` nothing is installed
/// and diagnostics are discarded. The level is fixed at DEBUG; the process
/// environment never changes it. The returned guard flushes on drop.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    if !verbose {
        return None;
    }
    match install() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("lessontron: verbose logging unavailable: {err}");
            None
        }
    }
}

fn install() -> Result<WorkerGuard> {
    let filter = EnvFilter::new(VERBOSE_DIRECTIVE);
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!(e))?;
    Ok(guard)
}
