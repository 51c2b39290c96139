//! lessontron entrypoint.
use chrono::Local;
use core_terminal::{PlatformProbe, TerminalCapabilities};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

mod app;
mod cli;
mod logging;

use app::Outcome;
use cli::Args;

fn main() -> ExitCode {
    let args = Args::from_env();
    let _log_guard = logging::init(args.verbose);
    let config = core_config::load_from(args.config.clone());
    let capabilities = TerminalCapabilities::detect();
    let today = Local::now().date_naive();

    match app::run(&args, &config, &PlatformProbe, capabilities, today) {
        Ok(Outcome::Rendered(text)) => emit(&text),
        Ok(Outcome::NotFound { date }) => {
            debug!(target: "lessontron", %date, "section_not_found");
            emit(&format!("No lessons found for {date}\n"))
        }
        Err(err) => {
            debug!(target: "lessontron", exit_code = err.exit_code(), "run_failed");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Write the finished output in one go. A closed pipe (`| head`) is not an error.
fn emit(text: &str) -> ExitCode {
    let mut out = io::stdout().lock();
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error writing output: {e}");
            ExitCode::FAILURE
        }
    }
}
