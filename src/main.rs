use std::process::ExitCode;

use clap::Parser;
use icd_version_sync::cli::{self, Cli};
use icd_version_sync::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.log_format, &cli.log_target()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
