//! Cookie Cutter Sweeper: converts a drawing into a 3-D printable cookie
//! cutter by running a raster exporter and a sweep binary.
//!
//! Entry point that loads configuration, sets up logging on stderr and maps
//! the pipeline outcome to the process exit status.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use sweeper_cli::Cli;
use sweeper_cli::output::report_failure;
use sweeper_core::config::{LogFormat, LoggingConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            report_failure(&e);
            std::process::exit(e.exit_code());
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        tracing::debug!(exit_code = e.exit_code(), "Exiting with failure");
        report_failure(&e);
        std::process::exit(e.exit_code());
    }
}

/// Initialize tracing/logging on stderr
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .init();
        }
    }
}
