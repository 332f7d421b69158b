//! Command-line surface of the cookie cutter sweeper.
//!
//! The argument shape matches what a drawing application passes to an
//! output extension: repeated `--id` options for the current selection, an
//! output file and the drawing path as the last positional argument.

pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;

use sweeper_core::models::DEFAULT_OUTPUT_FILE;
use sweeper_core::{
    HostContext, InvocationRequest, Pipeline, ProcessRunner, SweeperConfig, SweeperError,
};

/// Cookie Cutter Sweeper: turn a drawing into a printable cookie cutter mesh
#[derive(Debug, Parser)]
#[command(name = "cookie-sweeper", version, about, long_about = None)]
pub struct Cli {
    /// Id attribute of a selected object (ignored)
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<String>,

    /// STL output file
    #[arg(short = 'o', long = "outputfile", value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
    pub outputfile: PathBuf,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Drawing file; when several are given the last one is used
    #[arg(value_name = "DRAWING", required = true)]
    pub drawings: Vec<PathBuf>,
}

impl Cli {
    /// The drawing to convert.
    pub fn input(&self) -> &Path {
        self.drawings
            .last()
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Build the immutable request for this invocation.
    pub fn request(&self) -> InvocationRequest {
        InvocationRequest::new(self.input())
            .with_output(&self.outputfile)
            .with_selected_ids(self.ids.clone())
    }

    /// Load configuration from `--config` and the environment.
    pub fn load_config(&self) -> Result<SweeperConfig, SweeperError> {
        SweeperConfig::load(self.config.as_deref())
    }

    /// Run the pipeline, returning the written mesh path.
    pub async fn execute(&self, config: &SweeperConfig) -> Result<PathBuf, SweeperError> {
        let host = HostContext::capture(config)?;
        debug!(
            platform = ?host.platform,
            install_dir = %host.install_dir.display(),
            temp_root = %host.temp_root.display(),
            "Captured host context"
        );

        let mut pipeline = Pipeline::new(host, ProcessRunner::new());
        pipeline.run(&self.request()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cookie-sweeper", "drawing.svg"]).expect("parse");
        assert_eq!(cli.outputfile, PathBuf::from("~/cookie.stl"));
        assert!(cli.ids.is_empty());
        assert!(cli.config.is_none());
        assert_eq!(cli.input(), Path::new("drawing.svg"));
    }

    #[test]
    fn test_repeated_ids_accepted() {
        let cli = Cli::try_parse_from([
            "cookie-sweeper",
            "--id=path12",
            "--id",
            "rect7",
            "-o",
            "~/out.stl",
            "drawing.svg",
        ])
        .expect("parse");

        assert_eq!(cli.ids, vec!["path12", "rect7"]);
        let request = cli.request();
        assert_eq!(request.selected_ids, vec!["path12", "rect7"]);
        assert_eq!(request.output, PathBuf::from("~/out.stl"));
        assert_eq!(request.input, PathBuf::from("drawing.svg"));
    }

    #[test]
    fn test_ids_do_not_change_request_paths() {
        let plain = Cli::try_parse_from(["cookie-sweeper", "-o", "/tmp/a.stl", "d.svg"])
            .expect("parse")
            .request();
        let with_ids = Cli::try_parse_from([
            "cookie-sweeper",
            "--id",
            "g1",
            "--id",
            "g2",
            "-o",
            "/tmp/a.stl",
            "d.svg",
        ])
        .expect("parse")
        .request();

        assert_eq!(plain.input, with_ids.input);
        assert_eq!(plain.output, with_ids.output);
    }

    #[test]
    fn test_long_output_option() {
        let cli = Cli::try_parse_from(["cookie-sweeper", "--outputfile", "/tmp/c.stl", "d.svg"])
            .expect("parse");
        assert_eq!(cli.outputfile, PathBuf::from("/tmp/c.stl"));
    }

    #[test]
    fn test_last_positional_wins() {
        let cli = Cli::try_parse_from(["cookie-sweeper", "first.svg", "second.svg"])
            .expect("parse");
        assert_eq!(cli.input(), Path::new("second.svg"));
    }

    #[test]
    fn test_drawing_required() {
        assert!(Cli::try_parse_from(["cookie-sweeper", "-o", "/tmp/c.stl"]).is_err());
    }
}
