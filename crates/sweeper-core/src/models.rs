//! Pipeline inputs captured once at startup.

use std::path::{Path, PathBuf};

use crate::config::SweeperConfig;
use crate::error::SweeperError;
use crate::paths;
use crate::platform::Platform;

/// Default output path when none is given on the command line.
pub const DEFAULT_OUTPUT_FILE: &str = "~/cookie.stl";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Drawing to convert.
    pub input: PathBuf,
    /// Requested mesh path, possibly starting with `~`.
    pub output: PathBuf,
    /// Ids of objects selected in the drawing application. Unused.
    pub selected_ids: Vec<String>,
}

impl InvocationRequest {
    /// Create a request with the default output path.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            selected_ids: Vec::new(),
        }
    }

    /// Override the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Record selected object ids.
    pub fn with_selected_ids(mut self, ids: Vec<String>) -> Self {
        self.selected_ids = ids;
        self
    }

    /// Output path with a leading `~` expanded against `host`.
    pub fn resolved_output(&self, host: &HostContext) -> PathBuf {
        paths::expand_tilde(&self.output, host.home_dir.as_deref())
    }
}

/// Process-wide facts the pipeline depends on, read once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    /// Running platform.
    pub platform: Platform,
    /// Home directory for `~` expansion.
    pub home_dir: Option<PathBuf>,
    /// Directory holding the platform binary directories and the profile image.
    pub install_dir: PathBuf,
    /// Parent of per-invocation workspaces.
    pub temp_root: PathBuf,
    /// Program used for the raster stage.
    pub exporter_command: PathBuf,
}

impl HostContext {
    /// Capture the host context from the environment and `config`.
    pub fn capture(config: &SweeperConfig) -> Result<Self, SweeperError> {
        let install_dir = match &config.install_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        Ok(Self {
            platform: Platform::current(),
            home_dir: paths::home_dir(),
            install_dir,
            temp_root: config
                .temp_root
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            exporter_command: PathBuf::from(&config.exporter_command),
        })
    }

    /// Path of a file shipped in the installation directory.
    pub fn install_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.install_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(home: Option<&str>) -> HostContext {
        HostContext {
            platform: Platform::new("linux", "x86_64"),
            home_dir: home.map(PathBuf::from),
            install_dir: PathBuf::from("/opt/sweeper"),
            temp_root: PathBuf::from("/tmp"),
            exporter_command: PathBuf::from("inkscape"),
        }
    }

    #[test]
    fn test_default_request() {
        let request = InvocationRequest::new("drawing.svg");
        assert_eq!(request.output, PathBuf::from("~/cookie.stl"));
        assert!(request.selected_ids.is_empty());
        assert_eq!(
            request.resolved_output(&host(Some("/home/u"))),
            PathBuf::from("/home/u/cookie.stl")
        );
    }

    #[test]
    fn test_resolved_output_without_home() {
        let request = InvocationRequest::new("drawing.svg").with_output("~/out.stl");
        assert_eq!(
            request.resolved_output(&host(None)),
            PathBuf::from("~/out.stl")
        );
    }

    #[test]
    fn test_capture_uses_config_overrides() {
        let config = SweeperConfig {
            exporter_command: "/usr/bin/inkscape".to_string(),
            install_dir: Some(PathBuf::from("/opt/sweeper")),
            temp_root: Some(PathBuf::from("/var/tmp")),
            ..Default::default()
        };

        let host = HostContext::capture(&config).expect("capture");
        assert_eq!(host.platform, Platform::current());
        assert_eq!(host.install_dir, PathBuf::from("/opt/sweeper"));
        assert_eq!(host.temp_root, PathBuf::from("/var/tmp"));
        assert_eq!(host.exporter_command, PathBuf::from("/usr/bin/inkscape"));
        assert_eq!(
            host.install_file("section.png"),
            PathBuf::from("/opt/sweeper/section.png")
        );
    }

    #[test]
    fn test_capture_defaults() {
        let host = HostContext::capture(&SweeperConfig::default()).expect("capture");
        assert_eq!(host.install_dir, std::env::current_dir().expect("cwd"));
        assert_eq!(host.temp_root, std::env::temp_dir());
    }
}
