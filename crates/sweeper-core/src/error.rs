//! Unified error type for the sweeper pipeline.
//!
//! Every failure the bridge can hit (platform lookup, workspace, process
//! execution, configuration) is consolidated into `SweeperError`, which also
//! carries the exit-status policy of the command-line tool.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Upstream project users are pointed at when no prebuilt binary exists.
pub const UPSTREAM_PROJECT_URL: &str = "https://github.com/cwalther/cookie-cutter-sweeper";

/// Exit status used for every failure that did not come from a subordinate tool.
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// The two external-process stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Drawing-to-raster export.
    Raster,
    /// Raster-to-mesh sweep.
    Sweep,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => write!(f, "raster"),
            Self::Sweep => write!(f, "sweep"),
        }
    }
}

/// Unified error type for all sweeper operations.
#[derive(Debug, Error)]
pub enum SweeperError {
    /// No prebuilt sweep binary exists for this OS/architecture pair.
    #[error(
        "Your platform \"{os} {arch}\" is not currently supported by the cookie cutter sweeper. \
         Try building the sweep tool from source ({}) and adjusting the installation in {}.",
        UPSTREAM_PROJECT_URL,
        install_dir.display()
    )]
    UnsupportedPlatform {
        /// Operating system identifier.
        os: String,
        /// CPU architecture identifier.
        arch: String,
        /// Installation directory holding the platform binary directories.
        install_dir: PathBuf,
    },

    /// A subordinate tool exited with a non-zero status.
    #[error("Calling {tool} failed with exit code {code}")]
    ToolFailed {
        /// Stage the tool belongs to.
        stage: Stage,
        /// Short name of the tool, used in the diagnostic label.
        tool: String,
        /// Exit status to propagate.
        code: i32,
        /// Captured diagnostic output.
        output: Vec<u8>,
    },

    /// A subordinate tool could not be started at all.
    #[error("Failed to launch {stage} tool {}: {source}", program.display())]
    ToolLaunch {
        /// Stage the tool belongs to.
        stage: Stage,
        /// Program that was attempted.
        program: PathBuf,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A tool exited successfully but its artifact is missing.
    #[error("The {stage} stage reported success but did not create {}", path.display())]
    ArtifactMissing {
        /// Stage that should have produced the artifact.
        stage: Stage,
        /// Expected artifact path.
        path: PathBuf,
    },

    /// The temporary workspace could not be created.
    #[error("Failed to create workspace {}: {source}", path.display())]
    Workspace {
        /// Directory that was attempted.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tokio task join error.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl SweeperError {
    /// Exit status the process should terminate with for this error.
    ///
    /// Tool failures propagate the subordinate's own status so its failure
    /// classification survives; everything else uses [`GENERIC_FAILURE_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { code, .. } => *code,
            _ => GENERIC_FAILURE_CODE,
        }
    }

    /// Labelled diagnostic output captured from a failed tool, if any.
    pub fn diagnostic(&self) -> Option<(String, &[u8])> {
        match self {
            Self::ToolFailed { tool, output, .. } => {
                Some((format!("Calling {tool} failed:"), output.as_slice()))
            }
            _ => None,
        }
    }

    /// Stage the error originated from, when it came from a subordinate tool.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::ToolFailed { stage, .. }
            | Self::ToolLaunch { stage, .. }
            | Self::ArtifactMissing { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_propagates_code() {
        let err = SweeperError::ToolFailed {
            stage: Stage::Sweep,
            tool: "sweep".to_string(),
            code: 42,
            output: b"bad section".to_vec(),
        };
        assert_eq!(err.exit_code(), 42);
        assert_eq!(err.stage(), Some(Stage::Sweep));

        let (label, output) = err.diagnostic().expect("has diagnostic");
        assert_eq!(label, "Calling sweep failed:");
        assert_eq!(output, b"bad section");
    }

    #[test]
    fn test_unsupported_platform_message() {
        let err = SweeperError::UnsupportedPlatform {
            os: "linux".to_string(),
            arch: "aarch64".to_string(),
            install_dir: PathBuf::from("/opt/sweeper"),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"linux aarch64\""));
        assert!(msg.contains(UPSTREAM_PROJECT_URL));
        assert!(msg.contains("/opt/sweeper"));
        assert_eq!(err.exit_code(), GENERIC_FAILURE_CODE);
        assert!(err.diagnostic().is_none());
    }

    #[test]
    fn test_generic_failures_use_code_one() {
        let err = SweeperError::ArtifactMissing {
            stage: Stage::Raster,
            path: PathBuf::from("/tmp/x/cookie.png"),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(SweeperError::Configuration("bad".into()).exit_code(), 1);
    }
}
