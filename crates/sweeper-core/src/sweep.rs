//! Raster-to-mesh sweep stage.

use std::path::{Path, PathBuf};

use crate::error::{Stage, SweeperError};
use crate::runner::{self, CaptureMode, ToolInvocation, ToolRunner};

/// Cross-section profile image shipped in the installation directory.
pub const PROFILE_FILE_NAME: &str = "section.png";

/// Mirrors the mesh horizontally.
///
/// The exported raster is mirrored relative to the sweep tool's convention,
/// so the flag is passed on every run.
pub const FLIP_X_FLAG: &str = "--flip-x";

/// Builds and runs the sweep binary invocation.
#[derive(Debug, Clone)]
pub struct SweepInvoker {
    binary: PathBuf,
    profile: PathBuf,
}

impl SweepInvoker {
    /// Create an invoker for `binary` using the `profile` cross-section.
    pub fn new(binary: impl Into<PathBuf>, profile: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            profile: profile.into(),
        }
    }

    /// Sweep binary path.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Command line sweeping `raster` into `mesh`.
    pub fn invocation(&self, raster: &Path, mesh: &Path) -> ToolInvocation {
        ToolInvocation {
            stage: Stage::Sweep,
            tool: runner::tool_name(&self.binary),
            program: self.binary.clone(),
            args: vec![
                FLIP_X_FLAG.into(),
                self.profile.as_os_str().to_os_string(),
                raster.as_os_str().to_os_string(),
                mesh.as_os_str().to_os_string(),
            ],
            capture: CaptureMode::StderrOnly,
        }
    }

    /// Sweep `raster` into the mesh file at `mesh`.
    ///
    /// `mesh` must already be fully resolved (no `~`).
    pub async fn sweep(
        &self,
        runner: &dyn ToolRunner,
        raster: &Path,
        mesh: &Path,
    ) -> Result<(), SweeperError> {
        let invocation = self.invocation(raster, mesh);
        runner::run_stage(runner, &invocation, mesh).await
    }
}
