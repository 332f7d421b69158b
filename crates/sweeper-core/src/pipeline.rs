//! Pipeline controller: platform resolution, workspace lifecycle, raster
//! export and sweep, strictly in that order.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::error::SweeperError;
use crate::models::{HostContext, InvocationRequest};
use crate::platform::{PlatformBinDir, PlatformResolver};
use crate::raster::RasterExporter;
use crate::runner::ToolRunner;
use crate::sweep::{PROFILE_FILE_NAME, SweepInvoker};
use crate::workspace::Workspace;

/// Progress of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has happened yet.
    Start,
    /// The sweep binary directory is known.
    PlatformResolved,
    /// The workspace exists.
    WorkspaceReady,
    /// The silhouette raster is in the workspace.
    RasterExported,
    /// The mesh file has been written. Terminal.
    SweepComplete,
    /// A step failed. Terminal.
    Aborted,
}

impl PipelineState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::SweepComplete | Self::Aborted)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::PlatformResolved => "platform_resolved",
            Self::WorkspaceReady => "workspace_ready",
            Self::RasterExported => "raster_exported",
            Self::SweepComplete => "sweep_complete",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Runs one invocation end to end.
pub struct Pipeline<R> {
    host: HostContext,
    runner: R,
    state: PipelineState,
}

impl<R: ToolRunner> Pipeline<R> {
    /// Create a pipeline for `host` that launches tools through `runner`.
    pub fn new(host: HostContext, runner: R) -> Self {
        Self {
            host,
            runner,
            state: PipelineState::Start,
        }
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the pipeline, returning the path of the written mesh.
    ///
    /// The first failure aborts the run; the workspace, if it was created,
    /// is removed before this returns on every path.
    #[instrument(skip(self, request), fields(input = %request.input.display()))]
    pub async fn run(&mut self, request: &InvocationRequest) -> Result<PathBuf, SweeperError> {
        self.state = PipelineState::Start;

        if !request.selected_ids.is_empty() {
            debug!(ids = ?request.selected_ids, "Ignoring selected object ids");
        }

        let result = self.execute(request).await;

        match &result {
            Ok(mesh) => info!(mesh = %mesh.display(), "Cookie cutter mesh written"),
            Err(e) => {
                warn!(state = %self.state, error = %e, "Pipeline aborted");
                self.transition(PipelineState::Aborted);
            }
        }

        result
    }

    async fn execute(&mut self, request: &InvocationRequest) -> Result<PathBuf, SweeperError> {
        let bin_dir = PlatformResolver::resolve(&self.host.platform, &self.host.install_dir)?;
        self.transition(PipelineState::PlatformResolved);

        let workspace = Workspace::acquire(&self.host.temp_root)?;
        self.transition(PipelineState::WorkspaceReady);

        let result = self.run_stages(request, &bin_dir, &workspace).await;
        workspace.release();
        result
    }

    async fn run_stages(
        &mut self,
        request: &InvocationRequest,
        bin_dir: &PlatformBinDir,
        workspace: &Workspace,
    ) -> Result<PathBuf, SweeperError> {
        let exporter = RasterExporter::new(&self.host.exporter_command);
        let raster = exporter
            .export(&self.runner, &request.input, workspace)
            .await?;
        self.transition(PipelineState::RasterExported);

        let mesh = request.resolved_output(&self.host);
        let invoker = SweepInvoker::new(
            bin_dir.sweep_binary(&self.host.install_dir),
            self.host.install_file(PROFILE_FILE_NAME),
        );
        invoker.sweep(&self.runner, &raster, &mesh).await?;
        self.transition(PipelineState::SweepComplete);

        Ok(mesh)
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next;
    }
}
