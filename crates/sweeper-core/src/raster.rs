//! Drawing-to-raster export stage.
//!
//! The exporter renders the drawing cropped to its content at 254 dpi, so one
//! pixel covers 0.1 mm, which is the scale the sweep binary assumes. The
//! background is fully transparent black.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Stage, SweeperError};
use crate::runner::{self, CaptureMode, ToolInvocation, ToolRunner};
use crate::workspace::Workspace;

/// File name of the silhouette raster inside the workspace.
pub const RASTER_FILE_NAME: &str = "cookie.png";

/// Export resolution in dots per inch.
pub const EXPORT_DPI: u32 = 254;

/// Builds and runs the exporter invocation.
#[derive(Debug, Clone)]
pub struct RasterExporter {
    program: PathBuf,
}

impl RasterExporter {
    /// Create an exporter that runs `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Where the raster artifact is written inside `workspace`.
    pub fn artifact_path(workspace: &Workspace) -> PathBuf {
        workspace.file(RASTER_FILE_NAME)
    }

    /// Command line exporting `drawing` to `raster`.
    pub fn invocation(&self, drawing: &Path, raster: &Path) -> ToolInvocation {
        let mut export_filename = OsString::from("--export-filename=");
        export_filename.push(raster);

        ToolInvocation {
            stage: Stage::Raster,
            tool: runner::tool_name(&self.program),
            program: self.program.clone(),
            args: vec![
                "--export-type=png".into(),
                export_filename,
                "--export-area-drawing".into(),
                format!("--export-dpi={EXPORT_DPI}").into(),
                "--export-background=#000000".into(),
                "--export-background-opacity=0".into(),
                drawing.as_os_str().to_os_string(),
            ],
            capture: CaptureMode::Combined,
        }
    }

    /// Export `drawing` into `workspace`, returning the raster path.
    pub async fn export(
        &self,
        runner: &dyn ToolRunner,
        drawing: &Path,
        workspace: &Workspace,
    ) -> Result<PathBuf, SweeperError> {
        let raster = Self::artifact_path(workspace);
        let invocation = self.invocation(drawing, &raster);
        runner::run_stage(runner, &invocation, &raster).await?;
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_arguments() {
        let exporter = RasterExporter::new("/usr/bin/inkscape");
        let invocation =
            exporter.invocation(Path::new("drawing.svg"), Path::new("/tmp/ws/cookie.png"));

        assert_eq!(invocation.stage, Stage::Raster);
        assert_eq!(invocation.tool, "inkscape");
        assert_eq!(invocation.program, PathBuf::from("/usr/bin/inkscape"));
        assert_eq!(invocation.capture, CaptureMode::Combined);

        let args: Vec<_> = invocation
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--export-type=png",
                "--export-filename=/tmp/ws/cookie.png",
                "--export-area-drawing",
                "--export-dpi=254",
                "--export-background=#000000",
                "--export-background-opacity=0",
                "drawing.svg",
            ]
        );
    }

    #[test]
    fn test_artifact_inside_workspace() {
        let root = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::acquire(root.path()).expect("acquire");
        let raster = RasterExporter::artifact_path(&workspace);
        assert_eq!(raster.parent(), Some(workspace.path()));
        assert!(raster.ends_with(RASTER_FILE_NAME));
    }
}
