//! External tool execution.
//!
//! Both pipeline stages go through [`ToolRunner::run`], which launches a
//! child process, waits for it to finish and returns its exit status along
//! with whatever output the stage asked to capture.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, error, info};

use crate::error::{GENERIC_FAILURE_CODE, Stage, SweeperError};

/// Which output streams of the child are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Capture stdout and stderr through one pipe, interleaved as written.
    Combined,
    /// Capture stderr only; stdout is inherited from this process.
    StderrOnly,
}

/// A fully resolved command line for one stage.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Stage this invocation implements.
    pub stage: Stage,
    /// Short tool name used in diagnostics.
    pub tool: String,
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments in order.
    pub args: Vec<OsString>,
    /// Streams to capture.
    pub capture: CaptureMode,
}

/// Outcome of a finished tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit status, normalised to an integer.
    pub code: i32,
    /// Captured output per [`CaptureMode`].
    pub output: Vec<u8>,
}

impl ToolOutput {
    /// Whether the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external tools to completion.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `invocation` and wait for it to exit.
    ///
    /// A non-zero exit is not an error at this level; only failing to run
    /// the program at all is.
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, SweeperError>;
}

/// [`ToolRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, SweeperError> {
        info!(
            stage = %invocation.stage,
            program = %invocation.program.display(),
            args = ?invocation.args,
            "Executing external tool"
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let (code, captured) = match invocation.capture {
            CaptureMode::Combined => {
                // One pipe behind both handles keeps the write order.
                let (reader, writer) = std::io::pipe()?;
                cmd.stdout(Stdio::from(writer.try_clone()?))
                    .stderr(Stdio::from(writer));

                let mut child = spawn(&mut cmd, invocation)?;
                // The command still owns the write ends; EOF needs them closed.
                drop(cmd);

                let drain = tokio::task::spawn_blocking(move || {
                    let mut reader = reader;
                    let mut buf = Vec::new();
                    reader.read_to_end(&mut buf).map(|_| buf)
                });
                let status = child.wait().await?;
                let captured = drain.await??;
                (exit_code(status), captured)
            }
            CaptureMode::StderrOnly => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::piped());

                // `Command::output` would force stdout to a pipe; spawn keeps
                // the configured handles.
                let child = spawn(&mut cmd, invocation)?;
                let output = child.wait_with_output().await?;
                (exit_code(output.status), output.stderr)
            }
        };

        debug!(
            stage = %invocation.stage,
            exit_code = code,
            captured_bytes = captured.len(),
            "External tool finished"
        );

        Ok(ToolOutput {
            code,
            output: captured,
        })
    }
}

/// Spawn `cmd`, mapping a launch failure onto the invocation's stage.
fn spawn(cmd: &mut Command, invocation: &ToolInvocation) -> Result<Child, SweeperError> {
    cmd.spawn().map_err(|source| {
        error!(
            stage = %invocation.stage,
            program = %invocation.program.display(),
            error = %source,
            "Failed to launch external tool"
        );
        SweeperError::ToolLaunch {
            stage: invocation.stage,
            program: invocation.program.clone(),
            source,
        }
    })
}

/// Run one stage and enforce its contract.
///
/// A non-zero exit becomes [`SweeperError::ToolFailed`] carrying the
/// captured output; a zero exit without `artifact` on disk becomes
/// [`SweeperError::ArtifactMissing`].
pub async fn run_stage(
    runner: &dyn ToolRunner,
    invocation: &ToolInvocation,
    artifact: &Path,
) -> Result<(), SweeperError> {
    let result = runner.run(invocation).await?;

    if !result.success() {
        error!(
            stage = %invocation.stage,
            tool = %invocation.tool,
            exit_code = result.code,
            "External tool failed"
        );
        return Err(SweeperError::ToolFailed {
            stage: invocation.stage,
            tool: invocation.tool.clone(),
            code: result.code,
            output: result.output,
        });
    }

    if !tokio::fs::try_exists(artifact).await.unwrap_or(false) {
        error!(
            stage = %invocation.stage,
            artifact = %artifact.display(),
            "External tool succeeded but artifact is missing"
        );
        return Err(SweeperError::ArtifactMissing {
            stage: invocation.stage,
            path: artifact.to_path_buf(),
        });
    }

    Ok(())
}

/// Short tool name for diagnostics: the program's file stem.
pub fn tool_name(program: &Path) -> String {
    program
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| program.display().to_string())
}

/// Normalise an exit status to an integer code.
///
/// Signal termination on Unix maps to `128 + signal`, the shell convention.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    GENERIC_FAILURE_CODE
}
