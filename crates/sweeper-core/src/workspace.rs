//! Per-invocation temporary workspace.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SweeperError;

/// Exclusively owned temporary directory for one pipeline run.
///
/// [`Workspace::release`] removes the directory; if the guard is dropped
/// without an explicit release (early return or unwinding), `Drop` does it.
/// Removal happens at most once and never reports an error.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create a new uniquely named directory under `root`.
    pub fn acquire(root: &Path) -> Result<Self, SweeperError> {
        Self::acquire_named(root, &format!("cookie-sweeper__{}", Uuid::now_v7().simple()))
    }

    /// Create `root/name`, failing if it already exists.
    fn acquire_named(root: &Path, name: &str) -> Result<Self, SweeperError> {
        let path = root.join(name);
        let workspace_error = |source| SweeperError::Workspace {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(root).map_err(workspace_error)?;
        std::fs::create_dir(&path).map_err(workspace_error)?;

        debug!(workspace = %path.display(), "Acquired workspace");
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Recursively remove the directory, swallowing any error.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(workspace = %self.path.display(), "Released workspace"),
            Err(e) => warn!(
                workspace = %self.path.display(),
                error = %e,
                "Failed to clean up workspace"
            ),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}
