//! # Sweeper Core
//!
//! Turns a 2-D drawing into a printable cookie cutter mesh by driving two
//! external tools in sequence:
//!
//! 1. a drawing exporter (Inkscape by default) that renders the drawing to a
//!    transparent PNG silhouette inside a temporary workspace, and
//! 2. a prebuilt, platform-specific `sweep` binary that sweeps a fixed
//!    cross-section profile along that silhouette and writes an STL file.
//!
//! This crate does no geometry itself. It resolves the platform binary,
//! marshals arguments and files between the two processes, owns the
//! workspace lifecycle and propagates the failing tool's exit status.

pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod pipeline;
pub mod platform;
pub mod raster;
pub mod runner;
pub mod sweep;
pub mod workspace;

pub use config::SweeperConfig;
pub use error::{Stage, SweeperError};
pub use models::{HostContext, InvocationRequest};
pub use pipeline::{Pipeline, PipelineState};
pub use platform::{Platform, PlatformResolver};
pub use runner::{ProcessRunner, ToolRunner};
pub use workspace::Workspace;
