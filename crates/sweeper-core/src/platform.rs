//! Platform resolution for the prebuilt sweep binaries.
//!
//! The installation ships one directory per supported platform:
//!
//! | OS      | Architecture      | Directory      |
//! |---------|-------------------|----------------|
//! | macOS   | any               | `mac`          |
//! | Windows | any               | `windows`      |
//! | Linux   | x86-64            | `linux-x86_64` |
//! | Linux   | 32-bit x86        | `linux-i386`   |

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SweeperError;

/// File name of the sweep binary inside a platform directory, without suffix.
const SWEEP_BINARY_STEM: &str = "sweep";

/// Operating system and CPU architecture of the running host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS identifier as reported by `std::env::consts::OS`.
    pub os: String,
    /// Architecture identifier as reported by `std::env::consts::ARCH`.
    pub arch: String,
}

impl Platform {
    /// Create a platform from explicit identifiers.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process was compiled for.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Whether executables on this platform carry an `.exe` suffix.
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

/// A resolved platform binary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformBinDir {
    name: &'static str,
    exe_suffix: &'static str,
}

impl PlatformBinDir {
    /// Directory name relative to the installation directory.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full path of the sweep binary under `install_dir`.
    pub fn sweep_binary(&self, install_dir: &Path) -> PathBuf {
        install_dir
            .join(self.name)
            .join(format!("{SWEEP_BINARY_STEM}{}", self.exe_suffix))
    }
}

/// Maps a platform onto its prebuilt binary directory.
pub struct PlatformResolver;

impl PlatformResolver {
    /// Resolve the binary directory for `platform`.
    ///
    /// `install_dir` is only used to point the user at the installation
    /// when the platform is unsupported.
    pub fn resolve(platform: &Platform, install_dir: &Path) -> Result<PlatformBinDir, SweeperError> {
        let name = match (platform.os.as_str(), platform.arch.as_str()) {
            ("macos", _) => "mac",
            ("windows", _) => "windows",
            ("linux", "x86_64") => "linux-x86_64",
            ("linux", "x86" | "i386" | "i686") => "linux-i386",
            _ => {
                return Err(SweeperError::UnsupportedPlatform {
                    os: platform.os.clone(),
                    arch: platform.arch.clone(),
                    install_dir: install_dir.to_path_buf(),
                });
            }
        };

        debug!(os = %platform.os, arch = %platform.arch, bin_dir = name, "Resolved platform");

        Ok(PlatformBinDir {
            name,
            exe_suffix: if platform.is_windows() { ".exe" } else { "" },
        })
    }
}
