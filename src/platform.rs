//! Host platform detection.
use std::fmt;
use std::path::PathBuf;

/// Detected operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// macOS, the only supported target for `install`.
    MacOs,
    /// Linux.
    Linux,
    /// Anything else.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// Whether the CPU is Apple Silicon (`aarch64`).
    pub is_apple_silicon: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            is_apple_silicon: cfg!(all(target_os = "macos", target_arch = "aarch64")),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, is_apple_silicon: bool) -> Self {
        Self {
            os,
            is_apple_silicon,
        }
    }

    /// Whether this is macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Root of the Homebrew installation for this machine.
    ///
    /// Apple Silicon installs under `/opt/homebrew`; Intel Macs use `/usr/local`.
    #[must_use]
    pub fn homebrew_prefix(&self) -> PathBuf {
        if self.is_apple_silicon {
            PathBuf::from("/opt/homebrew")
        } else {
            PathBuf::from("/usr/local")
        }
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        }
    }
}
