//! Domain-specific error types for the setup run.
//!
//! Steps return [`anyhow::Result`]; the variants here are the ones the
//! orchestrator and `main` need to recognise (via `downcast_ref`) to choose
//! an exit code and a message.
//!
//! # Error hierarchy
//!
//! ```text
//! SetupError
//! ├── PrerequisiteMissing   — fatal, exit code 1
//! ├── Interrupted           — Ctrl-C at a prompt or during a step, exit code 0
//! ├── UnsupportedPlatform   — not running on macOS, exit code 1
//! └── Prompt                — reading an answer from the terminal failed
//! ```

use thiserror::Error;

/// Errors that change how the whole run terminates.
#[derive(Error, Debug)]
pub enum SetupError {
    /// A mandatory prerequisite is missing and must be installed out-of-band.
    #[error("{what} is not installed; complete its installation and run macsetup again")]
    PrerequisiteMissing {
        /// Human-readable name of the missing prerequisite.
        what: String,
    },

    /// The user interrupted the run.
    #[error("interrupted by user")]
    Interrupted,

    /// The current operating system is not supported.
    #[error("macsetup is designed for macOS only (detected {os})")]
    UnsupportedPlatform {
        /// Name of the detected operating system.
        os: String,
    },

    /// A prompt could not be answered (no terminal, I/O failure, …).
    #[error("prompt '{prompt}' failed: {reason}")]
    Prompt {
        /// The prompt text.
        prompt: String,
        /// Underlying failure description.
        reason: String,
    },
}

impl SetupError {
    /// Process exit code associated with this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 0,
            Self::PrerequisiteMissing { .. }
            | Self::UnsupportedPlatform { .. }
            | Self::Prompt { .. } => 1,
        }
    }

    /// Returns `true` if `err` (or anything in its chain) is [`SetupError::Interrupted`].
    #[must_use]
    pub fn is_interrupted(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(cause.downcast_ref::<Self>(), Some(Self::Interrupted))
        })
    }
}
