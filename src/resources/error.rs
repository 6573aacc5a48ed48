//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations.  Internal resource code may return
//! these variants directly; callers convert to [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command invoked by a resource failed with a non-zero exit code.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    ExecutionFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process.
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A required resource (file, program, etc.) was not found.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// A resource exists but is in an unexpected or inconsistent state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or description of the resource in the invalid state.
        resource: String,
        /// Human-readable explanation of why the state is invalid.
        reason: String,
    },
}

impl ResourceError {
    /// Build an [`ExecutionFailed`](Self::ExecutionFailed) from a finished command.
    #[must_use]
    pub fn execution_failed(program: &str, result: &crate::exec::ExecResult) -> Self {
        Self::ExecutionFailed {
            program: program.to_string(),
            exit_code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::exec::ExecResult;

    #[test]
    fn execution_failed_display() {
        let e = ResourceError::ExecutionFailed {
            program: "launchctl".to_string(),
            exit_code: 5,
            stderr: "Load failed: 5: Input/output error".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "command 'launchctl' failed (exit 5): Load failed: 5: Input/output error"
        );
    }

    #[test]
    fn execution_failed_from_result() {
        let result = ExecResult {
            stdout: String::new(),
            stderr: "boom\n".to_string(),
            success: false,
            code: None,
        };
        let e = ResourceError::execution_failed("hidutil", &result);
        assert_eq!(e.to_string(), "command 'hidutil' failed (exit -1): boom");
    }

    #[test]
    fn not_found_display() {
        let e = ResourceError::NotFound {
            resource: "~/.ssh/id_ed25519.pub".to_string(),
        };
        assert_eq!(e.to_string(), "resource not found: ~/.ssh/id_ed25519.pub");
    }

    #[test]
    fn invalid_state_display() {
        let e = ResourceError::InvalidState {
            resource: "ssh-agent".to_string(),
            reason: "output did not contain SSH_AUTH_SOCK".to_string(),
        };
        assert!(e.to_string().contains("ssh-agent"));
        assert!(e.to_string().contains("SSH_AUTH_SOCK"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resource_error_is_send_sync() {
        assert_send_sync::<ResourceError>();
    }
}
