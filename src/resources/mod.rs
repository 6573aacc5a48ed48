//! Idempotent resource primitives (check + apply pattern).
pub mod defaults;
pub mod dock;
pub mod dotfile;
pub mod error;
pub mod git_config;
pub mod launch_agent;
pub mod package;
pub mod plugin;
pub mod ssh_key;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// This method should:
    /// - Create parent directories if needed
    /// - Update the resource to match the desired state
    /// - Return the appropriate `ResourceChange` result
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// a failing external command, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource (package, file, preference, etc.).
///
/// # Examples
///
/// ```
/// use macsetup::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "genie".into() };
/// let skip = ResourceState::Invalid { reason: "Slack not found at /Applications/Slack.app".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g., its source file is missing).
    Invalid {
        /// Reason why the resource cannot be applied, shown to the user.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use macsetup::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "source missing".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// ```ignore
/// // All resources follow the same check-then-apply pattern:
/// let state = resource.current_state()?;
/// if resource.needs_change()? {
///     resource.apply()?;
/// }
/// ```
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O failures,
    /// permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state cannot be determined (propagates errors from
    /// `current_state()`).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

impl<T: Applicable + ?Sized> Applicable for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn apply(&self) -> Result<ResourceChange> {
        (**self).apply()
    }
}

impl<T: Resource + ?Sized> Resource for &T {
    fn current_state(&self) -> Result<ResourceState> {
        (**self).current_state()
    }
}
