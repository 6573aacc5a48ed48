//! macOS user defaults resource.
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::DefaultsValue;
use crate::exec::Executor;

/// A typed macOS user default (`defaults write <domain> <key> -<type> <value>`).
#[derive(Debug)]
pub struct DefaultsResource<'a> {
    /// Preferences domain, e.g. `com.apple.dock`.
    pub domain: String,
    /// Preference key.
    pub key: String,
    /// Desired value.
    pub value: DefaultsValue,
    executor: &'a dyn Executor,
}

impl<'a> DefaultsResource<'a> {
    /// Create a resource for `domain` `key`.
    #[must_use]
    pub fn new(domain: &str, key: &str, value: DefaultsValue, executor: &'a dyn Executor) -> Self {
        Self {
            domain: domain.to_string(),
            key: key.to_string(),
            value,
            executor,
        }
    }
}

impl Applicable for DefaultsResource<'_> {
    fn description(&self) -> String {
        format!("{} {} = {}", self.domain, self.key, self.value)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let value = self.value.to_string();
        self.executor.run(
            "defaults",
            &["write", &self.domain, &self.key, self.value.type_flag(), &value],
        )?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultsResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked("defaults", &["read", &self.domain, &self.key])?;
        if !result.success {
            return Ok(ResourceState::Missing);
        }
        if self.value.matches_read(&result.stdout) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: result.stdout.trim().to_string(),
            })
        }
    }
}
