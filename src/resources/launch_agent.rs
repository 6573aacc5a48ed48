//! Per-user LaunchAgent plist resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Render a LaunchAgent property list that runs `program_arguments` at login.
#[must_use]
pub fn render_plist(label: &str, program_arguments: &[&str]) -> String {
    use std::fmt::Write as _;

    let mut args = String::new();
    for arg in program_arguments {
        let _ = writeln!(args, "        <string>{}</string>", xml_escape(arg));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{}</string>
    <key>ProgramArguments</key>
    <array>
{args}    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        xml_escape(label)
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A plist under `~/Library/LaunchAgents` that is (re)loaded when written.
#[derive(Debug)]
pub struct LaunchAgentResource<'a> {
    /// Plist path.
    pub path: PathBuf,
    /// Rendered plist document.
    pub content: String,
    executor: &'a dyn Executor,
}

impl<'a> LaunchAgentResource<'a> {
    /// Create a resource writing `content` to `path`.
    #[must_use]
    pub fn new(path: PathBuf, content: String, executor: &'a dyn Executor) -> Self {
        Self {
            path,
            content,
            executor,
        }
    }

    /// Load an already-written plist again.
    ///
    /// `launchctl` exits non-zero when the agent is already loaded, so the
    /// result only tells the caller whether this call did the loading.
    ///
    /// # Errors
    ///
    /// Returns an error if `launchctl` cannot be started.
    pub fn reload(&self) -> Result<bool> {
        let path = self.path.to_string_lossy();
        let result = self.executor.run_unchecked("launchctl", &["load", &path])?;
        Ok(result.success)
    }
}

impl Applicable for LaunchAgentResource<'_> {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let path = self.path.to_string_lossy();
        if self.path.exists() {
            // Not loaded is fine
            self.executor.run_unchecked("launchctl", &["unload", &path])?;
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, &self.content)
            .with_context(|| format!("write {}", self.path.display()))?;

        let result = self.executor.run_unchecked("launchctl", &["load", &path])?;
        if !result.success {
            return Err(ResourceError::execution_failed("launchctl", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for LaunchAgentResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        let current = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        if current == self.content {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            })
        }
    }
}
