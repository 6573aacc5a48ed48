//! Caps Lock to Escape remapping.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resource_states};
use crate::config::KeyboardSection;
use crate::resources::launch_agent::{LaunchAgentResource, render_plist};
use crate::resources::{Resource, ResourceState};

const HIDUTIL: &str = "/usr/bin/hidutil";

/// The `hidutil property --set` payload for a single key mapping.
#[must_use]
pub fn key_mapping_json(keyboard: &KeyboardSection) -> String {
    serde_json::json!({
        "UserKeyMapping": [{
            "HIDKeyboardModifierMappingSrc": keyboard.source,
            "HIDKeyboardModifierMappingDst": keyboard.destination,
        }]
    })
    .to_string()
}

/// Remap Caps Lock to Escape now, and at every login via a LaunchAgent.
#[derive(Debug)]
pub struct RemapCapsLock;

impl Task for RemapCapsLock {
    fn name(&self) -> &'static str {
        "Remap Caps Lock to Escape"
    }

    fn id(&self) -> &'static str {
        "keyboard"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let keyboard = &ctx.manifest.keyboard;
        let mapping = key_mapping_json(keyboard);

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run hidutil property --set {mapping}"));
        } else {
            ctx.executor.run(HIDUTIL, &["property", "--set", &mapping])?;
            ctx.log.success("Caps Lock mapped to Escape for this session");
        }

        let plist = ctx
            .launch_agents_dir()
            .join(format!("{}.plist", keyboard.label));
        let content = render_plist(&keyboard.label, &[HIDUTIL, "property", "--set", &mapping]);
        let agent = LaunchAgentResource::new(plist, content, ctx.executor.as_ref());
        let state = agent.current_state()?;

        if state == ResourceState::Correct && !ctx.dry_run {
            // an unchanged plist may still have been unloaded by hand
            if agent.reload()? {
                ctx.log.debug("reloaded launch agent");
            }
        }
        let result = process_resource_states(
            ctx,
            [(&agent, state)],
            &ProcessOpts::apply_all("install", "installed"),
        )?;
        if result == TaskResult::Ok {
            ctx.log.success("Caps Lock mapped to Escape (persistent)");
        }
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{make_context, recording};
    use std::sync::Arc;

    fn keyboard() -> KeyboardSection {
        KeyboardSection {
            label: "com.local.KeyRemapping".to_string(),
            source: 0x7_0000_0039,
            destination: 0x7_0000_0029,
        }
    }

    fn temp_home(executor: Arc<MockExecutor>) -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = make_context().with_executor(executor);
        ctx.home = dir.path().to_path_buf();
        (dir, ctx)
    }

    #[test]
    fn mapping_json_uses_hid_usage_codes() {
        assert_eq!(
            key_mapping_json(&keyboard()),
            r#"{"UserKeyMapping":[{"HIDKeyboardModifierMappingDst":30064771113,"HIDKeyboardModifierMappingSrc":30064771129}]}"#
        );
    }

    #[test]
    fn applies_live_mapping_and_installs_agent() {
        let executor = Arc::new(MockExecutor::succeeding(&["", ""]));
        let (_dir, ctx) = temp_home(executor.clone());
        let (ctx, log) = recording(ctx);

        assert_eq!(RemapCapsLock.run(&ctx).unwrap(), TaskResult::Ok);

        let plist = ctx
            .home
            .join("Library/LaunchAgents/com.local.KeyRemapping.plist");
        let mapping = key_mapping_json(&keyboard());
        assert_eq!(
            executor.calls(),
            [
                format!("/usr/bin/hidutil property --set {mapping}"),
                format!("launchctl load {}", plist.display()),
            ]
        );
        let written = std::fs::read_to_string(&plist).unwrap();
        assert!(written.contains("<string>/usr/bin/hidutil</string>"));
        assert!(written.contains("<key>RunAtLoad</key>"));
        assert!(log.contains("Caps Lock mapped to Escape (persistent)"));
    }

    #[test]
    fn identical_agent_is_loaded_again_without_rewrite() {
        let executor = Arc::new(MockExecutor::succeeding(&["", "", "", ""]));
        let (_dir, ctx) = temp_home(executor.clone());
        RemapCapsLock.run(&ctx).unwrap();
        let plist = ctx
            .home
            .join("Library/LaunchAgents/com.local.KeyRemapping.plist");
        let written = std::fs::metadata(&plist).unwrap().modified().unwrap();

        assert_eq!(RemapCapsLock.run(&ctx).unwrap(), TaskResult::Ok);

        // hidutil, launchctl load, hidutil, launchctl load
        let calls = executor.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[2].starts_with("/usr/bin/hidutil"));
        assert_eq!(calls[3], format!("launchctl load {}", plist.display()));
        assert_eq!(std::fs::metadata(&plist).unwrap().modified().unwrap(), written);
    }

    #[test]
    fn hidutil_failure_fails_the_step() {
        let executor = Arc::new(MockExecutor::fail());
        let (dir, ctx) = temp_home(executor);
        assert!(RemapCapsLock.run(&ctx).is_err());
        assert!(!dir.path().join("Library").exists());
    }

    #[test]
    fn dry_run_changes_nothing() {
        let executor = Arc::new(MockExecutor::default());
        let (dir, mut ctx) = temp_home(executor.clone());
        ctx.dry_run = true;
        let (ctx, log) = recording(ctx);

        assert_eq!(RemapCapsLock.run(&ctx).unwrap(), TaskResult::DryRun);
        assert_eq!(executor.call_count(), 0);
        assert!(!dir.path().join("Library").exists());
        assert!(log.contains("would run hidutil property --set"));
        assert!(log.contains("would install"));
    }
}
