//! Single-resource processing: check state, apply one resource.

use anyhow::Result;

use super::{ProcessOpts, TaskStats};
use crate::tasks::Context;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Process a single resource given its current state, returning a stats delta.
pub(super) fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    resource_state: ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    ctx.log
        .debug(&format!("check {desc}: state={resource_state:?}"));
    let mut delta = TaskStats::new();
    match resource_state {
        ResourceState::Correct => {
            ctx.log.success(&format!("{desc} already {}", opts.done));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&reason);
            delta.skipped += 1;
        }
        ResourceState::Missing if !opts.fix_missing => {
            delta.skipped += 1;
        }
        ResourceState::Incorrect { ref current } if !opts.fix_incorrect => {
            ctx.log
                .debug(&format!("leaving {desc} as is (currently {current})"));
            delta.skipped += 1;
        }
        resource_state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = resource_state {
                    format!("would {} {desc} (currently {current})", opts.verb)
                } else {
                    format!("would {} {desc}", opts.verb)
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            delta += apply_resource(ctx, resource, opts)?;
        }
    }
    Ok(delta)
}

/// Apply a single resource change, returning a stats delta.
pub(super) fn apply_resource<R: Resource>(
    ctx: &Context,
    resource: &R,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    ctx.log.debug(&format!("{}: {desc}", opts.verb));
    let mut delta = TaskStats::new();
    let change = match resource.apply() {
        Ok(change) => change,
        Err(e) => {
            if opts.bail_on_error {
                return Err(e);
            }
            ctx.log
                .error(&format!("failed to {} {desc}: {e:#}", opts.verb));
            delta.failed += 1;
            return Ok(delta);
        }
    };

    match change {
        ResourceChange::Applied => {
            ctx.log.success(&format!("{desc} {}", opts.done));
            delta.changed += 1;
        }
        ResourceChange::AlreadyCorrect => {
            ctx.log.success(&format!("{desc} already {}", opts.done));
            delta.already_ok += 1;
        }
        ResourceChange::Skipped { reason } => {
            if opts.bail_on_error {
                anyhow::bail!("failed to {} {desc}: {reason}", opts.verb);
            }
            ctx.log
                .warn(&format!("failed to {} {desc}: {reason}", opts.verb));
            delta.skipped += 1;
        }
    }
    Ok(delta)
}
