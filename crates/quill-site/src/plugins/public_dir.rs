//! Public directory copying.

use crate::plugin::{HookOutcome, Plugin, PluginContext, PluginError};

/// Copies the public directory tree into the output directory, if it
/// exists.
#[derive(Debug, Default)]
pub struct PublicDirPlugin;

impl Plugin for PublicDirPlugin {
    fn name(&self) -> &str {
        "core-public-dir"
    }

    fn on_build(&self, ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        let public_dir = &ctx.config.build_resolved.public_dir;
        if ctx.storage.exists(public_dir) {
            ctx.storage
                .copy_tree(public_dir, &ctx.config.build_resolved.output_dir)?;
        }
        Ok(HookOutcome::ran())
    }
}
