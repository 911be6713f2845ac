//! Individual public file copying.

use crate::plugin::{HookOutcome, Plugin, PluginContext, PluginError};

/// Copies each configured `[[public_files]]` entry into the output
/// directory under its configured name.
#[derive(Debug, Default)]
pub struct PublicFilesPlugin;

impl Plugin for PublicFilesPlugin {
    fn name(&self) -> &str {
        "core-public-files"
    }

    fn on_build(&self, ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        for file in &ctx.config.public_files_resolved {
            let dst = ctx.config.build_resolved.output_dir.join(&file.name);
            ctx.storage.copy_file(&file.path, &dst)?;
        }
        Ok(HookOutcome::ran())
    }
}
