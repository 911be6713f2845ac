//! User-configured shell commands.

use quill_config::CommandConfig;

use crate::plugin::{HookOutcome, Plugin, PluginContext, PluginError};

/// Runs each configured `[[commands]]` entry during setup.
///
/// Commands run before content discovery, so files they generate are
/// picked up by the markdown glob. A failing command aborts the build.
#[derive(Debug, Default)]
pub struct CommandsPlugin;

impl Plugin for CommandsPlugin {
    fn name(&self) -> &str {
        "core-commands"
    }

    fn on_setup(&self, ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        for command in &ctx.config.commands {
            run_command(ctx, command)?;
        }
        Ok(HookOutcome::ran())
    }
}

fn run_command(ctx: &PluginContext<'_>, entry: &CommandConfig) -> Result<(), PluginError> {
    tracing::info!(command = %entry.command, "Running command");
    let output = ctx.shell.run(&entry.command, &ctx.config.root_dir)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return Err(format!(
            "command `{}` exited with {}\n{}{}",
            entry.command, output.status, stdout, stderr
        )
        .into());
    }

    if !entry.quiet && !stdout.trim().is_empty() {
        tracing::info!(command = %entry.command, "{}", stdout.trim_end());
    }
    Ok(())
}
