//! Client entry-point bundling.

use crate::plugin::{Fragments, HookOutcome, Plugin, PluginContext, PluginError};

/// Directory under the build output holding bundled entry points.
pub const SCRIPTS_DIR: &str = "__quill-scripts";

/// Invokes the configured bundler and contributes one script tag per
/// entry point.
///
/// The bundler command is an opaque template; `{entries}` expands to the
/// space-joined entry point list and `{outdir}` to the script directory
/// under the output directory.
#[derive(Debug, Default)]
pub struct ScriptsPlugin;

impl Plugin for ScriptsPlugin {
    fn name(&self) -> &str {
        "core-scripts"
    }

    fn on_build(&self, ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        let entry_points = &ctx.config.scripts.entry_points;
        if entry_points.is_empty() {
            return Ok(HookOutcome::ran());
        }

        let Some(bundler) = &ctx.config.scripts.bundler else {
            return Err("script entry points configured without a bundler command".into());
        };

        let outdir = ctx.config.build_resolved.output_dir.join(SCRIPTS_DIR);
        let command = bundler
            .replace("{entries}", &entry_points.join(" "))
            .replace("{outdir}", &outdir.to_string_lossy());

        tracing::info!(command = %command, "Bundling entry points");
        let output = ctx.shell.run(&command, &ctx.config.root_dir)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "bundler exited with {}: {}",
                output.status,
                stderr.trim()
            )
            .into());
        }

        let mut fragments = Fragments::new();
        for entry in entry_points {
            fragments = fragments.with_script(format!(
                r#"<script src="{}{}/{}.js"></script>"#,
                ctx.config.site.base,
                SCRIPTS_DIR,
                entry_stem(entry)
            ));
        }
        Ok(HookOutcome::Ran(fragments))
    }
}

/// File name up to the first `.`, matching the bundler's output naming.
fn entry_stem(entry: &str) -> &str {
    let name = entry.rsplit('/').next().unwrap_or(entry);
    name.split('.').next().unwrap_or(name)
}
