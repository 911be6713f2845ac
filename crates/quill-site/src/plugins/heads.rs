//! Site-wide head fragments.

use quill_renderer::escape_html;

use crate::plugin::{Fragments, HookOutcome, Plugin, PluginContext, PluginError};

/// Contributes site-wide `<meta>` fragments to every page head.
#[derive(Debug, Default)]
pub struct HeadsPlugin;

impl Plugin for HeadsPlugin {
    fn name(&self) -> &str {
        "core-heads"
    }

    fn on_build(&self, ctx: &PluginContext<'_>) -> Result<HookOutcome, PluginError> {
        let mut fragments = Fragments::new();

        let description = &ctx.config.site.description;
        if !description.is_empty() {
            fragments = fragments.with_head(format!(
                r#"<meta name="description" content="{}">"#,
                escape_html(description)
            ));
        }
        fragments = fragments.with_head(r#"<meta name="generator" content="quill">"#);

        Ok(HookOutcome::Ran(fragments))
    }
}
