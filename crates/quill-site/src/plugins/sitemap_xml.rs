//! Sitemap XML emission.

use std::fmt::Write as _;

use crate::plugin::{HookOutcome, Plugin, PluginContext, PluginError, RenderData};

/// Writes `sitemap.xml` into the output directory.
#[derive(Debug, Default)]
pub struct SitemapPlugin;

impl Plugin for SitemapPlugin {
    fn name(&self) -> &str {
        "core-sitemap"
    }

    fn on_render(
        &self,
        ctx: &PluginContext<'_>,
        data: &RenderData<'_>,
    ) -> Result<HookOutcome, PluginError> {
        let site_url = ctx.config.site.url.trim_end_matches('/');

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
        for entry in data.sitemap {
            writeln!(
                xml,
                "  <url><loc>{}</loc></url>",
                escape_xml(&format!("{site_url}{}", entry.path))
            )
            .unwrap();
        }
        xml.push_str("</urlset>\n");

        let path = ctx.config.build_resolved.output_dir.join("sitemap.xml");
        ctx.storage.write_text(&path, &xml)?;
        Ok(HookOutcome::ran())
    }
}

fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
