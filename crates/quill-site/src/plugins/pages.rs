//! Final page markup emission.

use std::fmt::Write as _;
use std::path::PathBuf;

use quill_renderer::escape_html;
use rayon::prelude::*;

use crate::page::Page;
use crate::plugin::{HookOutcome, Plugin, PluginContext, PluginError, RenderData};

/// Wraps every resolved page in the document shell and writes it to
/// `output_dir/<path>/index.html`.
#[derive(Debug, Default)]
pub struct PagesPlugin;

impl Plugin for PagesPlugin {
    fn name(&self) -> &str {
        "core-pages"
    }

    fn on_render(
        &self,
        ctx: &PluginContext<'_>,
        data: &RenderData<'_>,
    ) -> Result<HookOutcome, PluginError> {
        data.pages
            .par_iter()
            .map(|page| write_page(ctx, data, page))
            .collect::<Result<(), PluginError>>()?;
        Ok(HookOutcome::ran())
    }
}

fn write_page(
    ctx: &PluginContext<'_>,
    data: &RenderData<'_>,
    page: &Page,
) -> Result<(), PluginError> {
    let html = document_shell(ctx, data, page)?;
    let file = output_file(ctx, &page.path);
    ctx.storage.write_text(&file, &html)?;
    Ok(())
}

fn document_shell(
    ctx: &PluginContext<'_>,
    data: &RenderData<'_>,
    page: &Page,
) -> Result<String, PluginError> {
    let title = if page.title.is_empty() {
        &ctx.config.site.title
    } else {
        &page.title
    };

    let props = serde_json::json!({
        "page": page,
        "sitemap": data.sitemap,
    });
    // Keep `</script>` sequences in props from terminating the tag early.
    let props = serde_json::to_string(&props)?.replace("</", "<\\/");

    let mut html = String::from("<!doctype html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    writeln!(html, "<title>{}</title>", escape_html(title)).unwrap();
    for head in &data.fragments.heads {
        html.push_str(head);
        html.push('\n');
    }
    html.push_str("</head>\n<body>\n");
    writeln!(
        html,
        "<div id=\"quill-root\" data-layout=\"{}\">{}</div>",
        escape_html(&page.layout),
        page.html
    )
    .unwrap();
    writeln!(html, "<script>window.__quill = {props};</script>").unwrap();
    for script in &data.fragments.scripts {
        html.push_str(script);
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn output_file(ctx: &PluginContext<'_>, web_path: &str) -> PathBuf {
    let output_dir = &ctx.config.build_resolved.output_dir;
    let rel = web_path.trim_start_matches('/');
    if rel.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(rel).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use quill_config::Config;
    use quill_storage::MockStorage;

    use super::*;
    use crate::plugin::Fragments;
    use crate::shell::Shell;
    use crate::sitemap::SitemapEntry;

    fn render(config: &Config, pages: &[Page], fragments: &Fragments) -> MockStorage {
        let storage = MockStorage::new();
        let shell = Shell::new();
        let ctx = PluginContext {
            config,
            storage: &storage,
            shell: &shell,
        };
        let sitemap: Vec<SitemapEntry> = pages
            .iter()
            .map(|page| SitemapEntry {
                path: page.path.clone(),
                title: page.title.clone(),
            })
            .collect();
        let data = RenderData {
            pages,
            sitemap: &sitemap,
            fragments,
        };

        PagesPlugin.on_render(&ctx, &data).unwrap();
        storage
    }

    #[test]
    fn test_writes_document_shell() {
        let config = Config::default_with_base(Path::new("/site"));
        let pages = vec![Page::new("/docs", "<h1>Docs</h1>").with_title("Docs")];

        let storage = render(&config, &pages, &Fragments::new());

        let html = storage.file("/site/dist/docs/index.html").unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>Docs</title>"));
        assert!(html.contains(r#"<div id="quill-root" data-layout="default"><h1>Docs</h1></div>"#));
        assert!(html.contains("window.__quill = "));
        assert!(html.contains(r#""path":"/docs""#));
    }

    #[test]
    fn test_root_page_lands_at_output_root() {
        let config = Config::default_with_base(Path::new("/site"));
        let pages = vec![Page::new("/", "<p>home</p>")];

        let storage = render(&config, &pages, &Fragments::new());

        assert!(storage.file("/site/dist/index.html").is_some());
    }

    #[test]
    fn test_empty_title_falls_back_to_site_title() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.site.title = "Quill docs".to_owned();
        let pages = vec![Page::new("/docs", "")];

        let storage = render(&config, &pages, &Fragments::new());

        let html = storage.file("/site/dist/docs/index.html").unwrap();
        assert!(html.contains("<title>Quill docs</title>"));
    }

    #[test]
    fn test_includes_fragments_in_order() {
        let config = Config::default_with_base(Path::new("/site"));
        let pages = vec![Page::new("/docs", "")];
        let fragments = Fragments::new()
            .with_head(r#"<meta name="generator" content="quill">"#)
            .with_script(r#"<script src="/__quill-scripts/app.js"></script>"#);

        let storage = render(&config, &pages, &fragments);

        let html = storage.file("/site/dist/docs/index.html").unwrap();
        let head_at = html.find("generator").unwrap();
        let body_at = html.find("<body>").unwrap();
        let script_at = html.find("__quill-scripts").unwrap();
        assert!(head_at < body_at);
        assert!(body_at < script_at);
    }

    #[test]
    fn test_props_script_terminator_is_escaped() {
        let config = Config::default_with_base(Path::new("/site"));
        let pages = vec![Page::new("/docs", "").with_var("snippet", "</script><b>")];

        let storage = render(&config, &pages, &Fragments::new());

        let html = storage.file("/site/dist/docs/index.html").unwrap();
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_props_include_custom_vars_and_sitemap() {
        let config = Config::default_with_base(Path::new("/site"));
        let pages = vec![Page::new("/docs", "").with_title("Docs").with_var("order", 3)];

        let storage = render(&config, &pages, &Fragments::new());

        let html = storage.file("/site/dist/docs/index.html").unwrap();
        assert!(html.contains(r#""order":3"#));
        assert!(html.contains(r#""sitemap":"#));
    }
}
