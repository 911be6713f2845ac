//! Built-in plugins.
//!
//! Everything the engine itself ships as a plugin rather than hard-wired
//! pipeline code: shell commands, head/script fragments, static asset
//! copying, sitemap emission, and the final document shell. All are
//! stateless unit structs reading what they need from the shared context,
//! and all carry the `core-` name prefix that orders them ahead of user
//! plugins in phase reports.

use crate::plugin::Plugin;

mod commands;
mod heads;
mod pages;
mod public_dir;
mod public_files;
mod scripts;
mod sitemap_xml;

pub use commands::CommandsPlugin;
pub use heads::HeadsPlugin;
pub use pages::PagesPlugin;
pub use public_dir::PublicDirPlugin;
pub use public_files::PublicFilesPlugin;
pub use scripts::ScriptsPlugin;
pub use sitemap_xml::SitemapPlugin;

/// The built-in plugin suite, in registration order.
#[must_use]
pub fn core_plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(HeadsPlugin),
        Box::new(ScriptsPlugin),
        Box::new(CommandsPlugin),
        Box::new(PublicDirPlugin),
        Box::new(PublicFilesPlugin),
        Box::new(SitemapPlugin),
        Box::new(PagesPlugin),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_core_plugins_carry_core_prefix() {
        for plugin in core_plugins() {
            assert!(
                plugin.name().starts_with(crate::plugin::CORE_PREFIX),
                "{} lacks the core prefix",
                plugin.name()
            );
        }
    }
}
