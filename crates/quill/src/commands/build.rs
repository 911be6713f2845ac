//! `quill build` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_site::Builder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Build only these comma-separated web paths (e.g. "/,/docs/setup").
    #[arg(short, long)]
    paths: Option<String>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Remove the output directory before building.
    #[arg(long)]
    clean: bool,

    /// Enable verbose output (per-plugin phase timing logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the build aborts.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            content_dir: self.content_dir,
            output_dir: self.output_dir,
            clean: self.clean.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            tracing::info!(config = %path.display(), "Loaded configuration");
        }

        output.info(&format!(
            "Content: {}",
            config.build_resolved.content_dir.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.build_resolved.output_dir.display()
        ));

        let summary = Builder::new(config).build(self.paths.as_deref())?;

        if summary.page_count == 0 {
            output.warning("No pages were built");
        }
        output.success(&format!(
            "Built {} pages in {:.0}ms",
            summary.page_count, summary.elapsed_ms
        ));
        Ok(())
    }
}
