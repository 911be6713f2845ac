//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the clean-before-build flag.
    pub clean: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata.
    pub site: SiteConfig,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Client script bundling configuration.
    pub scripts: ScriptsConfig,
    /// Shell commands to run during the build phase.
    pub commands: Vec<CommandConfig>,
    /// Extra files to copy into the output directory.
    public_files: Vec<PublicFileRaw>,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Resolved public file entries (set after loading).
    #[serde(skip)]
    pub public_files_resolved: Vec<PublicFile>,
    /// Project root, the directory holding the config file (set after loading).
    #[serde(skip)]
    pub root_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata used in rendered documents and the sitemap.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, the fallback for pages without one.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Absolute site URL prefixed to sitemap locations (e.g. `https://example.com`).
    pub url: String,
    /// URL base path the site is served under. Must start and end with `/`.
    pub base: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Quill site".to_owned(),
            description: String::new(),
            url: String::new(),
            base: "/".to_owned(),
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    content_dir: Option<String>,
    output_dir: Option<String>,
    public_dir: Option<String>,
    clean: Option<bool>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct BuildConfig {
    /// Directory holding markdown content.
    pub content_dir: PathBuf,
    /// Directory the site is written to.
    pub output_dir: PathBuf,
    /// Directory of static assets copied into the output as-is.
    pub public_dir: PathBuf,
    /// Whether to delete the output directory before building.
    pub clean: bool,
}

/// Client script bundling configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Script entry points, relative to the project root.
    pub entry_points: Vec<String>,
    /// Bundler command template with `{entries}` and `{outdir}` placeholders.
    pub bundler: Option<String>,
}

/// A shell command run during the build phase.
#[derive(Debug, Deserialize)]
pub struct CommandConfig {
    /// Shell command line.
    pub command: String,
    /// Capture output and only surface it on failure.
    #[serde(default)]
    pub quiet: bool,
}

/// Raw public file entry as parsed from TOML.
#[derive(Debug, Deserialize)]
struct PublicFileRaw {
    path: String,
    name: Option<String>,
}

/// Resolved public file entry.
#[derive(Debug, Clone)]
pub struct PublicFile {
    /// Source file, resolved against the project root.
    pub path: PathBuf,
    /// Target filename in the output directory.
    pub name: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.build_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(clean) = settings.clean {
            self.build_resolved.clean = clean;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            build: BuildConfigRaw::default(),
            scripts: ScriptsConfig::default(),
            commands: Vec::new(),
            public_files: Vec::new(),
            build_resolved: BuildConfig {
                content_dir: base.join("pages"),
                output_dir: base.join("dist"),
                public_dir: base.join("public"),
                clean: false,
            },
            public_files_resolved: Vec::new(),
            root_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_scripts()?;
        self.validate_commands()?;
        Ok(())
    }

    /// Validate site metadata.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if !self.site.base.starts_with('/') || !self.site.base.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base must start and end with /".to_owned(),
            ));
        }

        // Only validate url if set (sitemap locations stay relative otherwise)
        if !self.site.url.is_empty() {
            require_http_url(&self.site.url, "site.url")?;
        }

        Ok(())
    }

    /// Validate script bundling configuration.
    fn validate_scripts(&self) -> Result<(), ConfigError> {
        if !self.scripts.entry_points.is_empty() && self.scripts.bundler.is_none() {
            return Err(ConfigError::Validation(
                "scripts.entry_points requires scripts.bundler to be set".to_owned(),
            ));
        }
        if let Some(bundler) = &self.scripts.bundler {
            require_non_empty(bundler, "scripts.bundler")?;
        }
        Ok(())
    }

    /// Validate build commands.
    fn validate_commands(&self) -> Result<(), ConfigError> {
        for entry in &self.commands {
            require_non_empty(&entry.command, "commands.command")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Validates that every `[[public_files]]` entry names a copyable file.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            content_dir: resolve(self.build.content_dir.as_deref(), "pages"),
            output_dir: resolve(self.build.output_dir.as_deref(), "dist"),
            public_dir: resolve(self.build.public_dir.as_deref(), "public"),
            clean: self.build.clean.unwrap_or(false),
        };

        self.public_files_resolved = self
            .public_files
            .iter()
            .map(|entry| {
                let path = config_dir.join(&entry.path);
                let name = match &entry.name {
                    Some(name) => name.clone(),
                    None => path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .ok_or_else(|| {
                            ConfigError::Validation(format!(
                                "public_files path has no file name: {}",
                                entry.path
                            ))
                        })?,
                };
                Ok(PublicFile { path, name })
            })
            .collect::<Result<_, ConfigError>>()?;

        self.root_dir = config_dir.to_path_buf();

        Ok(())
    }
}
