//! Configuration management for mdsite.
//!
//! Parses `mdsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.title`
//! - `media.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the content root directory.
    pub content_root: Option<PathBuf>,
    /// Override the site title.
    pub site_title: Option<String>,
    /// Override the absolute media base URL.
    pub media_base_url: Option<String>,
    /// Override debug mode.
    pub debug: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdsite.toml";

/// Extension every servable document carries.
const DOCUMENT_SUFFIX: &str = ".md";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site-wide presentation and routing settings.
    pub site: SiteConfig,
    /// Document configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Media embed configuration.
    pub media: MediaConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Title used for the root document.
    pub title: String,
    /// Path prefix the page handler is mounted under.
    ///
    /// Stripped from incoming request paths and prepended to generated wiki
    /// links. Empty means pages live at the server root.
    pub mount_point: String,
    /// Include diagnostic detail in error pages.
    pub debug: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Markdown Site".to_owned(),
            mount_point: "/index.php".to_owned(),
            debug: false,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    content_root: Option<String>,
    default_document: Option<String>,
}

/// Resolved document configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding all servable documents.
    pub content_root: PathBuf,
    /// Document served for an empty request path.
    pub default_document: String,
}

impl DocsConfig {
    /// Directory holding media files referenced by `![[...]]` embeds.
    #[must_use]
    pub fn media_dir(&self, media: &MediaConfig) -> PathBuf {
        self.content_root.join(&media.dir)
    }
}

/// Media embed configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Absolute base URL for media files. Empty means relative URLs built
    /// from `public_root`.
    pub base_url: String,
    /// Public URL of the content root, used when `base_url` is empty.
    pub public_root: String,
    /// Media subdirectory beneath the content root.
    pub dir: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            public_root: "/markdown".to_owned(),
            dir: "share".to_owned(),
        }
    }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`media.base_url`").
        field: String,
        /// Error message (e.g., "${`CDN_URL`} not set").
        message: String,
    },
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

/// Require a URL path prefix to be empty or of the form `/a/b` (no trailing slash).
fn require_url_prefix(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Ok(());
    }
    if !value.starts_with('/') || value.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start with '/' and must not end with '/'"
        )));
    }
    Ok(())
}

/// Require a value to be a single path segment.
fn require_single_segment(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single path segment"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated again so CLI values obey the same rules as file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(content_root) = &settings.content_root {
            self.docs_resolved.content_root.clone_from(content_root);
        }
        if let Some(title) = &settings.site_title {
            self.site.title.clone_from(title);
        }
        if let Some(base_url) = &settings.media_base_url {
            self.media.base_url.clone_from(base_url);
        }
        if let Some(debug) = settings.debug {
            self.site.debug = debug;
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
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            media: MediaConfig::default(),
            docs_resolved: DocsConfig {
                content_root: base.join("markdown"),
                default_document: "index.md".to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

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
        self.validate_server()?;
        self.validate_site()?;
        self.validate_docs()?;
        self.validate_media()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_url_prefix(&self.site.mount_point, "site.mount_point")
    }

    /// Validate document configuration.
    fn validate_docs(&self) -> Result<(), ConfigError> {
        let default_document = &self.docs_resolved.default_document;
        require_single_segment(default_document, "docs.default_document")?;
        if !default_document.ends_with(DOCUMENT_SUFFIX) {
            return Err(ConfigError::Validation(format!(
                "docs.default_document must end with {DOCUMENT_SUFFIX}"
            )));
        }
        Ok(())
    }

    /// Validate media configuration.
    fn validate_media(&self) -> Result<(), ConfigError> {
        if !self.media.base_url.is_empty() {
            require_http_url(&self.media.base_url, "media.base_url")?;
        }
        require_url_prefix(&self.media.public_root, "media.public_root")?;
        require_single_segment(&self.media.dir, "media.dir")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        self.media.base_url = expand::expand_env(&self.media.base_url, "media.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            content_root: config_dir.join(self.docs.content_root.as_deref().unwrap_or("markdown")),
            default_document: self
                .docs
                .default_document
                .clone()
                .unwrap_or_else(|| "index.md".to_owned()),
        };
    }
}
