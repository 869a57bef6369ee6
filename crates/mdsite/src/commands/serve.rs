//! `mdsite serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the markdown documents (overrides config).
    #[arg(short = 'r', long)]
    content_root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Title of the home page (overrides config).
    #[arg(long)]
    site_title: Option<String>,

    /// Absolute base URL for media files (overrides config).
    #[arg(long, env = "MDSITE_MEDIA_BASE_URL")]
    media_base_url: Option<String>,

    /// Show request and file paths on error pages.
    #[arg(long)]
    debug: bool,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config_path = ?config.config_path, "Configuration loaded");

        let content_root = &config.docs_resolved.content_root;
        if !content_root.is_dir() {
            return Err(CliError::Server(format!(
                "Content root not found: {}",
                content_root.display()
            )));
        }

        output.highlight(&format!(
            "Serving http://{}:{}{}/",
            config.server.host, config.server.port, config.site.mount_point
        ));
        output.info(&format!("Content root: {}", content_root.display()));
        output.info(&format!(
            "Media directory: {}",
            config.docs_resolved.media_dir(&config.media).display()
        ));
        if config.site.debug {
            output.info("Debug info on error pages: enabled");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// CLI overrides for the loaded configuration.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            content_root: self.content_root.clone(),
            site_title: self.site_title.clone(),
            media_base_url: self.media_base_url.clone(),
            debug: self.debug.then_some(true),
        }
    }
}
