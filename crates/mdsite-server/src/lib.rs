//! HTTP server for mdsite.
//!
//! This crate provides an axum server that:
//! - renders markdown documents for every `GET` outside the media route
//! - serves media files from the content root's media directory
//! - adds security headers to every response
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use mdsite_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         content_root: PathBuf::from("markdown"),
//!         site_title: "Team Notes".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (mdsite-server)
//!                        │
//!                        ├─► {public_root}/{dir}/* ──► ServeDir (media files)
//!                        │
//!                        └─► any other GET ──► PathResolver ──► RenderPipeline
//!                                                                   │
//!                                                                   └─► page template
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod template;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding all servable documents.
    pub content_root: PathBuf,
    /// Title of the default document.
    pub site_title: String,
    /// URL prefix stripped from page requests and used for wiki links.
    pub mount_point: String,
    /// Document served for an empty request path.
    pub default_document: String,
    /// Absolute media base URL (empty for URLs under `media_public_root`).
    pub media_base_url: String,
    /// Public URL of the content root.
    pub media_public_root: String,
    /// Media subdirectory beneath the content root.
    pub media_dir: String,
    /// Include diagnostics in error pages.
    pub debug: bool,
    /// Application version.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            content_root: PathBuf::from("markdown"),
            site_title: "Markdown Site".to_owned(),
            mount_point: "/index.php".to_owned(),
            default_document: "index.md".to_owned(),
            media_base_url: String::new(),
            media_public_root: "/markdown".to_owned(),
            media_dir: "share".to_owned(),
            debug: false,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the content root is unusable, the address is invalid,
/// or the listener cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&config)?);
    tracing::info!(
        content_root = %state.resolver.root().path().display(),
        media_route = %state.media_route,
        debug = state.debug,
        "Content root ready"
    );

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, version = %config.version, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdsite config.
///
/// # Arguments
///
/// * `config` - Loaded and validated configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &mdsite_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content_root: config.docs_resolved.content_root.clone(),
        site_title: config.site.title.clone(),
        mount_point: config.site.mount_point.clone(),
        default_document: config.docs_resolved.default_document.clone(),
        media_base_url: config.media.base_url.clone(),
        media_public_root: config.media.public_root.clone(),
        media_dir: config.media.dir.clone(),
        debug: config.site.debug,
        version,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mdsite_config::{CliSettings, Config};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("mdsite.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
port = 9000

[site]
title = "Notes"
mount_point = ""

[docs]
content_root = "pages"
default_document = "home.md"

[media]
base_url = "https://cdn.example.com/"
dir = "assets"
"#,
        )
        .unwrap();
        let settings = CliSettings {
            debug: Some(true),
            ..CliSettings::default()
        };

        let config = Config::load(Some(config_path.as_path()), Some(&settings)).unwrap();
        let server_config = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 9000);
        assert_eq!(server_config.content_root, dir.path().join("pages"));
        assert_eq!(server_config.site_title, "Notes");
        assert_eq!(server_config.mount_point, "");
        assert_eq!(server_config.default_document, "home.md");
        assert_eq!(server_config.media_base_url, "https://cdn.example.com/");
        assert_eq!(server_config.media_public_root, "/markdown");
        assert_eq!(server_config.media_dir, "assets");
        assert!(server_config.debug);
        assert_eq!(server_config.version, "1.2.3");
    }

    #[test]
    fn test_default_matches_config_defaults() {
        let server_config = ServerConfig::default();
        assert_eq!(server_config.port, 7979);
        assert_eq!(server_config.mount_point, "/index.php");
        assert_eq!(server_config.content_root, Path::new("markdown"));
    }
}
