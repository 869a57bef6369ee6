//! Application state.
//!
//! Shared state for all request handlers.

use std::io;
use std::path::PathBuf;

use mdsite_renderer::{CmarkConverter, ShorthandOptions, ShorthandPreprocessor};
use mdsite_site::{ContentRoot, PathResolver, PipelineConfig, RenderPipeline, ResolveOptions};

use crate::ServerConfig;

/// Application state shared across all handlers.
#[derive(Debug)]
pub(crate) struct AppState {
    /// Maps request paths to documents.
    pub(crate) resolver: PathResolver,
    /// Renders resolved documents.
    pub(crate) pipeline: RenderPipeline,
    /// URL path the media directory is served under.
    pub(crate) media_route: String,
    /// Filesystem directory behind `media_route`.
    pub(crate) media_root: PathBuf,
    /// Include diagnostics in error pages.
    pub(crate) debug: bool,
}

impl AppState {
    /// Build state from server configuration.
    ///
    /// Fails if the content root does not exist or is not a directory.
    pub(crate) fn new(config: &ServerConfig) -> io::Result<Self> {
        let root = ContentRoot::new(&config.content_root)?;
        let media_root = root.path().join(&config.media_dir);

        let preprocessor = ShorthandPreprocessor::new(ShorthandOptions {
            link_prefix: config.mount_point.clone(),
            media_base_url: config.media_base_url.clone(),
            media_public_root: config.media_public_root.clone(),
            media_dir: config.media_dir.clone(),
        });
        let pipeline = RenderPipeline::new(
            preprocessor,
            Box::new(CmarkConverter::new()),
            PipelineConfig {
                site_title: config.site_title.clone(),
                default_document: config.default_document.clone(),
            },
        );
        let resolver = PathResolver::new(
            root,
            ResolveOptions {
                mount_point: config.mount_point.clone(),
                default_document: config.default_document.clone(),
            },
        );

        Ok(Self {
            resolver,
            pipeline,
            media_route: format!("{}/{}", config.media_public_root, config.media_dir),
            media_root,
            debug: config.debug,
        })
    }
}
