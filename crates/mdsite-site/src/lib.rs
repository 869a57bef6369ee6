//! Document resolution and page rendering for mdsite.
//!
//! This crate provides:
//! - [`PathResolver`]: maps an untrusted request path to a markdown file
//!   inside a [`ContentRoot`]
//! - [`RenderPipeline`]: turns a [`ResolvedDocument`] into a [`RenderedPage`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mdsite_renderer::{CmarkConverter, ShorthandPreprocessor};
//! use mdsite_site::{ContentRoot, PathResolver, PipelineConfig, RenderPipeline, ResolveOptions};
//!
//! let root = ContentRoot::new("markdown")?;
//! let resolver = PathResolver::new(root, ResolveOptions::default());
//! let pipeline = RenderPipeline::new(
//!     ShorthandPreprocessor::default(),
//!     Box::new(CmarkConverter::new()),
//!     PipelineConfig::default(),
//! );
//!
//! let document = resolver.resolve("/index.php/guide")?;
//! let page = pipeline.render(&document)?;
//! println!("{}: {} bytes", page.title, page.html.len());
//! # Ok(())
//! # }
//! ```

mod pipeline;
mod resolver;

pub use pipeline::{PipelineConfig, RenderError, RenderPipeline, RenderedPage};
pub use resolver::{
    ContentRoot, NotFound, PathResolver, ResolveOptions, ResolvedDocument, normalize_request_path,
};
