//! Shorthand preprocessing and markdown conversion.
//!
//! Documents are rendered in two steps:
//!
//! 1. [`ShorthandPreprocessor`] rewrites `![[media]]` embeds and `[[wiki links]]`
//!    into HTML fragments, leaving every other byte untouched.
//! 2. A [`MarkdownConverter`] turns the preprocessed text into HTML.
//!    [`CmarkConverter`] is the pulldown-cmark implementation.
//!
//! # Example
//!
//! ```
//! use mdsite_renderer::{CmarkConverter, MarkdownConverter, ShorthandOptions, ShorthandPreprocessor};
//!
//! let preprocessor = ShorthandPreprocessor::new(ShorthandOptions::default());
//! let text = preprocessor.process("See [[Getting Started]].").unwrap();
//! let html = CmarkConverter::new().convert(&text).unwrap();
//!
//! assert!(html.contains(r#"<a href="/index.php/Getting%2BStarted">Getting Started</a>"#));
//! ```

mod converter;
mod encode;
mod shorthand;

pub use converter::{CmarkConverter, ConvertError, MarkdownConverter};
pub use encode::{encode_link_target, encode_path_segment};
pub use shorthand::{PreprocessError, ShorthandOptions, ShorthandPreprocessor};
